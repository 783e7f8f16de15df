// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed against a single process-wide secret loaded at
//! startup. A token is valid if and only if its signature verifies against
//! that secret and the current time is before its expiry; there is no
//! revocation list. Rotating the secret invalidates every outstanding
//! token.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{AuthError, TokenClaims};

/// Fixed token lifetime: seven days from issuance. Policy constant, not
/// configurable per identity.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Signing and verification keys derived from the process-wide secret.
///
/// Constructed once at startup and injected through `AppState`; nothing in
/// this module reads the environment.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    /// Build the key pair from the shared secret.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token acting as `user_id`, expiring in seven days.
    ///
    /// The caller must already have verified the user's password; issuance
    /// itself is pure computation.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        self.issue_with_lifetime(user_id, TOKEN_TTL_SECS)
    }

    pub(crate) fn issue_with_lifetime(
        &self,
        user_id: &str,
        lifetime_secs: i64,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: Some(user_id.to_string()),
            iat: now,
            exp: now + lifetime_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            AuthError::Internal
        })
    }

    /// Verify a token's signature and expiry, returning its claims.
    ///
    /// Failures are classified: expired is distinct from invalid, and
    /// anything unclassified maps to `AuthenticationFailed` rather than
    /// silently passing.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<TokenClaims>(token, &self.decoding, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidToken
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::MissingRequiredClaim(_)
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => AuthError::TokenInvalid,
                _ => AuthError::AuthenticationFailed,
            }
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> TokenKeys {
        TokenKeys::from_secret(b"test-secret")
    }

    #[test]
    fn issued_token_verifies_to_same_subject() {
        let keys = test_keys();
        let token = keys.issue("user_123").unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("user_123"));
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn expired_token_is_expired_not_invalid() {
        let keys = test_keys();
        // Past the 60s leeway
        let token = keys.issue_with_lifetime("user_123", -120).unwrap();

        let result = keys.verify(&token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let keys = test_keys();
        let other = TokenKeys::from_secret(b"rotated-secret");
        let token = other.issue("user_123").unwrap();

        let result = keys.verify(&token);
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let keys = test_keys();
        let token = keys.issue("user_123").unwrap();
        let mut tampered = token.clone();
        tampered.pop();

        let result = keys.verify(&tampered);
        assert!(matches!(
            result,
            Err(AuthError::TokenInvalid) | Err(AuthError::AuthenticationFailed)
        ));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let keys = test_keys();
        let result = keys.verify("not.a.jwt");
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }
}
