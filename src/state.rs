// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::auth::TokenKeys;
use crate::storage::DocumentStorage;

/// Shared application state.
///
/// Everything here is read-only after startup: the document store handle
/// and the token keys. Both are constructed in `main` and injected, never
/// read ambiently per request.
#[derive(Clone)]
pub struct AppState {
    storage: DocumentStorage,
    token_keys: TokenKeys,
}

impl AppState {
    pub fn new(storage: DocumentStorage, token_keys: TokenKeys) -> Self {
        Self {
            storage,
            token_keys,
        }
    }

    /// Get a handle to the document store.
    pub fn storage(&self) -> DocumentStorage {
        self.storage.clone()
    }

    /// Get the token signing/verification keys.
    pub fn token_keys(&self) -> &TokenKeys {
        &self.token_keys
    }
}
