// Copyright (c) 2022-2023 Web 3 Foundation

//! ### Key table contract
//!
//! The server resolves ensemble selectors to table states through this
//! contract.  Lookups are synchronous and return one atomically
//! consistent state, so an evaluation never observes a torn rotation.
//! Rotation replaces a selector's state through the explicit install
//! entry point, paired with an update token for already-issued
//! outputs.

use crate::{
    error::{PopError, PopResult},
    keys::TweakState,
};


/// Synchronous selector-to-state resolution.
pub trait KeyStore {
    /// Current table state for a selector, or `UnknownSelector`.
    fn lookup(&self, selector: &[u8]) -> PopResult<TweakState>;

    /// Install or replace a selector's table state.
    fn install(&mut self, selector: &[u8], state: TweakState);
}


/// In-memory key table for servers and tests.
#[cfg(feature = "std")]
pub struct MemoryKeyStore {
    entries: std::collections::HashMap<Vec<u8>, TweakState>,
}

#[cfg(feature = "std")]
impl MemoryKeyStore {
    pub fn new() -> MemoryKeyStore {
        MemoryKeyStore { entries: std::collections::HashMap::new() }
    }
}

#[cfg(feature = "std")]
impl Default for MemoryKeyStore {
    fn default() -> Self { MemoryKeyStore::new() }
}

#[cfg(feature = "std")]
impl KeyStore for MemoryKeyStore {
    fn lookup(&self, selector: &[u8]) -> PopResult<TweakState> {
        self.entries.get(selector).cloned().ok_or(PopError::UnknownSelector)
    }

    fn install(&mut self, selector: &[u8], state: TweakState) {
        self.entries.insert(selector.to_vec(), state);
    }
}
