//! Persisted preference store seam.
//!
//! DESIGN
//! ======
//! Reads are async because the browser store answers through a promise;
//! writes are fire-and-forget so UI handlers never wait on persistence.
//! Implementations only deal in boolean flags keyed by string.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;

use crate::keys::PreferenceKeys;

/// Error returned by [`PreferenceStore::get`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The host store rejected or failed the read.
    #[error("preference store unavailable: {0}")]
    Unavailable(String),
    /// The host store answered with something that is not a key/value map.
    #[error("malformed preference payload: {0}")]
    Malformed(String),
}

/// Key/value store holding boolean preference flags.
#[async_trait(?Send)]
pub trait PreferenceStore {
    /// Read the given keys. Keys that were never written are absent from the map.
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, bool>, StoreError>;

    /// Write a flag without waiting for the store to acknowledge.
    fn set(&self, key: &str, value: bool);
}

/// The two persisted flags for one scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    /// `None` when the enable flag has never been stored.
    pub dark_mode: Option<bool>,
    /// A missing ignore flag reads as `false`.
    pub ignore_if_dark: bool,
}

/// Read both flags for `keys`.
///
/// # Errors
///
/// Propagates the store's [`StoreError`].
pub async fn load_preferences<S>(store: &S, keys: &PreferenceKeys) -> Result<Preferences, StoreError>
where
    S: PreferenceStore + ?Sized,
{
    let values = store.get(&keys.all()).await?;
    Ok(Preferences {
        dark_mode: values.get(&keys.dark_mode).copied(),
        ignore_if_dark: values.get(&keys.ignore_if_dark).copied().unwrap_or(false),
    })
}

pub fn save_dark_mode<S: PreferenceStore + ?Sized>(store: &S, keys: &PreferenceKeys, enabled: bool) {
    store.set(&keys.dark_mode, enabled);
}

pub fn save_ignore_if_dark<S: PreferenceStore + ?Sized>(store: &S, keys: &PreferenceKeys, ignore: bool) {
    store.set(&keys.ignore_if_dark, ignore);
}

/// In-process store for hosts without a browser storage area.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, bool>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `key`, if written.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<bool> {
        self.values.borrow().get(key).copied()
    }
}

#[async_trait(?Send)]
impl PreferenceStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, bool>, StoreError> {
        let values = self.values.borrow();
        Ok(keys
            .iter()
            .filter_map(|key| values.get(*key).map(|v| ((*key).to_owned(), *v)))
            .collect())
    }

    fn set(&self, key: &str, value: bool) {
        self.values.borrow_mut().insert(key.to_owned(), value);
    }
}
