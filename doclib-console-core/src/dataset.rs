//! Data attributes carried by the UI element that triggered an action.
//!
//! Keys use the camelCase form a front end exposes (`data-library-id` becomes
//! `libraryId`). Empty values count as absent.

use std::collections::BTreeMap;

use crate::contract::LibraryId;

pub const LIBRARY_ID: &str = "libraryId";
pub const MODE: &str = "mode";
pub const DELETE_LIBRARY: &str = "deleteLibrary";
pub const LIBRARY_NAME: &str = "libraryName";
pub const SYNC_LIBRARY: &str = "syncLibrary";
pub const VERSION: &str = "version";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    entries: BTreeMap<String, String>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Reads a library identifier stored under `key`.
    pub fn library_id(&self, key: &str) -> Option<LibraryId> {
        self.get(key).map(|raw| LibraryId::new(raw.trim()))
    }
}

impl<K, V> FromIterator<(K, V)> for Dataset
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for (key, value) in iter {
            dataset.insert(key, value);
        }
        dataset
    }
}
