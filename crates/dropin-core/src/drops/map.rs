use std::collections::HashMap;
use std::fmt;

use crate::drops::error::{ConflictError, DropsError};
use crate::drops::types::DropValue;

/// String-keyed mapping of named drops.
///
/// In write-once mode every key may be written exactly once: a second write,
/// single or batched, fails with [`ConflictError`] and leaves the mapping
/// untouched. This is how cross-dropin naming conflicts are detected at merge
/// time. Without write-once mode the map behaves like an ordinary dictionary
/// and overwrites freely.
#[derive(Clone)]
pub struct DropMap {
    entries: HashMap<String, DropValue>,
    write_once: bool,
}

impl DropMap {
    /// Create an empty map that permits overwrites.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            write_once: false,
        }
    }

    /// Create an empty map in write-once mode.
    pub fn write_once() -> Self {
        Self {
            entries: HashMap::new(),
            write_once: true,
        }
    }

    /// Build a map from initial entries.
    ///
    /// Initial data is taken as-is; conflict checking applies to writes made
    /// after construction.
    pub fn with_entries<I>(initials: I, write_once: bool) -> Self
    where
        I: IntoIterator<Item = (String, DropValue)>,
    {
        Self {
            entries: initials.into_iter().collect(),
            write_once,
        }
    }

    /// Whether write-once mode is enabled.
    pub fn is_write_once(&self) -> bool {
        self.write_once
    }

    /// Write a single key.
    pub fn insert(&mut self, key: impl Into<String>, value: DropValue) -> Result<(), ConflictError> {
        let key = key.into();
        if self.write_once && self.entries.contains_key(&key) {
            return Err(ConflictError { key });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    /// Merge a batch of pairs into the map.
    ///
    /// The merge is atomic: in write-once mode, if any incoming key already
    /// exists, nothing is written and the error names the first colliding key
    /// in batch order.
    pub fn merge<I>(&mut self, pairs: I) -> Result<(), ConflictError>
    where
        I: IntoIterator<Item = (String, DropValue)>,
    {
        let mut staged = Vec::new();
        for (key, value) in pairs {
            if self.write_once && self.entries.contains_key(&key) {
                return Err(ConflictError { key });
            }
            staged.push((key, value));
        }
        self.entries.extend(staged);
        Ok(())
    }

    /// Merge every entry of another map into this one.
    pub fn merge_from(&mut self, other: &DropMap) -> Result<(), ConflictError> {
        self.merge(other.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&DropValue> {
        self.entries.get(key)
    }

    /// Look up a key, failing with a typed error when absent.
    pub fn try_get(&self, key: &str) -> Result<&DropValue, DropsError> {
        self.entries.get(key).ok_or_else(|| DropsError::MissingKey {
            key: key.to_string(),
        })
    }

    /// Containment check; never fails.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DropValue)> {
        self.entries.iter()
    }
}

impl Default for DropMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DropMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropMap")
            .field("entries", &self.entries)
            .field("write_once", &self.write_once)
            .finish()
    }
}

impl<'a> IntoIterator for &'a DropMap {
    type Item = (&'a String, &'a DropValue);
    type IntoIter = std::collections::hash_map::Iter<'a, String, DropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
