use std::collections::HashMap;

use crate::drops::error::DropsError;
use crate::drops::map::DropMap;
use crate::drops::types::{DropValue, DropsType};

/// Aggregated collection of drops for a single drops type.
///
/// Created lazily on first registration, append-only during the single
/// initialization pass, immutable afterward.
#[derive(Debug, Clone)]
pub enum DropsCollection {
    /// Ordered sequence, duplicates permitted; order follows loader-outer,
    /// dropin-inner iteration.
    Sequence(Vec<DropValue>),
    /// Conflict-checked named mapping.
    Named(DropMap),
}

impl DropsCollection {
    /// Short label used in collection-kind mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            DropsCollection::Sequence(_) => "sequence",
            DropsCollection::Named(_) => "named mapping",
        }
    }

    pub fn as_sequence(&self) -> Option<&[DropValue]> {
        match self {
            DropsCollection::Sequence(values) => Some(values),
            DropsCollection::Named(_) => None,
        }
    }

    pub fn as_named(&self) -> Option<&DropMap> {
        match self {
            DropsCollection::Named(map) => Some(map),
            DropsCollection::Sequence(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DropsCollection::Sequence(values) => values.len(),
            DropsCollection::Named(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-application extension state: drops type to aggregated collection.
#[derive(Debug, Default)]
pub struct DropinState {
    collections: HashMap<DropsType, DropsCollection>,
}

impl DropinState {
    pub fn new() -> Self {
        Self {
            collections: HashMap::new(),
        }
    }

    pub fn get(&self, drops_type: &DropsType) -> Option<&DropsCollection> {
        self.collections.get(drops_type)
    }

    pub fn contains(&self, drops_type: &DropsType) -> bool {
        self.collections.contains_key(drops_type)
    }

    /// The sequence collection for `drops_type`, created empty on first use.
    ///
    /// Fails if the slot already holds a named mapping.
    pub fn sequence_mut(&mut self, drops_type: DropsType) -> Result<&mut Vec<DropValue>, DropsError> {
        let collection = self
            .collections
            .entry(drops_type.clone())
            .or_insert_with(|| DropsCollection::Sequence(Vec::new()));
        match collection {
            DropsCollection::Sequence(values) => Ok(values),
            other => Err(DropsError::CollectionKind {
                drops_type,
                expected: "sequence",
                actual: other.kind(),
            }),
        }
    }

    /// The write-once named mapping for `drops_type`, created empty on first use.
    ///
    /// Fails if the slot already holds a plain sequence.
    pub fn named_mut(&mut self, drops_type: DropsType) -> Result<&mut DropMap, DropsError> {
        let collection = self
            .collections
            .entry(drops_type.clone())
            .or_insert_with(|| DropsCollection::Named(DropMap::write_once()));
        match collection {
            DropsCollection::Named(map) => Ok(map),
            other => Err(DropsError::CollectionKind {
                drops_type,
                expected: "named mapping",
                actual: other.kind(),
            }),
        }
    }
}
