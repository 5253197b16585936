//! Error types for drops discovery and registration.
use crate::drops::types::DropsType;
use crate::host::error::HostError;
use crate::resolver::error::ResolutionError;

/// A named-drops key was written twice.
///
/// Raised eagerly at merge time; the existing value is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("drops key conflict: '{key}'")]
pub struct ConflictError {
    /// The first colliding key, in merge order.
    pub key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DropsError {
    #[error("Resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Named drops conflict: {0}")]
    Conflict(#[from] ConflictError),

    #[error("Dropin extension state missing; no manager has attached this application")]
    Uninitialized,

    #[error("Drops collection '{drops_type}' is a {actual}, expected a {expected}")]
    CollectionKind {
        drops_type: DropsType,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Object at '{path}' is not a usable drops collection")]
    InvalidDrops { path: String },

    #[error("Drop of shape '{kind}' from '{dropin}' cannot register as '{drops_type}'")]
    UnexpectedDrop {
        dropin: String,
        drops_type: DropsType,
        kind: &'static str,
    },

    #[error("Unnamed drop of shape '{kind}' from '{dropin}'; '{drops_type}' drops must be (name, value) pairs or named functions")]
    UnnamedDrop {
        dropin: String,
        drops_type: DropsType,
        kind: &'static str,
    },

    #[error("Unknown drops key: '{key}'")]
    MissingKey { key: String },

    #[error("Host registration failed: {0}")]
    Host(#[from] HostError),
}
