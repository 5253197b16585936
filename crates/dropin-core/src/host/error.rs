//! Error types for host application operations.

/// A host-level registration side effect failed.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The routing table refused to mount a blueprint.
    #[error("failed to mount blueprint '{blueprint}' at '{prefix}': {message}")]
    MountFailed {
        blueprint: String,
        prefix: String,
        message: String,
    },
}
