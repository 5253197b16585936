//! # Host Application Interface
//!
//! The collaborator surface the core consumes and writes into. The host
//! application owns routing, request dispatch, and template rendering; this
//! module only defines the seams the registration pipeline needs: access to
//! configuration, the dropin extension state slot, a blueprint mount
//! operation, the three request lifecycle hook attachment points, and the
//! template-context contributor attachment point.
use crate::drops::state::DropinState;
use crate::drops::types::{Blueprint, ContextProcessor, HookFn};

pub mod config;
pub mod error;

pub use config::{
    BlueprintTransform, DropinConfig, DropinIterFn, DropinIterSpec, DropinSettings, LoaderSpec,
    MountDecision, PrefixTransform, WildcardRule, WILDCARD,
};
pub use error::HostError;

// Test module declaration
#[cfg(test)]
mod tests;

/// Extension slots attached to a host application.
///
/// The dropin slot is `None` until the manager's first attach; its presence
/// is what makes a second attach a no-op.
#[derive(Debug, Default)]
pub struct Extensions {
    dropin: Option<DropinState>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dropin(&self) -> Option<&DropinState> {
        self.dropin.as_ref()
    }

    pub fn dropin_mut(&mut self) -> Option<&mut DropinState> {
        self.dropin.as_mut()
    }

    /// Create the dropin state slot if absent, returning it either way.
    pub fn init_dropin(&mut self) -> &mut DropinState {
        self.dropin.get_or_insert_with(DropinState::new)
    }
}

/// The host application the registration pipeline runs against.
pub trait HostApplication {
    /// Dropin configuration for this application.
    fn config(&self) -> &DropinConfig;

    fn extensions(&self) -> &Extensions;

    fn extensions_mut(&mut self) -> &mut Extensions;

    /// Mount a blueprint into the routing table. A `url_prefix` of `None`
    /// mounts at the blueprint's declared prefix.
    fn register_blueprint(
        &mut self,
        blueprint: &Blueprint,
        url_prefix: Option<&str>,
    ) -> Result<(), HostError>;

    /// Attach a callback to run before each request.
    fn before_request(&mut self, hook: HookFn);

    /// Attach a callback to run after each request.
    fn after_request(&mut self, hook: HookFn);

    /// Attach a callback to run at request teardown.
    fn teardown_request(&mut self, hook: HookFn);

    /// Attach a template-context contributor.
    fn context_processor(&mut self, processor: ContextProcessor);
}
