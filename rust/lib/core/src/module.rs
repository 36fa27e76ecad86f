use axum::Router;

use crate::HookRegistry;

/// A service module that contributes hook callbacks and HTTP routes.
///
/// The binary entry point constructs one [`HookRegistry`], hands it to
/// every module's `register`, then merges their routes into a single
/// Router.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Register this module's callbacks and record types. Called once at
    /// startup, before any request is served.
    fn register(&self, hooks: &HookRegistry);

    /// Return the module's routes. They are merged at the root.
    fn routes(&self) -> Router;
}
