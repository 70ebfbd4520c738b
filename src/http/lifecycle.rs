//! Navigation and page-lifecycle hooks for request cancellation.
//!
//! T030: Implement route-change hook
//! T031: Implement page-hide and unload hooks

use crate::http::registry::RequestRegistry;
use std::sync::Arc;

/// Cancels in-flight requests on navigation and page-lifecycle events.
///
/// The console shell invokes these hooks from its router and window event
/// handlers. Cancellation is fire-and-forget: the hooks never block, never
/// fail, and navigation proceeds unconditionally.
pub struct NavigationGuard {
    /// Shared in-flight request registry
    registry: Arc<RequestRegistry>,
}

impl NavigationGuard {
    /// Create a guard over the shared registry.
    pub fn new(registry: Arc<RequestRegistry>) -> Self {
        Self { registry }
    }

    /// Route-change hook, fired before each navigation transition.
    ///
    /// Requests are cancelled only when the target route differs from the
    /// current one.
    pub fn before_navigate(&self, to: &str, from: &str) {
        if to != from {
            tracing::debug!("Route change {} -> {}, cancelling in-flight requests", from, to);
            self.registry.cancel_all();
        }
    }

    /// Page-visibility-hidden hook.
    pub fn on_page_hidden(&self) {
        self.registry.cancel_all();
    }

    /// Page-unload hook.
    pub fn on_unload(&self) {
        self.registry.cancel_all();
    }
}
