//! HTTP dispatch with navigation-aware request cancellation.
//!
//! Tracks every outstanding console API call by a canonical signature of
//! (method, URL, parameters). A duplicate dispatch supersedes its
//! predecessor, and route changes or page-lifecycle events cancel
//! everything still in flight so stale responses are never applied.

pub mod client;
pub mod key;
pub mod lifecycle;
pub mod registry;

// Re-export types
pub use client::{ApiClient, ApiError};
pub use key::request_key;
pub use lifecycle::NavigationGuard;
pub use registry::{CancelHandle, RequestRegistry};
pub use reqwest::Method;
