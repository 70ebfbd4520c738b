//! OpsDeck - Administration Console Client Core
//!
//! Client-side core for the OpsDeck self-hosted administration console.
//! Provides cancellable HTTP dispatch keyed by canonical request
//! signatures, lazy single-flight locale loading with a Fluent message
//! catalog, capability-based permission gating, and console preference
//! persistence.

pub mod http;
pub mod i18n;
pub mod permissions;
pub mod storage;

// Re-export commonly used types
pub use http::client::{ApiClient, ApiError};
pub use http::lifecycle::NavigationGuard;
pub use http::registry::RequestRegistry;
pub use i18n::manager::LocaleManager;
pub use i18n::Locale;
pub use permissions::{CapabilitySet, Requirement};
pub use storage::prefs::Preferences;
