//! OpsDeck - Administration Console Client Core
//!
//! Bootstrap entry point: wires logging, preferences, the request
//! registry, and the locale manager. The console shell mounts on top of
//! this wiring.
//!
//! T001: Configure tracing subscriber

use opsdeck::http::{ApiClient, NavigationGuard, RequestRegistry};
use opsdeck::i18n::fetcher::{BundleFetcher, HttpBundleFetcher, StaticBundleFetcher};
use opsdeck::i18n::manager::DefaultDocumentBinding;
use opsdeck::i18n::LocaleManager;
use opsdeck::storage::prefs::FilePreferenceStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting OpsDeck client core v{}", env!("CARGO_PKG_VERSION"));

    let api_base = std::env::var("OPSDECK_API_URL")
        .unwrap_or_else(|_| "http://localhost:9000/api".to_string());

    let registry = Arc::new(RequestRegistry::new());
    let client = ApiClient::with_registry(api_base, Arc::clone(&registry));
    let _guard = NavigationGuard::new(Arc::clone(&registry));
    tracing::info!("API endpoint: {}", client.base_url());

    // Bundles come from the locale server when one is configured,
    // otherwise from the copies embedded in the binary.
    let fetcher: Arc<dyn BundleFetcher> = match std::env::var("OPSDECK_LOCALE_URL") {
        Ok(url) => Arc::new(HttpBundleFetcher::new(url)),
        Err(_) => Arc::new(StaticBundleFetcher::with_builtin()),
    };

    let locales = LocaleManager::new(
        fetcher,
        Arc::new(FilePreferenceStore::new()),
        Arc::new(DefaultDocumentBinding),
    );

    if !locales.init().await {
        tracing::warn!("Locale restore failed, continuing with built-in strings");
    }

    let stats = locales.stats();
    tracing::info!(
        "Locale bundles resident: {}/{} ({:.0}%)",
        stats.loaded,
        stats.total,
        stats.percentage
    );
    tracing::info!("{}", locales.translate("console-ready"));

    Ok(())
}
