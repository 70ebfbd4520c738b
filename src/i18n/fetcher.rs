//! Locale bundle transport.
//!
//! T042: Implement BundleFetcher seam with HTTP and embedded sources

use crate::i18n::Locale;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Default bundle fetch timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Acquire raw FTL source for a locale.
#[async_trait]
pub trait BundleFetcher: Send + Sync {
    /// Fetch the bundle source for `locale`.
    async fn fetch(&self, locale: Locale) -> Result<String, FetchError>;
}

/// Fetch bundles over HTTP from `{base}/{tag}/main.ftl`.
pub struct HttpBundleFetcher {
    /// HTTP client
    http: reqwest::Client,
    /// Base URL for bundle downloads
    base_url: String,
}

impl HttpBundleFetcher {
    /// Create a fetcher for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl BundleFetcher for HttpBundleFetcher {
    async fn fetch(&self, locale: Locale) -> Result<String, FetchError> {
        let url = format!(
            "{}/{}/main.ftl",
            self.base_url.trim_end_matches('/'),
            locale.tag()
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if body.trim().is_empty() {
            return Err(FetchError::EmptyBundle);
        }

        Ok(body)
    }
}

/// Serve bundles from memory.
///
/// Backs offline operation and tests; `with_builtin` carries the bundles
/// shipped in the binary.
#[derive(Default)]
pub struct StaticBundleFetcher {
    /// Bundle sources (locale -> FTL)
    bundles: HashMap<Locale, String>,
}

impl StaticBundleFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher preloaded with the embedded console bundles.
    pub fn with_builtin() -> Self {
        let mut fetcher = Self::new();
        for locale in Locale::all() {
            fetcher.insert(*locale, builtin_source(*locale));
        }
        fetcher
    }

    /// Register the bundle source for a locale.
    pub fn insert(&mut self, locale: Locale, source: impl Into<String>) {
        self.bundles.insert(locale, source.into());
    }
}

#[async_trait]
impl BundleFetcher for StaticBundleFetcher {
    async fn fetch(&self, locale: Locale) -> Result<String, FetchError> {
        self.bundles
            .get(&locale)
            .cloned()
            .ok_or_else(|| FetchError::Missing(locale.tag().to_string()))
    }
}

/// The embedded bundle source for a locale.
fn builtin_source(locale: Locale) -> &'static str {
    match locale {
        Locale::EnUs => include_str!("locales/en-US/main.ftl"),
        Locale::ZhCn => include_str!("locales/zh-CN/main.ftl"),
        Locale::JaJp => include_str!("locales/ja-JP/main.ftl"),
        Locale::ArSa => include_str!("locales/ar-SA/main.ftl"),
        Locale::EsEs => include_str!("locales/es-ES/main.ftl"),
    }
}

/// Bundle fetch errors.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Bundle server returned status {0}")]
    Status(u16),

    #[error("Bundle payload was empty")]
    EmptyBundle,

    #[error("No bundle available for {0}")]
    Missing(String),
}
