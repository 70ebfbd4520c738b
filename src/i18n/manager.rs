//! Locale load manager.
//!
//! T050: Implement single-flight locale loading
//! T051: Implement reload and preload operations
//! T052: Implement switch with preference persistence and document binding
//! T053: Implement loading stats and observable status

use crate::i18n::catalog::MessageCatalog;
use crate::i18n::fetcher::BundleFetcher;
use crate::i18n::{detect_system_locale, Locale, TextDirection};
use crate::storage::prefs::PreferenceStore;
use fluent_bundle::FluentArgs;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::watch;

/// Shared handle to an in-flight bundle load.
type SharedLoad = Shared<BoxFuture<'static, bool>>;

/// Applies locale attributes to the document root.
///
/// The console shell provides the real implementation; the default one
/// only records the attributes in the log.
pub trait DocumentBinding: Send + Sync {
    /// Apply the language tag.
    fn set_language(&self, tag: &str);

    /// Apply the text direction.
    fn set_direction(&self, direction: TextDirection);
}

/// Document binding that logs the applied attributes.
#[derive(Debug, Default)]
pub struct DefaultDocumentBinding;

impl DocumentBinding for DefaultDocumentBinding {
    fn set_language(&self, tag: &str) {
        tracing::debug!("Document language set to {}", tag);
    }

    fn set_direction(&self, direction: TextDirection) {
        tracing::debug!("Document direction set to {}", direction);
    }
}

/// Observable loading status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStatus {
    /// Whether any bundle load is in flight
    pub loading: bool,
    /// Human-readable message for the latest failure
    pub error: Option<String>,
}

/// Bundle residency counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingStats {
    /// Supported locale count
    pub total: usize,
    /// Resident bundle count
    pub loaded: usize,
    /// Resident share, 0-100
    pub percentage: f32,
    /// Locales not yet resident
    pub remaining: usize,
}

/// Mutable manager state, guarded by a synchronous lock.
struct ManagerState {
    /// Locales whose bundles are resident
    loaded: HashSet<Locale>,
    /// Shared pending loads (locale -> shared future)
    in_flight: HashMap<Locale, SharedLoad>,
    /// The active locale
    active: Locale,
}

struct Inner {
    /// Bundle transport
    fetcher: Arc<dyn BundleFetcher>,
    /// Active-locale persistence
    prefs: Arc<dyn PreferenceStore>,
    /// Document attribute sink
    document: Arc<dyn DocumentBinding>,
    /// Installed message bundles
    catalog: RwLock<MessageCatalog>,
    /// Loaded set, in-flight map, active locale
    state: Mutex<ManagerState>,
    /// Observable loading/error status
    status: watch::Sender<LoadStatus>,
}

/// Serves translation bundles on demand.
///
/// Constructed once at startup and injected into callers. A locale is
/// fetched at most once concurrently: callers requesting a locale already
/// being fetched await the same shared operation and observe the same
/// outcome. State is only mutated in synchronous sections between
/// suspension points.
#[derive(Clone)]
pub struct LocaleManager {
    inner: Arc<Inner>,
}

impl LocaleManager {
    /// Create a manager over the given seams.
    pub fn new(
        fetcher: Arc<dyn BundleFetcher>,
        prefs: Arc<dyn PreferenceStore>,
        document: Arc<dyn DocumentBinding>,
    ) -> Self {
        let (status, _) = watch::channel(LoadStatus::default());
        Self {
            inner: Arc::new(Inner {
                fetcher,
                prefs,
                document,
                catalog: RwLock::new(MessageCatalog::new()),
                state: Mutex::new(ManagerState {
                    loaded: HashSet::new(),
                    in_flight: HashMap::new(),
                    active: Locale::default(),
                }),
                status,
            }),
        }
    }

    /// Restore the persisted locale, falling back to system detection.
    ///
    /// Returns whether the restored locale's bundle loaded.
    pub async fn init(&self) -> bool {
        let stored = match self.inner.prefs.load() {
            Ok(prefs) => prefs.locale,
            Err(e) => {
                tracing::warn!("Failed to load preferences: {}", e);
                None
            }
        };

        let locale = stored
            .as_deref()
            .and_then(Locale::from_tag)
            .unwrap_or_else(detect_system_locale);

        self.switch_locale(locale).await
    }

    /// Reset loaded bundles, catalog, and error state.
    ///
    /// Loads still in flight settle cooperatively and may re-install their
    /// bundle afterwards.
    pub fn clear(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            state.loaded.clear();
            state.in_flight.clear();
        }
        self.inner.catalog.write().unwrap().clear();
        self.inner.status.send_modify(|status| {
            status.loading = false;
            status.error = None;
        });
    }

    /// Whether the locale's bundle is resident.
    pub fn is_loaded(&self, tag: &str) -> bool {
        match Locale::from_tag(tag) {
            Some(locale) => self.inner.state.lock().unwrap().loaded.contains(&locale),
            None => false,
        }
    }

    /// Load a locale's bundle.
    ///
    /// Returns false for unsupported tags and fetch failures; the failure
    /// message is available through [`Self::last_error`]. Concurrent calls
    /// for the same locale share one fetch.
    pub async fn load(&self, tag: &str) -> bool {
        match Locale::from_tag(tag) {
            Some(locale) => self.load_locale(locale).await,
            None => self.reject_unsupported(tag),
        }
    }

    /// Load a supported locale's bundle.
    pub async fn load_locale(&self, locale: Locale) -> bool {
        let load = {
            let mut state = self.inner.state.lock().unwrap();
            if state.loaded.contains(&locale) {
                return true;
            }
            if let Some(load) = state.in_flight.get(&locale) {
                load.clone()
            } else {
                let load = run_load(Arc::clone(&self.inner), locale).boxed().shared();
                state.in_flight.insert(locale, load.clone());
                self.inner.status.send_modify(|status| {
                    status.loading = true;
                    status.error = None;
                });
                // Drive the load to settlement even if every caller is
                // dropped before it resolves.
                tokio::spawn(load.clone());
                load
            }
        };

        load.await
    }

    /// Forget the locale's loaded status, then load it again.
    ///
    /// Forces a fresh fetch even when the bundle was already resident.
    pub async fn reload(&self, tag: &str) -> bool {
        let Some(locale) = Locale::from_tag(tag) else {
            return self.reject_unsupported(tag);
        };

        self.inner.state.lock().unwrap().loaded.remove(&locale);
        self.load_locale(locale).await
    }

    /// Load a locale, ignoring the outcome.
    pub async fn preload(&self, tag: &str) {
        let _ = self.load(tag).await;
    }

    /// Load every supported locale; one failure does not abort the others.
    pub async fn preload_all(&self) {
        let loads = Locale::all().iter().map(|locale| self.load_locale(*locale));
        futures::future::join_all(loads).await;
    }

    /// Switch the active locale.
    ///
    /// Loads the target first; only on success the active-locale pointer,
    /// the persisted preference, and the document attributes are updated.
    /// On failure everything stays as it was and false is returned.
    pub async fn switch(&self, tag: &str) -> bool {
        match Locale::from_tag(tag) {
            Some(locale) => self.switch_locale(locale).await,
            None => self.reject_unsupported(tag),
        }
    }

    /// Switch to a supported locale.
    pub async fn switch_locale(&self, locale: Locale) -> bool {
        if !self.load_locale(locale).await {
            return false;
        }

        self.inner.state.lock().unwrap().active = locale;

        if let Err(e) = self.inner.prefs.store_locale(locale.tag()) {
            tracing::warn!("Failed to persist locale preference: {}", e);
        }
        self.inner.document.set_language(locale.tag());
        self.inner.document.set_direction(locale.direction());

        tracing::info!("Active locale switched to {}", locale.tag());
        true
    }

    /// The active locale.
    pub fn active(&self) -> Locale {
        self.inner.state.lock().unwrap().active
    }

    /// Format a message at the active locale.
    pub fn translate(&self, key: &str) -> String {
        let active = self.active();
        self.inner.catalog.read().unwrap().format(active, key, None)
    }

    /// Format a message with arguments at the active locale.
    pub fn translate_with(&self, key: &str, args: &FluentArgs) -> String {
        let active = self.active();
        self.inner
            .catalog
            .read()
            .unwrap()
            .format(active, key, Some(args))
    }

    /// Bundle residency counters.
    pub fn stats(&self) -> LoadingStats {
        let loaded = self.inner.state.lock().unwrap().loaded.len();
        let total = Locale::all().len();
        LoadingStats {
            total,
            loaded,
            percentage: loaded as f32 * 100.0 / total as f32,
            remaining: total - loaded,
        }
    }

    /// Whether any bundle load is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.status.borrow().loading
    }

    /// The latest failure message, if any.
    pub fn last_error(&self) -> Option<String> {
        self.inner.status.borrow().error.clone()
    }

    /// Subscribe to loading/error status changes.
    pub fn subscribe(&self) -> watch::Receiver<LoadStatus> {
        self.inner.status.subscribe()
    }

    /// Record the unsupported-tag failure without touching locale state.
    fn reject_unsupported(&self, tag: &str) -> bool {
        tracing::warn!("Unsupported locale requested: {}", tag);
        self.inner.status.send_modify(|status| {
            status.error = Some(format!("Unsupported locale: {}", tag));
        });
        false
    }
}

/// Fetch and install one locale bundle, then publish the outcome.
///
/// Runs inside the shared in-flight future; the marker is cleared on every
/// settlement path so a later call can retry.
async fn run_load(inner: Arc<Inner>, locale: Locale) -> bool {
    tracing::debug!("Fetching locale bundle for {}", locale.tag());

    let outcome = match inner.fetcher.fetch(locale).await {
        Ok(source) => inner
            .catalog
            .write()
            .unwrap()
            .install(locale, &source)
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    let still_loading = {
        let mut state = inner.state.lock().unwrap();
        state.in_flight.remove(&locale);
        if outcome.is_ok() {
            state.loaded.insert(locale);
        }
        !state.in_flight.is_empty()
    };

    match outcome {
        Ok(()) => {
            inner.status.send_modify(|status| {
                status.loading = still_loading;
                status.error = None;
            });
            tracing::info!("Locale bundle loaded for {}", locale.tag());
            true
        }
        Err(message) => {
            let text = format!("Failed to load {}: {}", locale.tag(), message);
            inner.status.send_modify(|status| {
                status.loading = still_loading;
                status.error = Some(text.clone());
            });
            tracing::warn!("{}", text);
            false
        }
    }
}
