//! Integration tests for locale switching end to end.

use async_trait::async_trait;
use opsdeck::i18n::fetcher::{BundleFetcher, FetchError, StaticBundleFetcher};
use opsdeck::i18n::manager::DocumentBinding;
use opsdeck::i18n::{Locale, LocaleManager, TextDirection};
use opsdeck::storage::prefs::{MemoryPreferenceStore, PreferenceStore, Preferences};
use std::sync::{Arc, Mutex};

/// Fetcher that serves real bundles except for the locales told to fail.
struct PartiallyFailingFetcher {
    inner: StaticBundleFetcher,
    failing: Vec<Locale>,
}

impl PartiallyFailingFetcher {
    fn failing(failing: Vec<Locale>) -> Self {
        Self {
            inner: StaticBundleFetcher::with_builtin(),
            failing,
        }
    }
}

#[async_trait]
impl BundleFetcher for PartiallyFailingFetcher {
    async fn fetch(&self, locale: Locale) -> Result<String, FetchError> {
        if self.failing.contains(&locale) {
            return Err(FetchError::Status(503));
        }
        self.inner.fetch(locale).await
    }
}

/// Document binding that records every applied attribute.
#[derive(Default)]
struct RecordingBinding {
    languages: Mutex<Vec<String>>,
    directions: Mutex<Vec<TextDirection>>,
}

impl DocumentBinding for RecordingBinding {
    fn set_language(&self, tag: &str) {
        self.languages.lock().unwrap().push(tag.to_string());
    }

    fn set_direction(&self, direction: TextDirection) {
        self.directions.lock().unwrap().push(direction);
    }
}

#[tokio::test]
async fn test_failed_switch_leaves_active_locale_untouched() {
    let prefs = Arc::new(MemoryPreferenceStore::new());
    let binding = Arc::new(RecordingBinding::default());
    let manager = LocaleManager::new(
        Arc::new(PartiallyFailingFetcher::failing(vec![Locale::JaJp])),
        Arc::clone(&prefs) as Arc<dyn PreferenceStore>,
        Arc::clone(&binding) as Arc<dyn DocumentBinding>,
    );

    assert!(manager.switch("zh-CN").await);
    assert_eq!(manager.active(), Locale::ZhCn);

    // The target bundle cannot be fetched; nothing may change.
    assert!(!manager.switch("ja-JP").await);
    assert_eq!(manager.active(), Locale::ZhCn);
    assert!(!manager.is_loaded("ja-JP"));
    assert_eq!(prefs.load().unwrap().locale.as_deref(), Some("zh-CN"));
    assert_eq!(*binding.languages.lock().unwrap(), ["zh-CN"]);

    let error = manager.last_error().expect("error recorded");
    assert!(error.contains("ja-JP"));
}

#[tokio::test]
async fn test_switch_applies_language_direction_and_preference() {
    let prefs = Arc::new(MemoryPreferenceStore::new());
    let binding = Arc::new(RecordingBinding::default());
    let manager = LocaleManager::new(
        Arc::new(StaticBundleFetcher::with_builtin()),
        Arc::clone(&prefs) as Arc<dyn PreferenceStore>,
        Arc::clone(&binding) as Arc<dyn DocumentBinding>,
    );

    assert!(manager.switch("ar-SA").await);
    assert_eq!(manager.active(), Locale::ArSa);
    assert_eq!(prefs.load().unwrap().locale.as_deref(), Some("ar-SA"));
    assert_eq!(*binding.languages.lock().unwrap(), ["ar-SA"]);
    assert_eq!(
        *binding.directions.lock().unwrap(),
        [TextDirection::RightToLeft]
    );
    assert_eq!(manager.translate("console-ready"), "وحدة تحكم OpsDeck جاهزة");
}

#[tokio::test]
async fn test_init_restores_persisted_locale() {
    let prefs = Arc::new(MemoryPreferenceStore::with_prefs(Preferences {
        locale: Some("es-ES".to_string()),
    }));
    let binding = Arc::new(RecordingBinding::default());
    let manager = LocaleManager::new(
        Arc::new(StaticBundleFetcher::with_builtin()),
        Arc::clone(&prefs) as Arc<dyn PreferenceStore>,
        binding,
    );

    assert!(manager.init().await);
    assert_eq!(manager.active(), Locale::EsEs);
    assert_eq!(manager.translate("console-ready"), "Consola OpsDeck lista");
}

#[tokio::test]
async fn test_preload_all_tolerates_individual_failures() {
    let manager = LocaleManager::new(
        Arc::new(PartiallyFailingFetcher::failing(vec![Locale::JaJp])),
        Arc::new(MemoryPreferenceStore::new()),
        Arc::new(RecordingBinding::default()),
    );

    manager.preload_all().await;

    let stats = manager.stats();
    assert_eq!(stats.loaded, Locale::all().len() - 1);
    assert_eq!(stats.remaining, 1);
    assert!(!manager.is_loaded("ja-JP"));
    assert!(manager.is_loaded("en-US"));
    assert!(manager.is_loaded("ar-SA"));
}

#[tokio::test]
async fn test_translate_falls_back_until_bundle_arrives() {
    let manager = LocaleManager::new(
        Arc::new(StaticBundleFetcher::with_builtin()),
        Arc::new(MemoryPreferenceStore::new()),
        Arc::new(RecordingBinding::default()),
    );

    // Nothing is loaded yet; the key itself comes back.
    assert_eq!(manager.translate("console-ready"), "console-ready");

    assert!(manager.switch("zh-CN").await);
    assert_eq!(manager.translate("console-ready"), "OpsDeck 控制台已就绪");
}
