//! Internationalization module for the console.
//!
//! Locale bundles are fetched lazily, one network load per locale at most,
//! and installed into a Fluent message catalog. The active locale drives
//! message formatting, document language/direction attributes, and the
//! persisted preference.

pub mod catalog;
pub mod fetcher;
pub mod manager;

use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use unic_langid::LanguageIdentifier;

// Re-export types
pub use catalog::{CatalogError, MessageCatalog};
pub use fetcher::{BundleFetcher, FetchError, HttpBundleFetcher, StaticBundleFetcher};
pub use fluent_bundle::FluentArgs;
pub use manager::{
    DefaultDocumentBinding, DocumentBinding, LoadStatus, LoadingStats, LocaleManager,
};

/// Supported locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    EnUs,
    ZhCn,
    JaJp,
    ArSa,
    EsEs,
}

/// Horizontal text direction for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

impl TextDirection {
    /// The document attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::LeftToRight => "ltr",
            TextDirection::RightToLeft => "rtl",
        }
    }
}

impl std::fmt::Display for TextDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Locale {
    /// Get the BCP-47 tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::ZhCn => "zh-CN",
            Locale::JaJp => "ja-JP",
            Locale::ArSa => "ar-SA",
            Locale::EsEs => "es-ES",
        }
    }

    /// Get the native display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::EnUs => "English",
            Locale::ZhCn => "简体中文",
            Locale::JaJp => "日本語",
            Locale::ArSa => "العربية",
            Locale::EsEs => "Español",
        }
    }

    /// Get the text direction.
    pub fn direction(&self) -> TextDirection {
        match self {
            Locale::ArSa => TextDirection::RightToLeft,
            _ => TextDirection::LeftToRight,
        }
    }

    /// Get the language identifier.
    pub fn lang_id(&self) -> LanguageIdentifier {
        self.tag().parse().expect("static locale tag parses")
    }

    /// Resolve a tag against the supported set.
    ///
    /// Exact tags and language-only tags both resolve ("en" matches
    /// `en-US`); unknown tags resolve to `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let requested: LanguageIdentifier = tag.trim().parse().ok()?;
        let available: Vec<LanguageIdentifier> = Self::all().iter().map(Locale::lang_id).collect();

        let matched = negotiate_languages(
            &[requested],
            &available,
            None,
            NegotiationStrategy::Filtering,
        );

        let best = matched.first()?;
        Self::all().iter().find(|l| &l.lang_id() == *best).copied()
    }

    /// Get all supported locales.
    pub fn all() -> &'static [Locale] {
        &[
            Locale::EnUs,
            Locale::ZhCn,
            Locale::JaJp,
            Locale::ArSa,
            Locale::EsEs,
        ]
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Detect the system locale and return the best supported match.
pub fn detect_system_locale() -> Locale {
    sys_locale::get_locale()
        .and_then(|tag| Locale::from_tag(&tag))
        .unwrap_or_default()
}
