//! Fluent message catalog.
//!
//! T041: Implement MessageCatalog install/format with en-US fallback

use crate::i18n::Locale;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use std::collections::HashMap;

/// Per-locale Fluent bundles.
///
/// Bundles are installed from raw FTL source as locales load; formatting
/// falls back to `en-US` and finally to the message key, so a missing
/// translation never fails the caller.
pub struct MessageCatalog {
    /// Installed bundles (locale -> bundle)
    bundles: HashMap<Locale, FluentBundle<FluentResource>>,
}

impl MessageCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            bundles: HashMap::new(),
        }
    }

    /// Parse FTL source and install it as the locale's bundle.
    ///
    /// Replaces any bundle previously installed for the locale.
    pub fn install(&mut self, locale: Locale, source: &str) -> Result<(), CatalogError> {
        let resource = FluentResource::try_new(source.to_owned()).map_err(|(_, errors)| {
            CatalogError::Parse(format!(
                "{} syntax error(s) in {} bundle",
                errors.len(),
                locale.tag()
            ))
        })?;

        let mut bundle = FluentBundle::new_concurrent(vec![locale.lang_id()]);
        // Keep formatted values free of Unicode isolation marks.
        bundle.set_use_isolating(false);
        bundle.add_resource_overriding(resource);

        self.bundles.insert(locale, bundle);
        Ok(())
    }

    /// Format a message, falling back to en-US and then to the key itself.
    pub fn format(&self, locale: Locale, key: &str, args: Option<&FluentArgs>) -> String {
        for candidate in [locale, Locale::EnUs] {
            if let Some(value) = self.format_in(candidate, key, args) {
                return value;
            }
        }
        key.to_string()
    }

    /// Format a message in exactly one locale's bundle.
    fn format_in(&self, locale: Locale, key: &str, args: Option<&FluentArgs>) -> Option<String> {
        let bundle = self.bundles.get(&locale)?;
        let message = bundle.get_message(key)?;
        let pattern = message.value()?;

        let mut errors = Vec::new();
        let value = bundle.format_pattern(pattern, args, &mut errors);
        if errors.is_empty() {
            Some(value.into_owned())
        } else {
            None
        }
    }

    /// Whether a bundle is installed for the locale.
    pub fn has_bundle(&self, locale: Locale) -> bool {
        self.bundles.contains_key(&locale)
    }

    /// Number of installed bundles.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether the catalog holds no bundles.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Drop every installed bundle.
    pub fn clear(&mut self) {
        self.bundles.clear();
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Parse error: {0}")]
    Parse(String),
}
