//! Storage module for console preferences.

pub mod prefs;

pub use prefs::{
    FilePreferenceStore, MemoryPreferenceStore, Preferences, PreferenceStore, PrefsError,
};
