//! Translation catalog for message templates.
//!
//! The catalog stores translations in a global, thread-safe registry organized
//! by language code. Translations can be loaded from JSON or registered
//! programmatically.
//!
//! ## JSON Format
//!
//! ```json
//! {
//!   "messages": {
//!     "NotEmpty": "This field is required.",
//!     "{0} must be the same!": "{0} muszą być takie same!"
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::error::FormskitError;

/// A translation catalog for a single language.
#[derive(Debug, Clone, Default)]
pub struct TranslationCatalog {
    messages: HashMap<String, String>,
}

fn global_catalogs() -> &'static RwLock<HashMap<String, TranslationCatalog>> {
    static CATALOGS: OnceLock<RwLock<HashMap<String, TranslationCatalog>>> = OnceLock::new();
    CATALOGS.get_or_init(|| RwLock::new(HashMap::new()))
}

fn with_catalog<F, R>(language: &str, f: F) -> Option<R>
where
    F: FnOnce(&TranslationCatalog) -> Option<R>,
{
    let catalogs = global_catalogs().read().expect("catalog lock poisoned");
    catalogs.get(language).and_then(f)
}

#[allow(clippy::significant_drop_tightening)]
fn with_catalog_mut<F>(language: &str, f: F)
where
    F: FnOnce(&mut TranslationCatalog),
{
    let mut catalogs = global_catalogs().write().expect("catalog lock poisoned");
    let catalog = catalogs.entry(language.to_string()).or_default();
    f(catalog);
}

/// Registers template translations for a language.
///
/// Each entry is a `(template, translated)` pair. Entries are merged into any
/// existing catalog for the language, overwriting duplicates.
///
/// # Examples
///
/// ```
/// use formskit_core::i18n::catalog;
///
/// catalog::register_translations("fr", vec![("NotEmpty", "Ce champ est obligatoire.")]);
/// assert!(catalog::has_language("fr"));
/// ```
pub fn register_translations(language: &str, entries: Vec<(&str, &str)>) {
    with_catalog_mut(language, |catalog| {
        for (msgid, translated) in entries {
            catalog
                .messages
                .insert(msgid.to_string(), translated.to_string());
        }
    });
}

/// Loads translations for a language from a JSON string.
///
/// The `messages` key is optional; non-string entries are skipped.
pub fn load_from_json(language: &str, json_str: &str) -> Result<(), FormskitError> {
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FormskitError::SerializationError(format!("Invalid catalog JSON: {e}")))?;

    with_catalog_mut(language, |catalog| {
        if let Some(messages) = value.get("messages").and_then(|v| v.as_object()) {
            for (msgid, translated) in messages {
                if let Some(t) = translated.as_str() {
                    catalog.messages.insert(msgid.clone(), t.to_string());
                }
            }
        }
    });

    Ok(())
}

/// Looks up a translation in the catalog.
pub fn translate(language: &str, msgid: &str) -> Option<String> {
    with_catalog(language, |catalog| catalog.messages.get(msgid).cloned())
}

/// Returns `true` if translations are registered for the given language.
pub fn has_language(language: &str) -> bool {
    let catalogs = global_catalogs().read().expect("catalog lock poisoned");
    catalogs.contains_key(language)
}

/// Returns all languages that have translations registered.
pub fn available_languages() -> Vec<String> {
    let catalogs = global_catalogs().read().expect("catalog lock poisoned");
    catalogs.keys().cloned().collect()
}

/// Clears all translations for a given language.
pub fn clear_language(language: &str) {
    let mut catalogs = global_catalogs().write().expect("catalog lock poisoned");
    catalogs.remove(language);
}

/// Clears all translation catalogs.
pub fn clear_all() {
    let mut catalogs = global_catalogs().write().expect("catalog lock poisoned");
    catalogs.clear();
}
