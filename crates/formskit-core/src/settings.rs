//! Settings for formskit.
//!
//! [`Settings`] holds the toolkit configuration and [`LazySettings`] is the
//! globally accessible instance read by forms and validators at construction
//! time. Forms created before [`SETTINGS`] is configured see the defaults.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// What a form does when a non-ignored field is absent from a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Treat the field as submitted with no values and validate it normally.
    #[default]
    Validate,
    /// Fail ingestion with `FormskitError::ValueNotPresent`.
    Reject,
}

/// The complete set of toolkit settings.
///
/// # Examples
///
/// ```
/// use formskit_core::settings::{MissingValuePolicy, Settings};
///
/// let settings = Settings::default();
/// assert_eq!(settings.form_name_key, "form_name");
/// assert_eq!(settings.missing_values, MissingValuePolicy::Validate);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Forms ────────────────────────────────────────────────────────

    /// The submission key whose value identifies which form was submitted.
    pub form_name_key: String,
    /// How absent fields are handled during ingestion.
    pub missing_values: MissingValuePolicy,
    /// Message template overrides, keyed by validator code (e.g. "NotEmpty").
    pub messages: HashMap<String, String>,

    // ── Internationalization ─────────────────────────────────────────

    /// The language code (e.g. "en-us").
    pub language_code: String,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter (e.g. "info", "formskit_forms=debug").
    pub log_level: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Settings {
    /// Returns the configured template for a validator code, or `default`.
    pub fn message_template<'a>(&'a self, code: &str, default: &'a str) -> &'a str {
        self.messages.get(code).map_or(default, String::as_str)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            form_name_key: "form_name".to_string(),
            missing_values: MissingValuePolicy::Validate,
            messages: HashMap::new(),
            language_code: "en-us".to_string(),
            log_level: "info".to_string(),
            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup. Reading
/// through [`get`](LazySettings::get) before that freezes the defaults.
///
/// # Panics
///
/// [`configure`](LazySettings::configure) panics if settings were already
/// configured or already read.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called at most once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns the configured settings, or the defaults if none were set.
    pub fn get(&self) -> &Settings {
        self.inner.get_or_init(Settings::default)
    }

    /// Returns `true` if settings have been configured or read.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.form_name_key, "form_name");
        assert_eq!(s.missing_values, MissingValuePolicy::Validate);
        assert!(s.messages.is_empty());
        assert_eq!(s.language_code, "en-us");
        assert_eq!(s.log_level, "info");
    }

    #[test]
    fn test_message_template_override() {
        let mut s = Settings::default();
        assert_eq!(s.message_template("NotEmpty", "NotEmpty"), "NotEmpty");
        s.messages
            .insert("NotEmpty".to_string(), "This field is required.".to_string());
        assert_eq!(
            s.message_template("NotEmpty", "NotEmpty"),
            "This field is required."
        );
    }

    #[test]
    fn test_missing_value_policy_serde() {
        let json = serde_json::to_value(MissingValuePolicy::Reject).unwrap();
        assert_eq!(json, serde_json::json!("reject"));
        let back: MissingValuePolicy = serde_json::from_value(serde_json::json!("validate")).unwrap();
        assert_eq!(back, MissingValuePolicy::Validate);
    }

    #[test]
    fn test_lazy_settings_configure_and_get() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());

        let settings = Settings {
            form_name_key: "__form__".to_string(),
            ..Settings::default()
        };

        lazy.configure(settings);
        assert!(lazy.is_configured());
        assert_eq!(lazy.get().form_name_key, "__form__");
    }

    #[test]
    fn test_lazy_settings_get_defaults_when_unconfigured() {
        let lazy = LazySettings::new();
        assert_eq!(lazy.get().form_name_key, "form_name");
        assert!(lazy.is_configured());
    }

    #[test]
    #[should_panic(expected = "already been configured")]
    fn test_lazy_settings_double_configure_panics() {
        let lazy = LazySettings::new();
        lazy.configure(Settings::default());
        lazy.configure(Settings::default());
    }
}
