//! Translation of message templates.
//!
//! Every [`Message`](crate::Message) passes its template through [`gettext`]
//! when it is rendered. With no catalog registered for the active language
//! the lookup is the identity, so untranslated deployments see the templates
//! as written.
//!
//! ```
//! use formskit_core::i18n;
//!
//! i18n::catalog::register_translations("pl", vec![("NotEmpty", "Pole nie może być puste")]);
//!
//! i18n::activate("pl");
//! assert_eq!(i18n::gettext("NotEmpty"), "Pole nie może być puste");
//!
//! i18n::deactivate();
//! assert_eq!(i18n::gettext("NotEmpty"), "NotEmpty");
//! ```

pub mod catalog;

use std::cell::RefCell;

use crate::settings::Settings;

thread_local! {
    static CURRENT_LANGUAGE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Activates the given language code for the current thread.
pub fn activate(language_code: &str) {
    CURRENT_LANGUAGE.with(|cell| {
        *cell.borrow_mut() = Some(language_code.to_string());
    });
}

/// Activates the language configured in `settings.language_code`.
pub fn activate_from_settings(settings: &Settings) {
    activate(&settings.language_code);
}

/// Deactivates the current thread's language, reverting to the default.
///
/// After deactivation, `get_language()` returns `"en"`.
pub fn deactivate() {
    CURRENT_LANGUAGE.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Returns the language code active on the current thread, `"en"` if none.
pub fn get_language() -> String {
    CURRENT_LANGUAGE.with(|cell| cell.borrow().clone().unwrap_or_else(|| "en".to_string()))
}

/// Translates a template using the current thread's active language.
///
/// If no translation is found, returns the original `msgid`.
pub fn gettext(msgid: &str) -> String {
    let lang = get_language();
    catalog::translate(&lang, msgid).unwrap_or_else(|| msgid.to_string())
}
