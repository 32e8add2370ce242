//! Logging integration for formskit.
//!
//! The form engine emits [`tracing`] events; this module installs a
//! subscriber configured from [`Settings`](crate::settings::Settings) and
//! creates per-validation spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug",
/// "formskit_forms=trace"). In debug mode a pretty, human-readable format is
/// used; otherwise a structured JSON format is used. Installing a second
/// subscriber is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one validation pass of a form.
///
/// # Examples
///
/// ```
/// use formskit_core::logging::validation_span;
///
/// let span = validation_span("RegistrationForm");
/// let _guard = span.enter();
/// tracing::debug!("validating");
/// ```
pub fn validation_span(form_name: &str) -> tracing::Span {
    tracing::debug_span!("validate", form = form_name)
}
