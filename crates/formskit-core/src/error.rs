//! Core error types for formskit.
//!
//! [`FormskitError`] separates the failure classes of form processing:
//! references to fields the form structure does not know about, values that
//! are required to be present, index lookups, and configuration problems.
//! Ordinary validation failures are *not* errors; they are accumulated as
//! messages on fields and forms. The one exception is [`ValidationError`],
//! which carries a failed cross-field validator's outcome to the form.

use std::fmt;

use thiserror::Error;

use crate::message::Message;

/// The failure raised by a form-level (cross-field) validator.
///
/// # Examples
///
/// ```
/// use formskit_core::error::ValidationError;
/// use formskit_core::Message;
///
/// let err = ValidationError::new("MustMatch", Message::new("{0} must be the same!").arg("input"));
/// assert_eq!(err.code, "MustMatch");
/// assert_eq!(err.to_string(), "input must be the same!");
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// A short code identifying the validator that failed (e.g. "MustMatch").
    pub code: String,
    /// The message to record on the form.
    pub message: Message,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a code and message.
    pub fn new(code: impl Into<String>, message: Message) -> Self {
        Self {
            code: code.into(),
            message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for formskit.
#[derive(Error, Debug)]
pub enum FormskitError {
    // ── Structure references ─────────────────────────────────────────

    /// A key in the submitted data does not name a field the form knows,
    /// or an identifier token could not be decoded.
    #[error("Bad field reference: {0}")]
    BadFieldReference(String),

    /// A required field was absent from the submitted data.
    #[error("Value not present: {0}")]
    ValueNotPresent(String),

    /// A decoded identifier resolved to a form that has no such field.
    #[error("Form '{form}' has no field '{field}'")]
    FieldNotFound {
        /// The form that was searched.
        form: String,
        /// The missing field name.
        field: String,
    },

    /// A sub-form type was requested that was never registered.
    #[error("Form '{form}' has no sub-form '{name}'")]
    SubFormNotFound {
        /// The parent form that was searched.
        form: String,
        /// The missing sub-form name.
        name: String,
    },

    /// A value index past the end of a field's values was requested.
    #[error("Field '{field}' has no value at index {index}")]
    ValueIndexOutOfRange {
        /// The field name.
        field: String,
        /// The requested index.
        index: usize,
    },

    // ── Validation ───────────────────────────────────────────────────

    /// A form-level validator failed.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormskitError {
    /// Returns `true` if this error was caused by the submitted data rather
    /// than by the program's configuration.
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::BadFieldReference(_)
                | Self::ValueNotPresent(_)
                | Self::FieldNotFound { .. }
                | Self::SubFormNotFound { .. }
        )
    }
}

impl From<ValidationError> for FormskitError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

/// A convenience type alias for `Result<T, FormskitError>`.
pub type FormskitResult<T> = Result<T, FormskitError>;
