//! Field validators.
//!
//! A validator declares which checks it performs through [`Checks`]:
//!
//! - a **field** check runs once per validation pass and sees the whole
//!   field (e.g. "at least one value was submitted"). Failure marks the
//!   field and records the message on the field.
//! - a **value** check runs once per submitted value. Failure marks the
//!   value and the field and records the message on the value.
//!
//! Value checks are skipped entirely for a field that already failed a field
//! check. Validators are stateless and shared between every field instance
//! created from one definition.
//!
//! Each validator's message template defaults to its [`code`](Validator::code).
//! Templates can be replaced per instance with `with_message`, or globally
//! through [`Settings::messages`](formskit_core::Settings::messages) keyed by
//! code.

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use formskit_core::{Message, SETTINGS};

use crate::field::{Field, FieldValue};

/// The kinds of check a validator performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checks {
    /// Runs [`Validator::validate_field`].
    pub field: bool,
    /// Runs [`Validator::validate_value`].
    pub value: bool,
}

impl Checks {
    /// Field-level checks only.
    pub const FIELD: Self = Self {
        field: true,
        value: false,
    };
    /// Value-level checks only.
    pub const VALUE: Self = Self {
        field: false,
        value: true,
    };
    /// Both kinds of check.
    pub const BOTH: Self = Self {
        field: true,
        value: true,
    };
}

/// A pluggable field validator.
///
/// # Examples
///
/// ```
/// use formskit_forms::field::FieldValue;
/// use formskit_forms::validators::{IsDigit, Validator};
///
/// let v = IsDigit::new();
/// assert!(v.validate_value(&FieldValue::new(Some("-12".into()))));
/// assert!(!v.validate_value(&FieldValue::new(Some("12a".into()))));
/// assert_eq!(v.message().render(), "IsDigit");
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// The code identifying this validator; also the default template.
    fn code(&self) -> &str;

    /// Which checks this validator performs.
    fn checks(&self) -> Checks;

    /// The field-level check. Only called when `checks().field` is set.
    fn validate_field(&self, _field: &Field) -> bool {
        true
    }

    /// The value-level check. Only called when `checks().value` is set.
    fn validate_value(&self, _value: &FieldValue) -> bool {
        true
    }

    /// The message recorded on failure.
    fn message(&self) -> Message {
        resolve_message(self.code(), None)
    }
}

/// Picks the template for a validator: instance override, then configured
/// override, then the code itself.
fn resolve_message(code: &str, custom: Option<&str>) -> Message {
    let template = custom.unwrap_or_else(|| SETTINGS.get().message_template(code, code));
    Message::new(template)
}

macro_rules! message_override {
    ($ty:ident) => {
        impl $ty {
            /// Replaces the message template for this instance.
            #[must_use]
            pub fn with_message(mut self, template: impl Into<String>) -> Self {
                self.message = Some(template.into());
                self
            }
        }
    };
}

/// Fails unless the field has at least one value.
#[derive(Debug, Clone, Default)]
pub struct NeedToHaveValue {
    message: Option<String>,
}

impl NeedToHaveValue {
    /// Creates the validator.
    pub fn new() -> Self {
        Self::default()
    }
}

message_override!(NeedToHaveValue);

impl Validator for NeedToHaveValue {
    fn code(&self) -> &str {
        "NeedToHaveValue"
    }

    fn checks(&self) -> Checks {
        Checks::FIELD
    }

    fn validate_field(&self, field: &Field) -> bool {
        !field.values().is_empty()
    }

    fn message(&self) -> Message {
        resolve_message(self.code(), self.message.as_deref())
    }
}

/// Requires at least one value, and every value to be non-blank.
#[derive(Debug, Clone, Default)]
pub struct NotEmpty {
    message: Option<String>,
}

impl NotEmpty {
    /// Creates the validator.
    pub fn new() -> Self {
        Self::default()
    }
}

message_override!(NotEmpty);

impl Validator for NotEmpty {
    fn code(&self) -> &str {
        "NotEmpty"
    }

    fn checks(&self) -> Checks {
        Checks::BOTH
    }

    fn validate_field(&self, field: &Field) -> bool {
        !field.values().is_empty()
    }

    fn validate_value(&self, value: &FieldValue) -> bool {
        value.value.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    fn message(&self) -> Message {
        resolve_message(self.code(), self.message.as_deref())
    }
}

/// Accepts optionally negative integers. Empty values pass.
#[derive(Debug, Clone, Default)]
pub struct IsDigit {
    message: Option<String>,
}

impl IsDigit {
    /// Creates the validator.
    pub fn new() -> Self {
        Self::default()
    }
}

message_override!(IsDigit);

fn digit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]+$").expect("invalid digit regex"))
}

impl Validator for IsDigit {
    fn code(&self) -> &str {
        "IsDigit"
    }

    fn checks(&self) -> Checks {
        Checks::VALUE
    }

    fn validate_value(&self, value: &FieldValue) -> bool {
        match value.value.as_deref() {
            None | Some("") => true,
            Some(v) => digit_regex().is_match(v),
        }
    }

    fn message(&self) -> Message {
        resolve_message(self.code(), self.message.as_deref())
    }
}

/// Accepts decimal literals: optional sign, digits with an optional
/// fraction, an optional exponent, `Infinity`/`inf` and `NaN`/`sNaN`.
/// Surrounding whitespace is allowed, and so is a single `_` between two
/// digits (`1_000.000_1`).
#[derive(Debug, Clone, Default)]
pub struct IsDecimal {
    message: Option<String>,
}

impl IsDecimal {
    /// Creates the validator.
    pub fn new() -> Self {
        Self::default()
    }
}

message_override!(IsDecimal);

fn decimal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*[+-]?((\d(_?\d)*(\.(\d(_?\d)*)?)?|\.\d(_?\d)*)(e[+-]?\d(_?\d)*)?|inf(inity)?|s?nan(\d(_?\d)*)?)\s*$",
        )
        .expect("invalid decimal regex")
    })
}

impl Validator for IsDecimal {
    fn code(&self) -> &str {
        "IsDecimal"
    }

    fn checks(&self) -> Checks {
        Checks::VALUE
    }

    fn validate_value(&self, value: &FieldValue) -> bool {
        value
            .value
            .as_deref()
            .is_some_and(|v| decimal_regex().is_match(v))
    }

    fn message(&self) -> Message {
        resolve_message(self.code(), self.message.as_deref())
    }
}

/// A permissive email check: longer than seven characters, with a local
/// part, an `@` and a dotted domain (or bracketed numeric address).
#[derive(Debug, Clone, Default)]
pub struct IsEmail {
    message: Option<String>,
}

impl IsEmail {
    /// Creates the validator.
    pub fn new() -> Self {
        Self::default()
    }
}

message_override!(IsEmail);

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^.+@(\[?)[a-zA-Z0-9\-.]+\.([a-zA-Z]{2,3}|[0-9]{1,3})(\]?)$")
            .expect("invalid email regex")
    })
}

impl Validator for IsEmail {
    fn code(&self) -> &str {
        "IsEmail"
    }

    fn checks(&self) -> Checks {
        Checks::VALUE
    }

    fn validate_value(&self, value: &FieldValue) -> bool {
        value
            .value
            .as_deref()
            .is_some_and(|v| v.chars().count() > 7 && email_regex().is_match(v))
    }

    fn message(&self) -> Message {
        resolve_message(self.code(), self.message.as_deref())
    }
}

type Choices = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

#[derive(Clone)]
enum ChoiceSource {
    Static(Vec<String>),
    Dynamic(Choices),
}

impl fmt::Debug for ChoiceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(values) => f.debug_tuple("Static").field(values).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Requires every value to be one of an allowed set.
///
/// The set is either fixed, or produced by a closure that is called afresh
/// for every check, so it can track data that changes between submissions.
///
/// # Examples
///
/// ```
/// use formskit_forms::field::FieldValue;
/// use formskit_forms::validators::{InList, Validator};
///
/// let v = InList::new(["red", "green"]);
/// assert!(v.validate_value(&FieldValue::new(Some("red".into()))));
/// assert!(!v.validate_value(&FieldValue::new(Some("blue".into()))));
///
/// let v = InList::dynamic(|| vec!["now".to_string()]);
/// assert!(v.validate_value(&FieldValue::new(Some("now".into()))));
/// ```
#[derive(Debug, Clone)]
pub struct InList {
    source: ChoiceSource,
    message: Option<String>,
}

impl InList {
    /// Allows a fixed set of values.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: ChoiceSource::Static(choices.into_iter().map(Into::into).collect()),
            message: None,
        }
    }

    /// Allows the values returned by `choices` at check time.
    pub fn dynamic<F>(choices: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            source: ChoiceSource::Dynamic(Arc::new(choices)),
            message: None,
        }
    }
}

message_override!(InList);

impl Validator for InList {
    fn code(&self) -> &str {
        "InList"
    }

    fn checks(&self) -> Checks {
        Checks::VALUE
    }

    fn validate_value(&self, value: &FieldValue) -> bool {
        let Some(v) = value.value.as_deref() else {
            return false;
        };
        match &self.source {
            ChoiceSource::Static(choices) => choices.iter().any(|c| c == v),
            ChoiceSource::Dynamic(produce) => produce().iter().any(|c| c == v),
        }
    }

    fn message(&self) -> Message {
        resolve_message(self.code(), self.message.as_deref())
    }
}
