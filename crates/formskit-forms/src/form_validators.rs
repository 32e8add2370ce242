//! Cross-field validators bound to a form.
//!
//! Form validators run after every field of a form passed its own
//! validation. They run in registration order and the first failure stops
//! the rest; its message is recorded on the form.

use std::fmt;
use std::sync::Arc;

use formskit_core::{Message, ValidationError};

use crate::form::BaseForm;

/// A validator that looks at several fields of one form.
pub trait FormValidator: Send + Sync + fmt::Debug {
    /// Returns `true` if the form satisfies the constraint.
    fn validate(&self, form: &BaseForm) -> bool;

    /// The code identifying this validator.
    fn code(&self) -> &str;

    /// The message recorded on the form on failure.
    fn message(&self) -> Message;

    /// Runs [`validate`](Self::validate), turning a failure into a
    /// [`ValidationError`].
    fn check(&self, form: &BaseForm) -> Result<(), ValidationError> {
        if self.validate(form) {
            Ok(())
        } else {
            Err(ValidationError::new(self.code(), self.message()))
        }
    }
}

/// Requires the first value of every named field to be equal.
///
/// A field that is missing or has no values counts as an absent value, so
/// it only matches other absent values.
///
/// # Examples
///
/// ```
/// use formskit_forms::form_validators::{FormValidator, MustMatch};
/// use formskit_forms::prelude::*;
///
/// let mut form = BaseForm::new("Signup")
///     .field(FieldDef::new("password"))
///     .field(FieldDef::new("confirm"));
/// form.field_mut("password").unwrap().set_values(["s3cret"]);
/// form.field_mut("confirm").unwrap().set_values(["secret"]);
///
/// let v = MustMatch::new(["password", "confirm"]).label("Passwords");
/// assert!(!v.validate(&form));
/// assert_eq!(v.message().render(), "Passwords must be the same!");
/// ```
#[derive(Debug, Clone)]
pub struct MustMatch {
    names: Vec<String>,
    label: String,
    template: String,
}

impl MustMatch {
    /// The default message template.
    pub const TEMPLATE: &'static str = "{0} must be the same!";

    /// Creates the validator for the given field names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            label: "input".to_string(),
            template: Self::TEMPLATE.to_string(),
        }
    }

    /// Sets the label substituted into the message.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Replaces the message template. `{0}` is the label.
    #[must_use]
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }
}

impl FormValidator for MustMatch {
    fn validate(&self, form: &BaseForm) -> bool {
        let mut firsts = self
            .names
            .iter()
            .map(|name| form.fields().get(name).and_then(|f| f.raw_value(0)));

        match firsts.next() {
            Some(first) => firsts.all(|value| value == first),
            None => true,
        }
    }

    fn code(&self) -> &str {
        "MustMatch"
    }

    fn message(&self) -> Message {
        Message::new(self.template.as_str()).arg(&self.label)
    }
}

type Predicate = Arc<dyn Fn(&BaseForm) -> bool + Send + Sync>;

/// A form validator backed by a closure.
///
/// # Examples
///
/// ```
/// use formskit_forms::form_validators::{FnFormValidator, FormValidator};
/// use formskit_forms::prelude::*;
///
/// let v = FnFormValidator::new("HasName", "A name is required", |form: &BaseForm| {
///     form.fields().get("name").is_some_and(|f| !f.values().is_empty())
/// });
/// let form = BaseForm::new("F").field(FieldDef::new("name"));
/// assert!(v.check(&form).is_err());
/// ```
#[derive(Clone)]
pub struct FnFormValidator {
    code: String,
    template: String,
    predicate: Predicate,
}

impl FnFormValidator {
    /// Creates a validator from a code, a message template and a predicate.
    pub fn new<F>(code: impl Into<String>, template: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&BaseForm) -> bool + Send + Sync + 'static,
    {
        Self {
            code: code.into(),
            template: template.into(),
            predicate: Arc::new(predicate),
        }
    }
}

impl fmt::Debug for FnFormValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFormValidator")
            .field("code", &self.code)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

impl FormValidator for FnFormValidator {
    fn validate(&self, form: &BaseForm) -> bool {
        (self.predicate)(form)
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn message(&self) -> Message {
        Message::new(self.template.as_str())
    }
}
