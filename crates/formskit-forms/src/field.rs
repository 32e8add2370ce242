//! Field definitions and field instances.
//!
//! A [`FieldDef`] is the immutable specification of a field: its name,
//! label, validators and converter. It is shared (behind an [`Arc`]) by every
//! [`Field`] created from it, so repeated sub-form rows never alias each
//! other's state.
//!
//! A [`Field`] holds what was submitted as an ordered list of
//! [`FieldValue`]s, each keeping its raw wire string and its own validation
//! outcome.

use std::sync::Arc;

use formskit_core::{FormskitError, FormskitResult, Message};

use crate::converters::{Converter, PassThrough};
use crate::validators::Validator;
use crate::value::Value;

/// The immutable specification of a field.
///
/// # Examples
///
/// ```
/// use formskit_forms::converters::ToInt;
/// use formskit_forms::field::FieldDef;
/// use formskit_forms::validators::{IsDigit, NotEmpty};
///
/// let def = FieldDef::new("age")
///     .label("Age")
///     .validator(NotEmpty::new())
///     .validator(IsDigit::new())
///     .converter(ToInt);
/// assert_eq!(def.name, "age");
/// assert_eq!(def.validators.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// The field name, unique within its form.
    pub name: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Ignored fields are inert to submissions and resets and are left out
    /// of data dictionaries.
    pub ignore: bool,
    /// Raw values written into every new instance.
    pub initial: Vec<String>,
    /// Validators, run in order.
    pub validators: Vec<Arc<dyn Validator>>,
    /// The converter between wire strings and domain values.
    pub converter: Arc<dyn Converter>,
}

impl FieldDef {
    /// Creates a definition with no validators and the pass-through converter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            ignore: false,
            initial: Vec::new(),
            validators: Vec::new(),
            converter: Arc::new(PassThrough),
        }
    }

    /// Creates a button: an ignored field whose value is its label.
    ///
    /// The label survives submissions and resets, so a rendered form always
    /// shows the button's caption.
    pub fn button(name: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self::new(name)
            .ignore(true)
            .initial([label.clone()])
            .label(label)
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets whether the field is ignored.
    #[must_use]
    pub const fn ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    /// Sets the raw values every new instance starts with.
    #[must_use]
    pub fn initial<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial = values.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Adds an already shared validator.
    #[must_use]
    pub fn shared_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Sets the converter.
    #[must_use]
    pub fn converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converter = Arc::new(converter);
        self
    }
}

/// One submitted value of a field and its validation outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValue {
    /// The raw wire value. `None` when a converter mapped a domain null back.
    pub value: Option<String>,
    /// Whether a value-level validator failed on this value.
    pub error: bool,
    /// Messages from failed value-level validators.
    pub messages: Vec<Message>,
}

impl FieldValue {
    /// Creates an unvalidated value.
    pub const fn new(value: Option<String>) -> Self {
        Self {
            value,
            error: false,
            messages: Vec::new(),
        }
    }

    /// Marks this value as failed.
    pub fn set_error(&mut self, message: Message) {
        self.error = true;
        self.messages.push(message);
    }
}

/// A field instance owned by a form.
///
/// # Examples
///
/// ```
/// use formskit_forms::converters::ToInt;
/// use formskit_forms::field::{Field, FieldDef};
/// use formskit_forms::validators::IsDigit;
/// use formskit_forms::value::Value;
///
/// let mut field = Field::new(FieldDef::new("age").validator(IsDigit::new()).converter(ToInt));
/// field.set_values(["42", "x"]);
///
/// assert!(!field.validate());
/// assert_eq!(field.get_value(0).unwrap(), Value::Int(42));
/// assert_eq!(field.get_value(1).unwrap(), Value::Null);
/// assert!(field.values()[1].error);
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    def: Arc<FieldDef>,
    values: Vec<FieldValue>,
    error: bool,
    messages: Vec<Message>,
    submitted: bool,
}

impl Field {
    /// Creates a fresh instance of a definition.
    pub fn new(def: impl Into<Arc<FieldDef>>) -> Self {
        let def = def.into();
        let values = def
            .initial
            .iter()
            .map(|v| FieldValue::new(Some(v.clone())))
            .collect();
        Self {
            def,
            values,
            error: false,
            messages: Vec::new(),
            submitted: false,
        }
    }

    /// Creates a fresh instance sharing this field's definition.
    ///
    /// Submitted values and validation state are not carried over.
    #[must_use]
    pub fn instantiate(&self) -> Self {
        Self::new(Arc::clone(&self.def))
    }

    /// Returns the shared definition.
    pub const fn def(&self) -> &Arc<FieldDef> {
        &self.def
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.def.name
    }

    /// Returns the label, if one was defined.
    pub fn label(&self) -> Option<&str> {
        self.def.label.as_deref()
    }

    /// Returns `true` if the field is ignored.
    pub fn is_ignored(&self) -> bool {
        self.def.ignore
    }

    /// Returns the submitted values.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Returns the field-level messages.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns `true` if the last validation failed.
    pub const fn is_error(&self) -> bool {
        self.error
    }

    /// Returns `true` if the values were written by an ingestion.
    pub const fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Replaces the values with the given raw strings.
    ///
    /// Ignored fields are left untouched.
    pub fn set_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.def.ignore {
            return;
        }
        self.set_values_forced(values);
    }

    /// Replaces the values even if the field is ignored.
    pub fn set_values_forced<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values
            .into_iter()
            .map(|v| FieldValue::new(Some(v.into())))
            .collect();
        self.submitted = true;
    }

    /// Writes a domain value at `index`, or appends it if `index` is past
    /// the end.
    ///
    /// Ignored fields are left untouched.
    pub fn set_value(&mut self, value: impl Into<Value>, index: usize) {
        if self.def.ignore {
            return;
        }
        self.set_value_forced(value, index);
    }

    /// Writes a domain value even if the field is ignored.
    pub fn set_value_forced(&mut self, value: impl Into<Value>, index: usize) {
        let raw = self.def.converter.back(&value.into());
        match self.values.get_mut(index) {
            Some(existing) => *existing = FieldValue::new(raw),
            None => self.values.push(FieldValue::new(raw)),
        }
    }

    /// Returns the converted value at `index`.
    pub fn get_value(&self, index: usize) -> FormskitResult<Value> {
        self.values
            .get(index)
            .map(|v| self.def.converter.convert(v.value.as_deref()))
            .ok_or_else(|| FormskitError::ValueIndexOutOfRange {
                field: self.def.name.clone(),
                index,
            })
    }

    /// Returns the converted value at `index`, or `default` if absent.
    pub fn get_value_or(&self, index: usize, default: Value) -> Value {
        self.get_value(index).unwrap_or(default)
    }

    /// Returns every value, converted.
    pub fn get_values(&self) -> Vec<Value> {
        self.values
            .iter()
            .map(|v| self.def.converter.convert(v.value.as_deref()))
            .collect()
    }

    /// Returns the raw wire value at `index`.
    pub fn raw_value(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.value.as_deref())
    }

    /// Runs the converter's fix-up and every validator; returns `true` if the
    /// field passed.
    ///
    /// Field-level checks run first. If any of them fails, value-level
    /// checks are skipped.
    pub fn validate(&mut self) -> bool {
        self.clear_validation();
        let def = Arc::clone(&self.def);

        def.converter.make_field(&mut self.values, self.submitted);

        for validator in def.validators.iter().filter(|v| v.checks().field) {
            if !validator.validate_field(self) {
                self.set_error(validator.message());
            }
        }

        if !self.error {
            for validator in def.validators.iter().filter(|v| v.checks().value) {
                for value in &mut self.values {
                    if !validator.validate_value(value) {
                        value.set_error(validator.message());
                        self.error = true;
                    }
                }
            }
        }

        tracing::trace!(field = %def.name, success = !self.error, "field validated");
        !self.error
    }

    /// Clears values, messages and flags. Ignored fields are left untouched.
    pub fn reset(&mut self) {
        if self.def.ignore {
            return;
        }
        self.reset_forced();
    }

    /// Clears values, messages and flags even if the field is ignored.
    pub fn reset_forced(&mut self) {
        self.values.clear();
        self.messages.clear();
        self.error = false;
        self.submitted = false;
    }

    /// Marks the field as failed with a message.
    pub fn set_error(&mut self, message: impl Into<Message>) {
        self.error = true;
        self.messages.push(message.into());
    }

    fn clear_validation(&mut self) {
        self.error = false;
        self.messages.clear();
        for value in &mut self.values {
            value.error = false;
            value.messages.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::{ToBool, ToInt};
    use crate::validators::{IsDigit, NeedToHaveValue, NotEmpty};

    #[test]
    fn test_set_values_marks_submitted() {
        let mut field = Field::new(FieldDef::new("name"));
        assert!(!field.is_submitted());
        field.set_values(["a", "b"]);
        assert!(field.is_submitted());
        assert_eq!(field.raw_value(1), Some("b"));
        field.set_values(["c"]);
        assert_eq!(field.values().len(), 1);
    }

    #[test]
    fn test_ignored_field_is_inert() {
        let mut field = Field::new(FieldDef::new("btn").ignore(true));
        field.set_values(["x"]);
        field.set_value("y", 0);
        assert!(field.values().is_empty());

        field.set_values_forced(["forced"]);
        field.reset();
        assert_eq!(field.raw_value(0), Some("forced"));

        field.reset_forced();
        assert!(field.values().is_empty());
    }

    #[test]
    fn test_button_keeps_label() {
        let mut field = Field::new(FieldDef::button("submit", "Save"));
        assert!(field.is_ignored());
        assert_eq!(field.label(), Some("Save"));
        field.set_values(["clicked"]);
        field.reset();
        assert_eq!(field.raw_value(0), Some("Save"));
    }

    #[test]
    fn test_set_value_uses_converter() {
        let mut field = Field::new(FieldDef::new("n").converter(ToInt));
        field.set_value(5, 0);
        field.set_value(7, 9);
        field.set_value(6, 0);
        assert_eq!(field.raw_value(0), Some("6"));
        assert_eq!(field.get_values(), vec![Value::Int(6), Value::Int(7)]);

        field.set_value(Value::Null, 1);
        assert_eq!(field.raw_value(1), None);
        assert_eq!(field.get_value(1).unwrap(), Value::Null);
    }

    #[test]
    fn test_get_value_out_of_range() {
        let field = Field::new(FieldDef::new("n"));
        let err = field.get_value(0).unwrap_err();
        assert!(matches!(
            err,
            FormskitError::ValueIndexOutOfRange { ref field, index: 0 } if field == "n"
        ));
        assert_eq!(field.get_value_or(0, Value::from("d")), Value::from("d"));
    }

    #[test]
    fn test_field_check_skips_value_checks() {
        let mut field = Field::new(
            FieldDef::new("name2")
                .validator(NotEmpty::new())
                .validator(IsDigit::new()),
        );
        field.set_values(Vec::<String>::new());
        assert!(!field.validate());
        assert_eq!(field.messages().len(), 1);
        assert_eq!(field.messages()[0].render(), "NotEmpty");
    }

    #[test]
    fn test_value_errors_recorded_on_values() {
        let mut field = Field::new(FieldDef::new("n").validator(IsDigit::new()));
        field.set_values(["1", "x", "3"]);
        assert!(!field.validate());
        assert!(field.messages().is_empty());
        assert!(!field.values()[0].error);
        assert!(field.values()[1].error);
        assert_eq!(field.values()[1].messages[0].render(), "IsDigit");
        assert!(!field.values()[2].error);
    }

    #[test]
    fn test_validate_clears_previous_outcome() {
        let mut field = Field::new(FieldDef::new("n").validator(NeedToHaveValue::new()));
        assert!(!field.validate());
        field.set_values(["1"]);
        assert!(field.validate());
        assert!(field.messages().is_empty());
    }

    #[test]
    fn test_validate_runs_make_field_with_no_values() {
        let mut field = Field::new(FieldDef::new("agree").converter(ToBool));
        assert!(field.validate());
        assert_eq!(field.get_value(0).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_instantiate_is_independent() {
        let mut template = Field::new(FieldDef::new("n"));
        template.set_values(["a"]);
        let mut copy = template.instantiate();
        assert!(copy.values().is_empty());
        copy.set_values(["b"]);
        assert_eq!(template.raw_value(0), Some("a"));
        assert!(Arc::ptr_eq(template.def(), copy.def()));
    }

    #[test]
    fn test_set_error() {
        let mut field = Field::new(FieldDef::new("n"));
        field.set_error("external problem");
        assert!(field.is_error());
        assert_eq!(field.messages()[0].render(), "external problem");
    }
}
