//! The `Form` trait and the flat [`BaseForm`] implementation.
//!
//! A form ingests a [`RawData`] submission only when the submission names
//! it: the value under the marker key (`form_name` by default) must be
//! exactly the form's name. Every other key is resolved to a field and its
//! values are written. Then every field validates (all of them, so every
//! problem is reported at once) and, only if they all passed, the form
//! validators run in order until the first failure.
//!
//! [`BaseForm`] resolves keys by plain field name.
//! [`TreeForm`](crate::tree_form::TreeForm) resolves encoded identifiers and
//! descends into sub-forms.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use formskit_core::logging::validation_span;
use formskit_core::{FormskitError, FormskitResult, Message, MissingValuePolicy, SETTINGS};

use crate::data::{self, DataDict};
use crate::field::{Field, FieldDef};
use crate::form_validators::FormValidator;
use crate::raw_data::RawData;
use crate::report::{FieldReport, FormReport};
use crate::value::Value;

/// Called with the data dictionary after a successful validation.
pub type SuccessHook = Arc<dyn Fn(&DataDict) + Send + Sync>;

/// Called with the report after a failed validation.
pub type FailHook = Arc<dyn Fn(&FormReport) + Send + Sync>;

/// The protocol shared by every form type.
///
/// Implementors provide structure-specific behaviour (how a key maps to a
/// field, how validation and output recurse); submission handling is
/// provided on top of it.
pub trait Form: Send + Sync {
    /// Returns the flat part of the form.
    fn base(&self) -> &BaseForm;

    /// Returns the flat part of the form mutably.
    fn base_mut(&mut self) -> &mut BaseForm;

    /// Maps a submitted key to the field it addresses.
    fn resolve_field(&mut self, key: &str) -> FormskitResult<&mut Field>;

    /// Validates the already ingested values and records `success`.
    fn run_validation(&mut self) -> bool;

    /// Clears every submitted value and validation outcome.
    fn reset(&mut self);

    /// Returns the validation report.
    fn get_report(&self) -> FormReport;

    /// Returns the converted data.
    fn get_data_dict(&self, minified: bool) -> DataDict;

    /// Writes values from a JSON object of `{field: "v" | ["v", ...]}`.
    fn parse_dict(&mut self, data: &serde_json::Value) -> FormskitResult<()>;

    /// Returns the form name.
    fn name(&self) -> &str {
        self.base().name()
    }

    /// Returns the outcome of the last validation; `None` if not validated.
    fn success(&self) -> Option<bool> {
        self.base().success()
    }

    /// Returns `true` if `raw` is a submission of this form.
    fn is_submitted(&self, raw: &RawData) -> bool {
        let base = self.base();
        raw.get_list(base.form_name_key())
            .is_some_and(|names| names.len() == 1 && names[0] == base.name())
    }

    /// Writes every submitted key except the marker into its field.
    fn parse_raw_data(&mut self, raw: &RawData) -> FormskitResult<()> {
        let marker = self.base().form_name_key().to_string();
        let mut written = 0usize;

        for (key, values) in raw.iter() {
            if *key == marker {
                continue;
            }
            self.resolve_field(key)?
                .set_values(values.iter().map(String::as_str));
            written += 1;
        }
        tracing::debug!(form = %self.name(), keys = written, "ingested submission");

        if self.base().missing_values() == MissingValuePolicy::Reject {
            if let Some(field) = self
                .base()
                .fields()
                .values()
                .find(|f| !f.is_ignored() && !f.is_submitted())
            {
                return Err(FormskitError::ValueNotPresent(field.name().to_string()));
            }
        }
        Ok(())
    }

    /// Handles a submission.
    ///
    /// Returns `Ok(None)` without touching the form if `raw` is not a
    /// submission of this form. Otherwise ingests it, validates, calls the
    /// success or failure hook and returns the outcome.
    ///
    /// Values written since the last [`reset`](Self::reset) by other means
    /// (e.g. [`parse_dict`](Self::parse_dict)) are kept unless the
    /// submission overwrites them. State left by a previous submission is
    /// not: if the form already ingested one, it is reset first, so fields
    /// and sub-form rows absent from `raw` do not carry over.
    fn validate(&mut self, raw: &RawData) -> FormskitResult<Option<bool>> {
        if !self.is_submitted(raw) {
            tracing::debug!(form = %self.name(), "not submitted");
            return Ok(None);
        }

        let span = validation_span(self.name());
        let _guard = span.enter();

        if self.base().ingested {
            tracing::debug!("discarding previous submission");
            self.reset();
        }
        self.base_mut().ingested = true;
        self.parse_raw_data(raw)?;
        let success = self.run_validation();
        tracing::debug!(success, "validated");

        if success {
            if let Some(hook) = self.base().on_success.clone() {
                hook(&self.get_data_dict(false));
            }
        } else if let Some(hook) = self.base().on_fail.clone() {
            hook(&self.get_report());
        }
        Ok(Some(success))
    }

    /// Returns the first converted value of a field of this form.
    fn get_value(&self, name: &str) -> FormskitResult<Value> {
        self.base().require_field(name)?.get_value(0)
    }

    /// Returns every converted value of a field of this form.
    fn get_values(&self, name: &str) -> FormskitResult<Vec<Value>> {
        Ok(self.base().require_field(name)?.get_values())
    }
}

/// A flat form: named fields plus form validators.
///
/// # Examples
///
/// ```
/// use formskit_forms::prelude::*;
///
/// let mut form = BaseForm::new("Form1")
///     .field(FieldDef::new("name2").validator(NotEmpty::new()));
///
/// let raw = RawData::parse("form_name=Form1");
/// assert_eq!(form.validate(&raw).unwrap(), Some(false));
/// assert_eq!(form.get_field("name2").unwrap().messages()[0].render(), "NotEmpty");
///
/// let other = RawData::parse("form_name=Form2");
/// assert_eq!(form.validate(&other).unwrap(), None);
/// ```
#[derive(Clone)]
pub struct BaseForm {
    name: String,
    form_name_key: String,
    missing_values: MissingValuePolicy,
    fields: IndexMap<String, Field>,
    form_validators: Vec<Arc<dyn FormValidator>>,
    success: Option<bool>,
    messages: Vec<Message>,
    on_success: Option<SuccessHook>,
    on_fail: Option<FailHook>,
    ingested: bool,
}

impl fmt::Debug for BaseForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseForm")
            .field("name", &self.name)
            .field("form_name_key", &self.form_name_key)
            .field("missing_values", &self.missing_values)
            .field("fields", &self.fields)
            .field("form_validators", &self.form_validators)
            .field("success", &self.success)
            .field("messages", &self.messages)
            .field("ingested", &self.ingested)
            .finish_non_exhaustive()
    }
}

impl BaseForm {
    /// Creates an empty form. The marker key and missing value policy come
    /// from the global settings.
    pub fn new(name: impl Into<String>) -> Self {
        let settings = SETTINGS.get();
        Self {
            name: name.into(),
            form_name_key: settings.form_name_key.clone(),
            missing_values: settings.missing_values,
            fields: IndexMap::new(),
            form_validators: Vec::new(),
            success: None,
            messages: Vec::new(),
            on_success: None,
            on_fail: None,
            ingested: false,
        }
    }

    /// Sets the marker key for this form.
    #[must_use]
    pub fn with_form_name_key(mut self, key: impl Into<String>) -> Self {
        self.form_name_key = key.into();
        self
    }

    /// Sets the missing value policy for this form.
    #[must_use]
    pub const fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }

    /// Adds a field (builder style).
    #[must_use]
    pub fn field(mut self, def: impl Into<Arc<FieldDef>>) -> Self {
        self.add_field(def);
        self
    }

    /// Adds a form validator (builder style).
    #[must_use]
    pub fn form_validator(mut self, validator: impl FormValidator + 'static) -> Self {
        self.add_form_validator(validator);
        self
    }

    /// Sets the success hook (builder style).
    #[must_use]
    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: Fn(&DataDict) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Sets the failure hook (builder style).
    #[must_use]
    pub fn on_fail<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FormReport) + Send + Sync + 'static,
    {
        self.on_fail = Some(Arc::new(hook));
        self
    }

    /// Adds a fresh field instance of `def`, replacing any field with the
    /// same name.
    pub fn add_field(&mut self, def: impl Into<Arc<FieldDef>>) -> &mut Field {
        self.add_field_object(Field::new(def))
    }

    /// Adds an existing field instance, replacing any field with the same
    /// name.
    pub fn add_field_object(&mut self, field: Field) -> &mut Field {
        let (index, _) = self.fields.insert_full(field.name().to_string(), field);
        &mut self.fields[index]
    }

    /// Adds a form validator.
    pub fn add_form_validator(&mut self, validator: impl FormValidator + 'static) {
        self.form_validators.push(Arc::new(validator));
    }

    /// Returns the form name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the marker key.
    pub fn form_name_key(&self) -> &str {
        &self.form_name_key
    }

    /// Returns the missing value policy.
    pub const fn missing_values(&self) -> MissingValuePolicy {
        self.missing_values
    }

    /// Returns the fields in declaration order.
    pub const fn fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    /// Returns a field by name.
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Returns a field by name, mutably.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    /// Returns the form validators.
    pub fn form_validators(&self) -> &[Arc<dyn FormValidator>] {
        &self.form_validators
    }

    /// Returns the outcome of the last validation.
    pub const fn success(&self) -> Option<bool> {
        self.success
    }

    /// Overrides the recorded outcome.
    pub fn set_success(&mut self, success: Option<bool>) {
        self.success = success;
    }

    /// Returns the form-level messages.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Records a form-level failure.
    pub fn set_error(&mut self, message: impl Into<Message>) {
        self.success = Some(false);
        self.messages.push(message.into());
    }

    /// Builds a fresh form with the same structure: the same definitions,
    /// validators, settings and hooks, but no submitted state.
    #[must_use]
    pub fn instantiate(&self) -> Self {
        Self {
            name: self.name.clone(),
            form_name_key: self.form_name_key.clone(),
            missing_values: self.missing_values,
            fields: self
                .fields
                .iter()
                .map(|(name, field)| (name.clone(), field.instantiate()))
                .collect(),
            form_validators: self.form_validators.clone(),
            success: None,
            messages: Vec::new(),
            on_success: self.on_success.clone(),
            on_fail: self.on_fail.clone(),
            ingested: false,
        }
    }

    /// Validates every field and, if all passed, the form validators.
    pub fn validate_fields(&mut self) -> bool {
        self.messages.clear();

        let mut success = true;
        for field in self.fields.values_mut() {
            success &= field.validate();
        }

        if success {
            for validator in self.form_validators.clone() {
                if let Err(err) = validator.check(self) {
                    tracing::debug!(form = %self.name, validator = %err.code, "form validator failed");
                    self.messages.push(err.message);
                    success = false;
                    break;
                }
            }
        }

        self.success = Some(success);
        success
    }

    /// Resets every field, the messages and the outcome.
    pub fn reset_fields(&mut self) {
        self.success = None;
        self.ingested = false;
        self.messages.clear();
        for field in self.fields.values_mut() {
            field.reset();
        }
    }

    /// Builds the report of this form's own fields.
    pub fn fields_report(&self) -> FormReport {
        FormReport {
            success: self.success,
            messages: self.messages.iter().map(Message::render).collect(),
            fields: self
                .fields
                .iter()
                .map(|(name, field)| (name.clone(), FieldReport::from(field)))
                .collect(),
            childs: None,
        }
    }

    /// Builds the data of this form's own fields.
    pub fn fields_data(&self, minified: bool) -> DataDict {
        self.fields
            .iter()
            .filter_map(|(name, field)| {
                data::field_entry(field, minified).map(|entry| (name.clone(), entry))
            })
            .collect()
    }

    /// Writes one `parse_dict` entry into the field called `name`.
    pub fn parse_field_json(&mut self, name: &str, value: &serde_json::Value) -> FormskitResult<()> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FormskitError::BadFieldReference(name.to_string()))?;
        field.set_values(json_values(value));
        Ok(())
    }

    pub(crate) fn require_field(&self, name: &str) -> FormskitResult<&Field> {
        self.fields
            .get(name)
            .ok_or_else(|| FormskitError::FieldNotFound {
                form: self.name.clone(),
                field: name.to_string(),
            })
    }
}

impl Form for BaseForm {
    fn base(&self) -> &BaseForm {
        self
    }

    fn base_mut(&mut self) -> &mut BaseForm {
        self
    }

    fn resolve_field(&mut self, key: &str) -> FormskitResult<&mut Field> {
        self.fields
            .get_mut(key)
            .ok_or_else(|| FormskitError::BadFieldReference(key.to_string()))
    }

    fn run_validation(&mut self) -> bool {
        self.validate_fields()
    }

    fn reset(&mut self) {
        self.reset_fields();
    }

    fn get_report(&self) -> FormReport {
        self.fields_report()
    }

    fn get_data_dict(&self, minified: bool) -> DataDict {
        self.fields_data(minified)
    }

    fn parse_dict(&mut self, data: &serde_json::Value) -> FormskitResult<()> {
        for (key, value) in json_object(data)? {
            self.parse_field_json(key, value)?;
        }
        Ok(())
    }
}

pub(crate) fn json_object(
    data: &serde_json::Value,
) -> FormskitResult<&serde_json::Map<String, serde_json::Value>> {
    data.as_object().ok_or_else(|| {
        FormskitError::SerializationError(format!("expected a JSON object, got {data}"))
    })
}

/// Flattens a JSON value into raw field values: a string is one value, an
/// array is one value per item, `null` is no value and other scalars are
/// written in their JSON form.
pub(crate) fn json_values(value: &serde_json::Value) -> Vec<String> {
    fn scalar(value: &serde_json::Value) -> Option<String> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    match value {
        serde_json::Value::Array(items) => items.iter().filter_map(scalar).collect(),
        other => scalar(other).into_iter().collect(),
    }
}
