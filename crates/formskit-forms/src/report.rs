//! Validation reports.
//!
//! A [`FormReport`] is a serializable snapshot of a form's validation
//! outcome, suitable for returning to a client that renders messages next
//! to inputs. Messages are rendered in the active language when the report
//! is built.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::field::{Field, FieldValue};

/// The outcome of one submitted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueReport {
    /// The raw wire value.
    pub value: Option<String>,
    /// Whether every value-level check passed.
    pub success: bool,
    /// Rendered messages from failed checks.
    pub messages: Vec<String>,
}

impl From<&FieldValue> for ValueReport {
    fn from(value: &FieldValue) -> Self {
        Self {
            value: value.value.clone(),
            success: !value.error,
            messages: value.messages.iter().map(|m| m.render()).collect(),
        }
    }
}

/// The outcome of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReport {
    /// Whether the field passed validation.
    pub success: bool,
    /// Rendered field-level messages.
    pub messages: Vec<String>,
    /// Per-value outcomes, in submission order.
    pub values: Vec<ValueReport>,
}

impl From<&Field> for FieldReport {
    fn from(field: &Field) -> Self {
        Self {
            success: !field.is_error(),
            messages: field.messages().iter().map(|m| m.render()).collect(),
            values: field.values().iter().map(ValueReport::from).collect(),
        }
    }
}

/// The outcome of a form and, for tree forms, of every sub-form instance.
///
/// # Examples
///
/// ```
/// use formskit_forms::prelude::*;
///
/// let mut form = BaseForm::new("Form1").field(FieldDef::new("name2").validator(NotEmpty::new()));
/// let raw = RawData::parse("form_name=Form1");
/// form.validate(&raw).unwrap();
///
/// let report = serde_json::to_value(form.get_report()).unwrap();
/// assert_eq!(
///     report,
///     serde_json::json!({
///         "success": false,
///         "messages": [],
///         "fields": {"name2": {"success": false, "messages": ["NotEmpty"], "values": []}}
///     })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormReport {
    /// `None` until the form has been validated.
    pub success: Option<bool>,
    /// Rendered form-level messages.
    pub messages: Vec<String>,
    /// Per-field outcomes, in declaration order.
    pub fields: IndexMap<String, FieldReport>,
    /// Sub-form reports by form name and instance index. Only present for
    /// tree forms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub childs: Option<IndexMap<String, BTreeMap<usize, FormReport>>>,
}

impl FormReport {
    /// Returns `true` if the form and all its sub-forms passed.
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    /// Returns the report of a sub-form instance.
    pub fn child(&self, name: &str, index: usize) -> Option<&Self> {
        self.childs.as_ref()?.get(name)?.get(&index)
    }
}
