//! # formskit-forms
//!
//! The form engine of formskit. A form is a declarative set of named fields,
//! each carrying validators and a converter. Forms ingest submitted data
//! shaped as key -> list of strings, validate it field by field and value by
//! value, accumulate messages and expose a normalized data tree.
//!
//! [`TreeForm`](tree_form::TreeForm) adds repeatable nested sub-forms. Every
//! field of a tree is addressed on the wire by an opaque token (see
//! [`identifier`]) that records the full ancestor path, so a single flat
//! submission can describe any number of nested, repeated rows.
//!
//! ```
//! use formskit_forms::prelude::*;
//!
//! let mut form = BaseForm::new("Form1").field(FieldDef::new("name1"));
//! let raw = RawData::parse("form_name=Form1&name1=value1");
//!
//! assert_eq!(form.validate(&raw).unwrap(), Some(true));
//! assert_eq!(form.get_value("name1").unwrap(), Value::from("value1"));
//! ```

pub mod converters;
pub mod data;
pub mod field;
pub mod form;
pub mod form_validators;
pub mod identifier;
pub mod raw_data;
pub mod report;
pub mod tree_form;
pub mod validators;
pub mod value;

/// The types needed to declare, submit and inspect forms.
pub mod prelude {
    pub use crate::converters::{Converter, PassThrough, ToBool, ToDate, ToDatetime, ToInt};
    pub use crate::data::{DataDict, DataEntry};
    pub use crate::field::{Field, FieldDef, FieldValue};
    pub use crate::form::{BaseForm, Form};
    pub use crate::form_validators::{FnFormValidator, FormValidator, MustMatch};
    pub use crate::identifier::{FieldIdentifier, FormLocation};
    pub use crate::raw_data::RawData;
    pub use crate::report::{FieldReport, FormReport, ValueReport};
    pub use crate::tree_form::TreeForm;
    pub use crate::validators::{
        Checks, InList, IsDecimal, IsDigit, IsEmail, NeedToHaveValue, NotEmpty, Validator,
    };
    pub use crate::value::Value;
}
