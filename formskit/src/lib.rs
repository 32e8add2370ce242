//! # formskit
//!
//! Form definition and validation with repeatable nested sub-forms.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. You can depend on `formskit` to get the whole toolkit, or depend
//! on the individual crates for finer-grained control.
//!
//! ```
//! use formskit::prelude::*;
//!
//! let mut form = TreeForm::new("MainForm")
//!     .field(FieldDef::new("something"))
//!     .sub_form(TreeForm::new("PeopleForm").field(FieldDef::new("name").validator(NotEmpty::new())));
//!
//! let mut raw = RawData::new();
//! raw.append("form_name", "MainForm");
//! raw.append(form.identifier("something").unwrap(), "value");
//! let row = form.get_or_create_sub_form("PeopleForm", 1).unwrap();
//! raw.append(row.identifier("name").unwrap(), "Ann");
//!
//! // Row 0 is the template and was left empty.
//! assert_eq!(form.validate(&raw).unwrap(), Some(false));
//! assert!(form.get_report().child("PeopleForm", 1).unwrap().is_success());
//! ```

/// Errors, settings, logging, messages and translations.
pub use formskit_core as core;

/// Fields, validators, converters, forms and tree forms.
pub use formskit_forms as forms;

// Third-party re-exports
pub use chrono;
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// The types needed to declare, submit and inspect forms.
pub mod prelude {
    pub use formskit_core::{
        FormskitError, FormskitResult, Message, MissingValuePolicy, Settings, SETTINGS,
    };
    pub use formskit_forms::prelude::*;
}
