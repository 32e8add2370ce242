//! Message templates supplied through the global settings.
//!
//! Kept in its own test binary: `SETTINGS` can only be configured once per
//! process.

use formskit_core::{Settings, SETTINGS};
use formskit_forms::prelude::*;

#[test]
fn test_settings_override_default_templates() {
    let mut settings = Settings::default();
    settings
        .messages
        .insert("NotEmpty".to_string(), "Please fill in this field".to_string());
    settings.form_name_key = "which".to_string();
    SETTINGS.configure(settings);

    let mut form = BaseForm::new("Contact")
        .field(FieldDef::new("message").validator(NotEmpty::new()))
        .field(FieldDef::new("code").validator(IsDigit::new().with_message("digits only")));
    assert_eq!(form.base().form_name_key(), "which");

    let raw = RawData::parse("which=Contact&code=abc");
    assert_eq!(form.validate(&raw).unwrap(), Some(false));

    let report = form.get_report();
    assert_eq!(report.fields["message"].messages, vec!["Please fill in this field".to_string()]);
    assert_eq!(report.fields["code"].values[0].messages, vec!["digits only".to_string()]);
}
