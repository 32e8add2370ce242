//! # formskit People Example
//!
//! Declares a form with a repeatable `PeopleForm` sub-form, builds a flat
//! urlencoded submission for two people and prints what the form made of
//! it.
//!
//! ## Running
//!
//! ```bash
//! cargo run --package formskit --example people
//! FORMSKIT_LOG_LEVEL=formskit_forms=debug cargo run --package formskit --example people
//! ```

use formskit::core::logging::setup_logging;
use formskit::core::settings_loader;
use formskit::prelude::*;

/// `MainForm { something, PeopleForm { name, surname, age } }`.
fn main_form() -> TreeForm {
    TreeForm::new("MainForm")
        .field(FieldDef::new("something").validator(NotEmpty::new()))
        .field(FieldDef::button("submit", "Save"))
        .sub_form(
            TreeForm::new("PeopleForm")
                .field(FieldDef::new("name").validator(NotEmpty::new()))
                .field(FieldDef::new("surname"))
                .field(
                    FieldDef::new("age")
                        .validator(IsDigit::new().with_message("Age must be a whole number"))
                        .converter(ToInt),
                ),
        )
}

/// Encodes a submission the way a browser would post it.
fn build_submission(form: &mut TreeForm, people: &[(&str, &str, &str)]) -> FormskitResult<String> {
    let mut raw = RawData::new();
    raw.append("form_name", form.name());
    raw.append(form.identifier("something")?, "value");

    for (index, (name, surname, age)) in people.iter().enumerate() {
        let row = form.get_or_create_sub_form("PeopleForm", index)?;
        raw.append(row.identifier("name")?, *name);
        raw.append(row.identifier("surname")?, *surname);
        raw.append(row.identifier("age")?, *age);
    }
    Ok(raw.urlencode())
}

fn run() -> FormskitResult<()> {
    let settings = settings_loader::from_env();
    setup_logging(&settings);

    let body = build_submission(&mut main_form(), &[("name1", "surname1", "31"), ("name2", "surname2", "x")])?;
    tracing::info!(bytes = body.len(), "built submission");

    let mut form = main_form();
    let outcome = form.validate(&RawData::parse(&body))?;
    tracing::info!(?outcome, "validated");

    let report = serde_json::to_string_pretty(&form.get_report())
        .map_err(|e| FormskitError::SerializationError(e.to_string()))?;
    println!("report:\n{report}");

    let data = serde_json::to_string_pretty(&form.get_data_dict(true))
        .map_err(|e| FormskitError::SerializationError(e.to_string()))?;
    println!("data:\n{data}");

    form.reset();
    tracing::info!(
        rows = form.sub_forms("PeopleForm").map_or(0, |rows| rows.len()),
        "reset"
    );
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
