//! Integration tests for tree forms.
//!
//! These tests submit flat payloads addressed with field identifiers and
//! check the reconstructed tree: sub-form growth, validation across levels,
//! reset, and the report and data outputs.

use formskit_core::FormskitError;
use formskit_forms::identifier::{FieldIdentifier, FormLocation};
use formskit_forms::prelude::*;
use serde_json::json;

// ============================================================================
// Shared helpers
// ============================================================================

/// `MainForm { something, PeopleForm { name, surname } }`.
fn main_form() -> TreeForm {
    TreeForm::new("MainForm")
        .field(FieldDef::new("something"))
        .sub_form(
            TreeForm::new("PeopleForm")
                .field(FieldDef::new("name").validator(NotEmpty::new()))
                .field(FieldDef::new("surname")),
        )
}

/// `Form1 { name1, name2, Form2 { name3, Form3 { name4 } } }`.
fn nested_form() -> TreeForm {
    TreeForm::new("Form1")
        .field(FieldDef::new("name1"))
        .field(FieldDef::new("name2"))
        .sub_form(
            TreeForm::new("Form2")
                .field(FieldDef::new("name3"))
                .sub_form(TreeForm::new("Form3").field(FieldDef::new("name4"))),
        )
}

/// Adds the identifier of `field` on `PeopleForm[index]` to `raw`.
fn add_person(tree: &mut TreeForm, raw: &mut RawData, index: usize, name: &str, surname: &str) {
    let row = tree.get_or_create_sub_form("PeopleForm", index).unwrap();
    raw.append(row.identifier("name").unwrap(), name);
    raw.append(row.identifier("surname").unwrap(), surname);
}

fn marker(name: &str) -> RawData {
    let mut raw = RawData::new();
    raw.append("form_name", name);
    raw
}

// ============================================================================
// Submission
// ============================================================================

#[test]
fn test_people_rows_minified() {
    let mut tree = main_form();
    let mut raw = marker("MainForm");
    raw.append(tree.identifier("something").unwrap(), "value");
    add_person(&mut tree, &mut raw, 0, "name1", "surname1");
    add_person(&mut tree, &mut raw, 1, "name2", "surname2");

    // Submit to a pristine tree so row 1 is created from its token.
    let mut tree = main_form();
    assert_eq!(tree.validate(&raw).unwrap(), Some(true));

    assert_eq!(
        serde_json::to_value(tree.get_data_dict(true)).unwrap(),
        json!({
            "something": "value",
            "PeopleForm": {
                "0": {"name": "name1", "surname": "surname1"},
                "1": {"name": "name2", "surname": "surname2"}
            }
        })
    );
}

#[test]
fn test_sparse_index_is_created_on_demand() {
    let mut tree = main_form();
    let token = FieldIdentifier::new(
        "name",
        vec![FormLocation::new("MainForm", None), FormLocation::new("PeopleForm", Some(9))],
    )
    .encode()
    .unwrap();
    let mut raw = marker("MainForm");
    raw.append(token, "Zed");

    // The template at index 0 was never submitted, so its `name` fails.
    assert_eq!(tree.validate(&raw).unwrap(), Some(false));
    let rows = tree.sub_forms("PeopleForm").unwrap();
    assert_eq!(rows.keys().copied().collect::<Vec<_>>(), vec![0, 9]);
    assert_eq!(rows[&9].get_value("name").unwrap(), Value::from("Zed"));
    assert_eq!(rows[&9].success(), Some(true));
    assert_eq!(rows[&0].success(), Some(false));
}

#[test]
fn test_failing_row_fails_tree() {
    let mut tree = main_form();
    let mut raw = marker("MainForm");
    raw.append(tree.identifier("something").unwrap(), "ok");
    add_person(&mut tree, &mut raw, 0, "Ann", "A");
    add_person(&mut tree, &mut raw, 1, "   ", "B");

    assert_eq!(tree.validate(&raw).unwrap(), Some(false));
    let report = tree.get_report();
    assert!(report.fields["something"].success);
    assert!(report.child("PeopleForm", 0).unwrap().is_success());

    let row = report.child("PeopleForm", 1).unwrap();
    assert_eq!(row.success, Some(false));
    assert_eq!(row.fields["name"].values[0].messages, vec!["NotEmpty".to_string()]);
}

#[test]
fn test_not_submitted_tree_is_untouched() {
    let mut tree = main_form();
    let mut raw = marker("PeopleForm");
    add_person(&mut main_form(), &mut raw, 3, "x", "y");

    assert_eq!(tree.validate(&raw).unwrap(), None);
    assert_eq!(tree.sub_forms("PeopleForm").unwrap().len(), 1);
    assert_eq!(tree.success(), None);
}

#[test]
fn test_corrupted_token_is_bad_reference() {
    let mut tree = main_form();
    let mut raw = marker("MainForm");
    raw.append("eyJuYW1lIjo!!!corrupted", "x");

    let err = tree.validate(&raw).unwrap_err();
    assert!(
        matches!(err, FormskitError::BadFieldReference(ref key) if key == "eyJuYW1lIjo!!!corrupted")
    );
}

#[test]
fn test_stale_references_are_hard_errors() {
    let mut tree = main_form();

    let stale_field = FieldIdentifier::new(
        "age",
        vec![FormLocation::new("MainForm", None), FormLocation::new("PeopleForm", Some(0))],
    )
    .encode()
    .unwrap();
    let mut raw = marker("MainForm");
    raw.append(stale_field, "40");
    assert!(matches!(
        tree.validate(&raw).unwrap_err(),
        FormskitError::FieldNotFound { ref form, ref field } if form == "PeopleForm" && field == "age"
    ));

    let stale_form = FieldIdentifier::new(
        "name",
        vec![FormLocation::new("MainForm", None), FormLocation::new("PetForm", Some(0))],
    )
    .encode()
    .unwrap();
    let mut raw = marker("MainForm");
    raw.append(stale_form, "Rex");
    assert!(matches!(
        tree.validate(&raw).unwrap_err(),
        FormskitError::SubFormNotFound { ref name, .. } if name == "PetForm"
    ));
}

#[test]
fn test_identifier_resolves_to_same_field() {
    let mut tree = nested_form();
    let token = tree
        .get_or_create_sub_form("Form2", 1)
        .unwrap()
        .get_or_create_sub_form("Form3", 2)
        .unwrap()
        .identifier("name4")
        .unwrap();

    let decoded = FieldIdentifier::decode(&token).unwrap();
    assert_eq!(decoded.name, "name4");
    assert_eq!(
        decoded.parents,
        vec![
            FormLocation::new("Form1", None),
            FormLocation::new("Form2", Some(1)),
            FormLocation::new("Form3", Some(2)),
        ]
    );
    assert_eq!(decoded.owner(), Some(&FormLocation::new("Form3", Some(2))));

    tree.resolve_field(&token).unwrap().set_values(["deep"]);
    let leaf = tree
        .get_sub_form("Form2", 1)
        .and_then(|f| f.get_sub_form("Form3", 2))
        .unwrap();
    assert_eq!(leaf.get_value("name4").unwrap(), Value::from("deep"));
}

#[test]
fn test_instances_do_not_share_state() {
    let mut tree = main_form();
    let mut raw = marker("MainForm");
    add_person(&mut tree, &mut raw, 1, "One", "1");
    tree.validate(&raw).unwrap();

    let template = tree.get_sub_form("PeopleForm", 0).unwrap();
    let row = tree.get_sub_form("PeopleForm", 1).unwrap();
    assert!(template.get_field("name").unwrap().values().is_empty());
    assert!(template.get_field("name").unwrap().is_error());
    assert!(!row.get_field("name").unwrap().is_error());
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn test_reset_collapses_to_templates() {
    let mut tree = nested_form();
    tree.get_or_create_sub_form("Form2", 3)
        .unwrap()
        .get_or_create_sub_form("Form3", 4)
        .unwrap();
    tree.get_or_create_sub_form("Form2", 0)
        .unwrap()
        .get_or_create_sub_form("Form3", 5)
        .unwrap();
    tree.field_mut("name1").unwrap().set_values(["x"]);

    tree.reset();
    let once = tree.get_report();
    tree.reset();
    assert_eq!(tree.get_report(), once);

    assert_eq!(tree.sub_forms("Form2").unwrap().len(), 1);
    let form2 = tree.get_sub_form("Form2", 0).unwrap();
    assert_eq!(form2.sub_forms("Form3").unwrap().len(), 1);
    assert!(tree.get_field("name1").unwrap().values().is_empty());
}

#[test]
fn test_tree_is_reusable_across_cycles() {
    let mut tree = main_form();
    let mut raw = marker("MainForm");
    add_person(&mut tree, &mut raw, 0, "", "");
    assert_eq!(tree.validate(&raw).unwrap(), Some(false));

    tree.reset();
    let mut raw = marker("MainForm");
    add_person(&mut tree, &mut raw, 0, "Ann", "Lee");
    assert_eq!(tree.validate(&raw).unwrap(), Some(true));
}

#[test]
fn test_next_submission_drops_previous_rows() {
    let mut tree = main_form();
    let mut raw = marker("MainForm");
    add_person(&mut tree, &mut raw, 0, "Ann", "A");
    add_person(&mut tree, &mut raw, 3, "Bob", "B");
    assert_eq!(tree.validate(&raw).unwrap(), Some(true));
    assert_eq!(tree.sub_forms("PeopleForm").unwrap().len(), 2);

    let mut raw = marker("MainForm");
    add_person(&mut main_form(), &mut raw, 0, "Cy", "C");
    assert_eq!(tree.validate(&raw).unwrap(), Some(true));

    let rows = tree.sub_forms("PeopleForm").unwrap();
    assert_eq!(rows.keys().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(rows[&0].get_value("name").unwrap(), Value::from("Cy"));
}

// ============================================================================
// Outputs
// ============================================================================

#[test]
fn test_report_tree() {
    let mut tree = nested_form();
    let mut raw = marker("Form1");
    raw.append(tree.identifier("name1").unwrap(), "value1");
    tree.validate(&raw).unwrap();

    assert_eq!(
        serde_json::to_value(tree.get_report()).unwrap(),
        json!({
            "success": true,
            "messages": [],
            "fields": {
                "name1": {"success": true, "messages": [], "values": [
                    {"value": "value1", "success": true, "messages": []}
                ]},
                "name2": {"success": true, "messages": [], "values": []}
            },
            "childs": {
                "Form2": {"0": {
                    "success": true,
                    "messages": [],
                    "fields": {"name3": {"success": true, "messages": [], "values": []}},
                    "childs": {
                        "Form3": {"0": {
                            "success": true,
                            "messages": [],
                            "fields": {"name4": {"success": true, "messages": [], "values": []}},
                            "childs": {}
                        }}
                    }
                }}
            }
        })
    );
}

#[test]
fn test_data_dict_tree() {
    let mut tree = nested_form();
    tree.parse_dict(&json!({
        "name1": "value1",
        "Form2": [
            {"name3": "a"},
            {"name3": ["b", "c"], "Form3": [{}, {}, {"name4": "deep"}]}
        ]
    }))
    .unwrap();

    assert_eq!(
        serde_json::to_value(tree.get_data_dict(false)).unwrap(),
        json!({
            "name1": ["value1"],
            "name2": [],
            "Form2": {
                "0": {"name3": ["a"], "Form3": {"0": {"name4": []}}},
                "1": {"name3": ["b", "c"], "Form3": {
                    "0": {"name4": []},
                    "1": {"name4": []},
                    "2": {"name4": ["deep"]}
                }}
            }
        })
    );
    assert_eq!(
        serde_json::to_value(tree.get_data_dict(true)).unwrap(),
        json!({
            "name1": "value1",
            "Form2": {
                "0": {"name3": "a", "Form3": {"0": {}}},
                "1": {"name3": ["b", "c"], "Form3": {"0": {}, "1": {}, "2": {"name4": "deep"}}}
            }
        })
    );
}

#[test]
fn test_parse_dict_rows_are_independent() {
    let mut tree = main_form();
    tree.parse_dict(&json!({
        "something": "s",
        "PeopleForm": [{"name": "n0"}, {"name": "n1", "surname": "s1"}]
    }))
    .unwrap();

    let row0 = tree.get_sub_form("PeopleForm", 0).unwrap();
    let row1 = tree.get_sub_form("PeopleForm", 1).unwrap();
    assert_eq!(row0.get_value("name").unwrap(), Value::from("n0"));
    assert!(row0.get_field("surname").unwrap().values().is_empty());
    assert_eq!(row1.get_value("surname").unwrap(), Value::from("s1"));

    assert!(matches!(
        tree.parse_dict(&json!(["not", "an", "object"])),
        Err(FormskitError::SerializationError(_))
    ));
}
