//! Normalized form data.
//!
//! [`DataDict`] is the converted content of a form, keyed by field name in
//! declaration order. Tree forms add one entry per sub-form type holding
//! that type's instances by index.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::field::Field;
use crate::value::Value;

/// The data of a form: field name (or sub-form name) to entry.
pub type DataDict = IndexMap<String, DataEntry>;

/// One entry of a [`DataDict`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataEntry {
    /// A single value (minified output of a one-value field).
    Value(Value),
    /// Every value of a field.
    Values(Vec<Value>),
    /// Sub-form instances by index.
    SubForms(BTreeMap<usize, DataDict>),
}

impl DataEntry {
    /// Returns the single value, if this is a [`DataEntry::Value`].
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the values, if this is a [`DataEntry::Values`].
    pub fn as_values(&self) -> Option<&[Value]> {
        match self {
            Self::Values(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the sub-form instances, if this is a [`DataEntry::SubForms`].
    pub const fn as_sub_forms(&self) -> Option<&BTreeMap<usize, DataDict>> {
        match self {
            Self::SubForms(forms) => Some(forms),
            _ => None,
        }
    }
}

/// Builds the entry for one field, or `None` when it is left out.
///
/// Ignored fields are always left out. When `minified`, a field with no
/// values is left out and a field with exactly one value becomes a bare
/// [`DataEntry::Value`].
pub(crate) fn field_entry(field: &Field, minified: bool) -> Option<DataEntry> {
    if field.is_ignored() {
        return None;
    }
    let mut values = field.get_values();
    if !minified {
        return Some(DataEntry::Values(values));
    }
    match values.len() {
        0 => None,
        1 => values.pop().map(DataEntry::Value),
        _ => Some(DataEntry::Values(values)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::ToInt;
    use crate::field::FieldDef;

    #[test]
    fn test_field_entry_shapes() {
        let mut field = Field::new(FieldDef::new("n").converter(ToInt));
        assert_eq!(field_entry(&field, false), Some(DataEntry::Values(Vec::new())));
        assert_eq!(field_entry(&field, true), None);

        field.set_values(["4"]);
        assert_eq!(field_entry(&field, true), Some(DataEntry::Value(Value::Int(4))));

        field.set_values(["4", "5"]);
        assert_eq!(
            field_entry(&field, true),
            Some(DataEntry::Values(vec![Value::Int(4), Value::Int(5)]))
        );
    }

    #[test]
    fn test_ignored_field_left_out() {
        let field = Field::new(FieldDef::button("save", "Save"));
        assert_eq!(field_entry(&field, false), None);
    }

    #[test]
    fn test_serialize_untagged() {
        let mut row = DataDict::new();
        row.insert("name".into(), DataEntry::Value(Value::from("Ann")));
        let mut rows = BTreeMap::new();
        rows.insert(1, row);

        let mut dict = DataDict::new();
        dict.insert("tags".into(), DataEntry::Values(vec![Value::from("a")]));
        dict.insert("People".into(), DataEntry::SubForms(rows));

        assert_eq!(
            serde_json::to_value(&dict).unwrap(),
            serde_json::json!({"tags": ["a"], "People": {"1": {"name": "Ann"}}})
        );
    }
}
