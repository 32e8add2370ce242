//! Converters between wire strings and domain values.
//!
//! A converter is owned by a field definition. Reading a field passes each
//! raw value through [`Converter::convert`]; writing a domain value passes it
//! through [`Converter::back`]. Conversion soft-fails: input that cannot be
//! parsed reads as [`Value::Null`].
//!
//! Before each validation pass, [`Converter::make_field`] may restructure
//! the submitted values (a checkbox that posts nothing, a datetime split
//! over two inputs).

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::field::FieldValue;
use crate::value::Value;

/// A bidirectional transform between raw wire strings and [`Value`]s.
pub trait Converter: Send + Sync + fmt::Debug {
    /// Converts a raw submitted value to a domain value.
    fn convert(&self, raw: Option<&str>) -> Value;

    /// Converts a domain value back to its wire form.
    fn back(&self, value: &Value) -> Option<String>;

    /// Restructures a field's values before validation.
    ///
    /// Runs once per validation pass, even when the field has no values.
    /// `submitted` is `true` when the values came from ingestion.
    fn make_field(&self, _values: &mut Vec<FieldValue>, _submitted: bool) {}

    /// Returns a human-readable name for this converter.
    fn name(&self) -> &str;
}

/// The default converter: wire strings pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Converter for PassThrough {
    fn convert(&self, raw: Option<&str>) -> Value {
        raw.map_or(Value::Null, Value::from)
    }

    fn back(&self, value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn name(&self) -> &str {
        "PassThrough"
    }
}

/// Converts to and from 64-bit integers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToInt;

impl Converter for ToInt {
    fn convert(&self, raw: Option<&str>) -> Value {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .map_or(Value::Null, Value::Int)
    }

    fn back(&self, value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn name(&self) -> &str {
        "ToInt"
    }
}

/// Converts checkbox-style input to booleans.
///
/// `"1"`, `"true"`, `"on"` and `"yes"` (any case) read as `true`; anything
/// else reads as `false`. A checkbox that was submitted without a value is
/// checked; one that was not submitted at all is unchecked.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToBool;

impl Converter for ToBool {
    fn convert(&self, raw: Option<&str>) -> Value {
        match raw {
            None => Value::Null,
            Some(s) => Value::Bool(matches!(
                s.trim().to_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            )),
        }
    }

    fn back(&self, value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::Bool(true) => Some("1".to_string()),
            Value::Bool(false) => Some("0".to_string()),
            other => self.back(&self.convert(Some(&other.to_string()))),
        }
    }

    fn make_field(&self, values: &mut Vec<FieldValue>, submitted: bool) {
        if values.is_empty() {
            let synthesized = if submitted { "1" } else { "0" };
            values.push(FieldValue::new(Some(synthesized.to_string())));
        }
    }

    fn name(&self) -> &str {
        "ToBool"
    }
}

/// Converts `YYYY-MM-DD` strings to dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToDate;

impl ToDate {
    /// The wire format.
    pub const FORMAT: &'static str = "%Y-%m-%d";
}

impl Converter for ToDate {
    fn convert(&self, raw: Option<&str>) -> Value {
        raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), Self::FORMAT).ok())
            .map_or(Value::Null, Value::Date)
    }

    fn back(&self, value: &Value) -> Option<String> {
        match value {
            Value::Date(d) => Some(d.format(Self::FORMAT).to_string()),
            Value::DateTime(dt) => Some(dt.date().format(Self::FORMAT).to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn name(&self) -> &str {
        "ToDate"
    }
}

/// Converts `YYYY-MM-DD HH:MM` strings (seconds optional) to datetimes.
///
/// A datetime posted from separate date and time inputs arrives as two
/// values; [`make_field`](Converter::make_field) joins them into one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToDatetime;

impl ToDatetime {
    /// The wire format.
    pub const FORMAT: &'static str = "%Y-%m-%d %H:%M";
    /// The wire format with seconds, also accepted on read.
    pub const FORMAT_WITH_SECONDS: &'static str = "%Y-%m-%d %H:%M:%S";
}

impl Converter for ToDatetime {
    fn convert(&self, raw: Option<&str>) -> Value {
        let Some(s) = raw.map(str::trim) else {
            return Value::Null;
        };
        NaiveDateTime::parse_from_str(s, Self::FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, Self::FORMAT_WITH_SECONDS))
            .map_or(Value::Null, Value::DateTime)
    }

    fn back(&self, value: &Value) -> Option<String> {
        match value {
            Value::DateTime(dt) => Some(dt.format(Self::FORMAT).to_string()),
            Value::Date(d) => Some(format!("{} 00:00", d.format(ToDate::FORMAT))),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn make_field(&self, values: &mut Vec<FieldValue>, _submitted: bool) {
        if values.len() == 2 {
            let date = values[0].value.as_deref().unwrap_or_default().trim();
            let time = values[1].value.as_deref().unwrap_or_default().trim();
            let merged = format!("{date} {time}");
            values.clear();
            values.push(FieldValue::new(Some(merged)));
        }
    }

    fn name(&self) -> &str {
        "ToDatetime"
    }
}
