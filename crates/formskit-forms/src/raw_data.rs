//! Submitted form data.
//!
//! [`RawData`] wraps [`MultiValueDict`] to hold what a client posted: every
//! key maps to the ordered list of strings submitted under it. It can be
//! built programmatically, collected from an iterator, or parsed from an
//! `application/x-www-form-urlencoded` body.

use formskit_core::utils::MultiValueDict;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// A multi-valued submission container.
///
/// # Examples
///
/// ```
/// use formskit_forms::raw_data::RawData;
///
/// let raw = RawData::parse("form_name=Form1&color=red&color=blue");
/// assert_eq!(raw.get_list("color"), Some(&vec!["red".to_string(), "blue".to_string()]));
///
/// let raw: RawData = [("form_name", vec!["Form1"]), ("name1", vec!["value1"])]
///     .into_iter()
///     .collect();
/// assert!(raw.contains_key("name1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawData {
    data: MultiValueDict<String, String>,
}

impl RawData {
    /// Creates an empty `RawData`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a urlencoded body (e.g. `"key1=val1&key2=val2"`).
    ///
    /// `+` decodes to a space and percent escapes are decoded; a pair
    /// without `=` yields an empty value.
    pub fn parse(body: &str) -> Self {
        let mut data = MultiValueDict::new();

        for pair in body.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            data.append(percent_decode(key), percent_decode(value));
        }

        Self { data }
    }

    /// Returns all values submitted under `key`.
    pub fn get_list(&self, key: &str) -> Option<&Vec<String>> {
        self.data.get_list(&key.to_string())
    }

    /// Replaces the values submitted under `key`.
    pub fn set_list<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data
            .set_list(key.into(), values.into_iter().map(Into::into).collect());
    }

    /// Appends one value under `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.append(key.into(), value.into());
    }

    /// Returns `true` if `key` was submitted (possibly with no values).
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(&key.to_string())
    }

    /// Returns the submitted keys in submission order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Returns `(key, values)` pairs in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.data.iter()
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Encodes the data as a urlencoded body.
    ///
    /// Pairs are emitted in insertion order, so values under one key keep
    /// their submission order through [`parse`](Self::parse).
    pub fn urlencode(&self) -> String {
        self.data
            .iter()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .map(move |value| format!("{}={}", percent_encode(key), percent_encode(value)))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Returns a reference to the underlying `MultiValueDict`.
    pub const fn data(&self) -> &MultiValueDict<String, String> {
        &self.data
    }
}

impl<K, I, S> FromIterator<(K, I)> for RawData
where
    K: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut raw = Self::new();
        for (key, values) in iter {
            raw.set_list(key, values);
        }
        raw
    }
}

impl From<MultiValueDict<String, String>> for RawData {
    fn from(data: MultiValueDict<String, String>) -> Self {
        Self { data }
    }
}

fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Everything but the unreserved characters `A-Z a-z 0-9 - _ . ~`.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn percent_encode(input: &str) -> String {
    // A literal '+' is escaped, so "%20" can only come from a space.
    utf8_percent_encode(input, FORM_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_values() {
        let raw = RawData::parse("a=1&b=2&a=3");
        assert_eq!(raw.len(), 2);
        assert_eq!(
            raw.get_list("a"),
            Some(&vec!["1".to_string(), "3".to_string()])
        );
    }

    #[test]
    fn test_parse_decoding() {
        let raw = RawData::parse("full+name=Jan%20Kowalski&flag&token=eyJu%3D");
        assert_eq!(raw.get_list("full name"), Some(&vec!["Jan Kowalski".to_string()]));
        assert_eq!(raw.get_list("flag"), Some(&vec![String::new()]));
        assert_eq!(raw.get_list("token"), Some(&vec!["eyJu=".to_string()]));
    }

    #[test]
    fn test_parse_empty() {
        assert!(RawData::parse("").is_empty());
        assert!(RawData::parse("&&").is_empty());
    }

    #[test]
    fn test_keys_in_submission_order() {
        let raw = RawData::parse("z=1&a=2&m=3");
        let keys: Vec<_> = raw.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_set_list_and_append() {
        let mut raw = RawData::new();
        raw.append("x", "1");
        raw.set_list("x", ["2", "3"]);
        raw.set_list("empty", Vec::<String>::new());
        assert_eq!(raw.get_list("x").map(Vec::len), Some(2));
        assert!(raw.contains_key("empty"));
        assert_eq!(raw.get_list("empty"), Some(&Vec::new()));
    }

    #[test]
    fn test_urlencode_keeps_insertion_order() {
        let raw: RawData = [("b", vec!["x y"]), ("a", vec!["1", "0"])].into_iter().collect();
        assert_eq!(raw.urlencode(), "b=x+y&a=1&a=0");
    }

    #[test]
    fn test_urlencode_leaves_unreserved_characters() {
        let raw: RawData = [("form_name", vec!["F"]), ("when", vec!["2024-03-01", "14:30"])]
            .into_iter()
            .collect();
        assert_eq!(raw.urlencode(), "form_name=F&when=2024-03-01&when=14%3A30");

        let raw: RawData = [("k", vec!["a.b~c", "1+1", "50%"])].into_iter().collect();
        assert_eq!(raw.urlencode(), "k=a.b~c&k=1%2B1&k=50%25");
    }

    #[test]
    fn test_urlencode_reparses_in_order() {
        let raw: RawData = [("when", vec!["2024-03-01", "14:30"]), ("z", vec!["b", "a"])]
            .into_iter()
            .collect();
        let again = RawData::parse(&raw.urlencode());
        assert_eq!(
            again.get_list("when"),
            Some(&vec!["2024-03-01".to_string(), "14:30".to_string()])
        );
        assert_eq!(again.get_list("z"), Some(&vec!["b".to_string(), "a".to_string()]));
        assert_eq!(again, raw);
    }

    #[test]
    fn test_urlencode_reparses() {
        let raw = RawData::parse("name=%C5%BC%C3%B3%C5%82w&name=a%26b");
        let again = RawData::parse(&raw.urlencode());
        assert_eq!(again.get_list("name"), raw.get_list("name"));
    }
}
