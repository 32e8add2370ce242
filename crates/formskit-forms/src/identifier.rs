//! Field identifier tokens.
//!
//! Every field of a [`TreeForm`](crate::tree_form::TreeForm) is addressed on
//! the wire by an opaque token: the URL-safe base64 encoding of a JSON
//! document naming the field and the full path of forms above it.
//!
//! ```json
//! {"name": "surname", "parents": [{"name": "MainForm", "index": null},
//!                                 {"name": "PeopleForm", "index": 2}]}
//! ```
//!
//! `parents` runs from the root (whose index is `null`) down to the form that
//! owns the field. Tokens are padded on encode; padding is optional on
//! decode.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use formskit_core::{FormskitError, FormskitResult};

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// One step of a form path: a form name and its position among siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormLocation {
    /// The registered form name.
    pub name: String,
    /// The instance index; `None` for the root form.
    pub index: Option<usize>,
}

impl FormLocation {
    /// Creates a location.
    pub fn new(name: impl Into<String>, index: Option<usize>) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// The decoded content of a field identifier token.
///
/// # Examples
///
/// ```
/// use formskit_forms::identifier::{FieldIdentifier, FormLocation};
///
/// let id = FieldIdentifier::new(
///     "surname",
///     vec![FormLocation::new("MainForm", None), FormLocation::new("PeopleForm", Some(2))],
/// );
/// let token = id.encode().unwrap();
/// assert_eq!(FieldIdentifier::decode(&token).unwrap(), id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIdentifier {
    /// The field name within its owning form.
    pub name: String,
    /// The path from the root form down to the owning form.
    pub parents: Vec<FormLocation>,
}

impl FieldIdentifier {
    /// Creates an identifier.
    pub fn new(name: impl Into<String>, parents: Vec<FormLocation>) -> Self {
        Self {
            name: name.into(),
            parents,
        }
    }

    /// Encodes the identifier as a padded URL-safe base64 token.
    pub fn encode(&self) -> FormskitResult<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| FormskitError::SerializationError(e.to_string()))?;
        Ok(TOKEN_ENGINE.encode(json))
    }

    /// Decodes a token produced by [`encode`](Self::encode).
    ///
    /// Malformed base64, non-UTF-8 content, JSON of the wrong shape and an
    /// empty path all fail with [`FormskitError::BadFieldReference`]
    /// carrying the token.
    pub fn decode(token: &str) -> FormskitResult<Self> {
        let bad = |reason: &dyn std::fmt::Display| {
            tracing::warn!(token, %reason, "rejecting field identifier");
            FormskitError::BadFieldReference(token.to_string())
        };

        let bytes = TOKEN_ENGINE.decode(token).map_err(|e| bad(&e))?;
        let json = std::str::from_utf8(&bytes).map_err(|e| bad(&e))?;
        let identifier: Self = serde_json::from_str(json).map_err(|e| bad(&e))?;

        if identifier.parents.is_empty() {
            return Err(bad(&"empty form path"));
        }
        Ok(identifier)
    }

    /// Returns the location of the form that owns the field.
    pub fn owner(&self) -> Option<&FormLocation> {
        self.parents.last()
    }
}
