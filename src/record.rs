use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::impl_string_newtype;

/// Separator between segments of a relationship path (`Account.Owner.Name`).
pub const PATH_SEPARATOR: char = '.';

/// Lookup field that displays the related product's name instead of its id.
pub const PRODUCT_LOOKUP_FIELD: &str = "Product2Id";

/// Relationship under which the related product object is nested.
pub const PRODUCT_RELATIONSHIP: &str = "Product2";

/// Name field on the related product object.
pub const PRODUCT_NAME_FIELD: &str = "Name";

/// A record as returned by the backend: field name to value, with related
/// records nested as JSON objects under their relationship name.
pub type RawRecord = Map<String, Value>;

/// Identifier of a business record (e.g. a quote id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct RecordId(pub String);
impl_string_newtype!(RecordId);

impl RecordId {
    /// `true` when the id is blank and therefore identifies nothing.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// ================================================================================================
// Resolution Result
// ================================================================================================

/// Outcome of resolving a field path against a record.
///
/// `Empty` covers every gap: no record, no field name, a missing relationship
/// hop, or a `null` leaf. It is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Resolved<'a> {
    #[default]
    Empty,
    Value(&'a Value),
}

impl<'a> From<&'a Value> for Resolved<'a> {
    fn from(value: &'a Value) -> Self {
        Self::from_option(Some(value))
    }
}

impl<'a> Resolved<'a> {
    fn from_option(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Empty,
            Some(value) => Self::Value(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Self::Empty => None,
            Self::Value(value) => Some(value),
        }
    }

    /// Owned copy of the resolved value, `Value::Null` when empty.
    pub fn to_owned_value(&self) -> Value {
        self.value().cloned().unwrap_or(Value::Null)
    }
}

// ================================================================================================
// Field Value Resolver
// ================================================================================================

/// Resolves a plain or dotted field path against `record`.
///
/// Each segment of a relationship path is looked up on the object reached by
/// the previous segment; the first gap short-circuits to [`Resolved::Empty`].
///
/// ```
/// # use quote_comparator::prelude::*;
/// let record = serde_json::json!({ "Account": { "Name": "Acme" } });
/// let record = record.as_object().unwrap();
/// assert_eq!(resolve(Some(record), "Account.Name").value(), Some(&"Acme".into()));
/// assert!(resolve(Some(record), "Account.Owner.Name").is_empty());
/// ```
pub fn resolve<'a>(record: Option<&'a RawRecord>, field_api_name: &str) -> Resolved<'a> {
    let Some(record) = record else {
        return Resolved::Empty;
    };
    if field_api_name.is_empty() {
        return Resolved::Empty;
    }

    let mut segments = field_api_name.split(PATH_SEPARATOR);
    // `split` always yields at least one segment.
    let first = segments.next().unwrap_or_default();
    let mut current = record.get(first);

    for segment in segments {
        current = match current {
            Some(Value::Object(related)) => related.get(segment),
            _ => return Resolved::Empty,
        };
    }

    Resolved::from_option(current)
}

/// Resolves the related product name for a [`PRODUCT_LOOKUP_FIELD`] field.
///
/// Returns `None` for any other field, or when no non-null
/// `Product2.Name` is reachable on the record.
pub fn resolve_display_override<'a>(
    record: Option<&'a RawRecord>,
    field_api_name: &str,
) -> Option<&'a Value> {
    if field_api_name != PRODUCT_LOOKUP_FIELD {
        return None;
    }
    let path = format!("{PRODUCT_RELATIONSHIP}{PATH_SEPARATOR}{PRODUCT_NAME_FIELD}");
    match resolve(record, &path) {
        Resolved::Value(Value::String(name)) if name.is_empty() => None,
        resolved => resolved.value(),
    }
}
