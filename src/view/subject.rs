use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    record::{RawRecord, RecordId},
    view::fetch::FetchFailure,
};

/// Fields requested for the record the comparison starts from.
pub const SUBJECT_FIELDS: [&str; 2] = ["Quote.Name", "Quote.QuoteNumber"];

/// Backend capability returning current field values of a single record.
///
/// `fields` are qualified with the object name (`Quote.Name`); the returned
/// record is keyed by the unqualified field name (`Name`).
pub trait SubjectLookup: Send + Sync {
    fn lookup(
        &self,
        id: &RecordId,
        fields: &[&str],
    ) -> impl Future<Output = Result<RawRecord, FetchFailure>> + Send;
}

/// Display identity of the record being compared.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub name: String,
    pub number: String,
}

impl SubjectSummary {
    /// Summary shown while the lookup is pending or after it failed.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: String::new(),
        }
    }

    /// Builds a summary from a looked-up record, keeping `placeholder_name`
    /// when the record carries no usable name.
    pub fn from_record(record: &RawRecord, placeholder_name: &str) -> Self {
        Self {
            name: text_field(record, "Name").unwrap_or_else(|| placeholder_name.to_string()),
            number: text_field(record, "QuoteNumber").unwrap_or_default(),
        }
    }
}

fn text_field(record: &RawRecord, name: &str) -> Option<String> {
    match record.get(name)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
