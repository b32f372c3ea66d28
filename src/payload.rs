use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

use crate::{
    error::{CompareResult, PayloadError},
    format::FieldType,
    record::RawRecord,
};

/// Key identifying one business-object type (e.g. `Quote`, `QuoteLineItem`).
pub type ObjectKey = String;

/// Metadata describing one comparable attribute.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub api_name: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub label: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(
        api_name: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            api_name: api_name.into(),
            label: label.into(),
            field_type,
        }
    }
}

/// A record subordinate to a section's parent record, e.g. a line item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRecord {
    #[serde(default)]
    pub record: Option<RawRecord>,
}

/// One business-object grouping for one side of the comparison.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSection {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub object_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_api_name: Option<String>,
    #[serde(default)]
    pub record: Option<RawRecord>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub child_records: Vec<ChildRecord>,
}

impl ObjectSection {
    pub fn has_record(&self) -> bool {
        self.record.is_some()
    }

    pub fn has_child_records(&self) -> bool {
        !self.child_records.is_empty()
    }
}

/// The backend's answer to a comparison request.
///
/// Both data maps are keyed by the entries of `section_order`; either side may
/// lack a key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPayload {
    #[serde(default)]
    pub section_order: Vec<ObjectKey>,
    #[serde(default)]
    pub quote1_data: HashMap<ObjectKey, ObjectSection>,
    #[serde(default)]
    pub quote2_data: HashMap<ObjectKey, ObjectSection>,
}

impl ComparisonPayload {
    /// Decodes and validates a payload from its JSON wire form.
    #[tracing::instrument(skip_all, fields(len = json.len()))]
    pub fn from_json(json: &str) -> CompareResult<Self> {
        let payload: Self = serde_json::from_str(json).map_err(PayloadError::from)?;
        payload.validate()?;
        Ok(payload)
    }

    /// Checks that `section_order` names every object type at most once.
    pub fn validate(&self) -> CompareResult<()> {
        let mut seen = HashSet::with_capacity(self.section_order.len());
        for key in &self.section_order {
            if !seen.insert(key.as_str()) {
                return Err(PayloadError::DuplicateSectionKey(key.clone()).into());
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.section_order.is_empty()
    }
}
