use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::ComparatorConfig,
    format::{FieldFormatter, FieldType},
    payload::{ComparisonPayload, FieldDescriptor, ObjectSection},
    record::{RawRecord, Resolved, resolve, resolve_display_override},
};

// ================================================================================================
// Rendered View Model
// ================================================================================================

/// One field of one record, resolved and formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    pub api_name: String,
    pub label: String,
    /// Raw resolved value, `null` when the path did not resolve.
    pub raw_value: Value,
    pub formatted_value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedChildRecord {
    pub fields_with_values: Vec<RenderedField>,
}

/// One side of a section after field resolution.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedObjectSection {
    /// Fields of the parent/self record; empty when the side has no record.
    pub fields_with_values: Vec<RenderedField>,
    pub child_records_with_values: Vec<RenderedChildRecord>,
}

/// One object type compared across both quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSection {
    pub object_api_name: String,
    pub object_label: String,
    pub quote1: Option<RenderedObjectSection>,
    pub quote2: Option<RenderedObjectSection>,
    /// Derived from the left-hand side only.
    pub has_parent_record: bool,
    /// Derived from the left-hand side only.
    pub has_child_records: bool,
}

impl ComparisonSection {
    pub fn quote1_fields(&self) -> &[RenderedField] {
        fields_of(self.quote1.as_ref())
    }

    pub fn quote2_fields(&self) -> &[RenderedField] {
        fields_of(self.quote2.as_ref())
    }

    pub fn quote1_children(&self) -> &[RenderedChildRecord] {
        children_of(self.quote1.as_ref())
    }

    pub fn quote2_children(&self) -> &[RenderedChildRecord] {
        children_of(self.quote2.as_ref())
    }
}

fn fields_of(side: Option<&RenderedObjectSection>) -> &[RenderedField] {
    side.map(|s| s.fields_with_values.as_slice()).unwrap_or(&[])
}

fn children_of(side: Option<&RenderedObjectSection>) -> &[RenderedChildRecord] {
    side.map(|s| s.child_records_with_values.as_slice())
        .unwrap_or(&[])
}

// ================================================================================================
// Section Assembler
// ================================================================================================

/// Turns a [`ComparisonPayload`] into the ordered list of display sections.
///
/// # Algorithm
///
/// For every key of `section_order`, in order:
/// 1. Look up both sides; either may be missing.
/// 2. Pick the field list both sides are rendered with: the left-hand side's
///    when it declares any, otherwise the right-hand side's own.
/// 3. Render the parent record (if any) and every child record of each side
///    against that field list.
/// 4. Take the label and the parent/child flags from the left-hand side only,
///    falling back to the configured label when it is missing.
///
/// The assembler never mutates the payload and never fails; gaps render as the
/// empty placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionAssembler {
    formatter: FieldFormatter,
    fallback_object_label: String,
}

impl Default for SectionAssembler {
    fn default() -> Self {
        Self::from_config(&ComparatorConfig::default())
    }
}

impl SectionAssembler {
    pub fn new(formatter: FieldFormatter, fallback_object_label: impl Into<String>) -> Self {
        Self {
            formatter,
            fallback_object_label: fallback_object_label.into(),
        }
    }

    pub fn from_config(config: &ComparatorConfig) -> Self {
        Self::new(
            FieldFormatter::from_config(config),
            config.fallback_object_label(),
        )
    }

    pub fn formatter(&self) -> &FieldFormatter {
        &self.formatter
    }

    #[tracing::instrument(skip_all, fields(sections = payload.map_or(0, |p| p.section_order.len())))]
    pub fn assemble(&self, payload: Option<&ComparisonPayload>) -> Vec<ComparisonSection> {
        let Some(payload) = payload else {
            return Vec::new();
        };

        let sections: Vec<_> = payload
            .section_order
            .iter()
            .map(|key| {
                self.assemble_section(
                    key,
                    payload.quote1_data.get(key),
                    payload.quote2_data.get(key),
                )
            })
            .collect();

        debug!(count = sections.len(), "Assembled comparison sections");
        sections
    }

    fn assemble_section(
        &self,
        key: &str,
        quote1: Option<&ObjectSection>,
        quote2: Option<&ObjectSection>,
    ) -> ComparisonSection {
        let right_fields = right_field_list(quote1, quote2);

        ComparisonSection {
            object_api_name: key.to_string(),
            object_label: quote1
                .map(|s| s.object_label.clone())
                .unwrap_or_else(|| self.fallback_object_label.clone()),
            quote1: quote1.map(|s| self.render_side(s, &s.fields)),
            quote2: quote2.map(|s| self.render_side(s, right_fields)),
            has_parent_record: quote1.is_some_and(ObjectSection::has_record),
            has_child_records: quote1.is_some_and(ObjectSection::has_child_records),
        }
    }

    fn render_side(
        &self,
        section: &ObjectSection,
        fields: &[FieldDescriptor],
    ) -> RenderedObjectSection {
        let fields_with_values = match &section.record {
            Some(record) => self.render_fields(Some(record), fields),
            None => Vec::new(),
        };

        let child_records_with_values = section
            .child_records
            .iter()
            .map(|child| RenderedChildRecord {
                fields_with_values: self.render_fields(child.record.as_ref(), fields),
            })
            .collect();

        RenderedObjectSection {
            fields_with_values,
            child_records_with_values,
        }
    }

    fn render_fields(
        &self,
        record: Option<&RawRecord>,
        fields: &[FieldDescriptor],
    ) -> Vec<RenderedField> {
        fields
            .iter()
            .map(|field| self.render_field(record, field))
            .collect()
    }

    fn render_field(&self, record: Option<&RawRecord>, field: &FieldDescriptor) -> RenderedField {
        let resolved = resolve(record, &field.api_name);
        let formatted_value = match resolve_display_override(record, &field.api_name) {
            Some(name) => self
                .formatter
                .format(Resolved::from(name), &FieldType::default()),
            None => self.formatter.format(resolved, &field.field_type),
        };

        RenderedField {
            api_name: field.api_name.clone(),
            label: self
                .formatter
                .label(&field.api_name, &field.label)
                .to_string(),
            raw_value: resolved.to_owned_value(),
            formatted_value,
        }
    }
}

/// The left-hand list decides what is compared; the right-hand side only
/// falls back to its own list when the left declares none.
fn right_field_list<'a>(
    quote1: Option<&'a ObjectSection>,
    quote2: Option<&'a ObjectSection>,
) -> &'a [FieldDescriptor] {
    quote1
        .filter(|s| !s.fields.is_empty())
        .or(quote2)
        .map(|s| s.fields.as_slice())
        .unwrap_or(&[])
}
