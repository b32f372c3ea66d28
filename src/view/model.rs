use serde::Serialize;

use crate::{section::ComparisonSection, view::status::ViewStatus};

/// Snapshot of everything a presentation layer needs to draw the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub status: ViewStatus,
    pub subject_name: String,
    pub subject_number: String,
    pub comparison_label: String,
    pub quote1_name: String,
    pub quote2_name: String,
    pub candidate_id: Option<String>,
    pub sections: Vec<ComparisonSection>,
    /// Message of the last failed fetch, cleared by the next attempt.
    pub error: Option<String>,
}

impl ComparisonView {
    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn show_comparison(&self) -> bool {
        self.status.is_showing_comparison()
    }

    pub fn has_sections(&self) -> bool {
        !self.sections.is_empty()
    }
}
