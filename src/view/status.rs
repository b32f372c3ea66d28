use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Lifecycle status of a comparison view.
///
/// # Lifecycle
///
/// ```md
/// Current State                   | Action                | Next State        | Notes
/// --------------------------------|-----------------------|-------------------|----------------------------------
/// `Idle` / `Selecting`            | select_target()       | Selecting         | Stores the candidate id
/// `Idle` / `Selecting`            | request_compare()     | Selecting         | Validation failed, toast shown
/// `Selecting`                     | request_compare()     | Loading           | Fetch started
/// `Loading`                       | fetch completes (ok)  | ShowingComparison | Sections assembled
/// `Loading`                       | fetch completes (err) | Selecting         | Toast shown, selection kept
/// `Loading` / `ShowingComparison` | go_back()             | Selecting         | Session discarded
/// any                             | close()               | Idle              | Session discarded, host dismisses
/// `Idle` / `Selecting`            | cancel()              | Idle              | Same as close()
/// ```
///
/// Other combinations are rejected with [`crate::error::ViewError::InvalidTransition`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ViewStatus {
    /// Nothing selected yet.
    #[default]
    Idle,

    /// A comparison target may be chosen; nothing is being fetched.
    Selecting,

    /// The comparison fetch is in flight.
    Loading,

    /// The payload arrived and the sections are available.
    ShowingComparison,
}

impl ViewStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self, Self::Selecting)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_showing_comparison(&self) -> bool {
        matches!(self, Self::ShowingComparison)
    }

    /// `true` while the selection step is on screen.
    pub fn accepts_selection(&self) -> bool {
        matches!(self, Self::Idle | Self::Selecting)
    }
}
