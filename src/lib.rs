//! Side-by-side comparison of two sales quotes.
//!
//! A backend supplies a [`payload::ComparisonPayload`] describing both quotes
//! and their related records per object type. [`section::SectionAssembler`]
//! turns it into ordered, display-ready [`section::ComparisonSection`]s, and
//! [`view::ComparisonController`] manages the select, fetch and display cycle
//! around it.

pub mod config;
pub mod error;
pub mod format;
mod macros;
pub mod payload;
pub mod prelude;
pub mod record;
pub mod section;
pub mod view;
