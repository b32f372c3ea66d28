// 1. Traits
pub use crate::view::{ComparisonFetcher, NotificationSink, SubjectLookup};

// 2. The Core Loop Types
pub use crate::view::{
    ComparisonController, ComparisonView, FetchCompletion, PendingFetch, UserEvent, ViewDriver,
    ViewSignal, ViewStatus,
};

// 3. Payload and View Model
pub use crate::payload::{ChildRecord, ComparisonPayload, FieldDescriptor, ObjectSection};
pub use crate::record::{RawRecord, RecordId, Resolved, resolve, resolve_display_override};
pub use crate::section::{
    ComparisonSection, RenderedChildRecord, RenderedField, RenderedObjectSection,
    SectionAssembler,
};

// 4. Formatting and Configuration
pub use crate::config::{ComparatorConfig, CurrencyStyle, DisplayLocale};
pub use crate::format::{FieldFormatter, FieldType};
pub use crate::view::{FetchFailure, NoopSink, Notification, Severity, SubjectSummary};

// 5. Errors
pub use crate::error::{
    CompareError, CompareResult, ConfigError, FetchError, PayloadError, ValidationError,
    ViewError,
};
