//! Client-side data view engine for the planboard dashboard.
//!
//! Pure, deterministic transforms over already-fetched collections:
//!
//! - [`filter`] -- per-entity conjunctive criteria with explicit
//!   `Option` fields for "unset";
//! - [`form`] -- lenient free-text criteria as they arrive from UI
//!   controls, converted infallibly to typed filters;
//! - [`sort`] -- a total, stable comparator over wire field names;
//! - [`highlight`] -- plan category classification and the highlighted
//!   subset composition driven by stat-card toggles.
//!
//! Nothing in this crate performs I/O or panics on malformed data;
//! records with missing fields simply fail criteria or sort to the
//! positions the comparator assigns them.

pub mod filter;
pub mod form;
pub mod highlight;
pub mod sort;

pub use filter::{
    filter_records, AssessmentState, Criteria, FilterSpec, PlanFilter, ReportFilter, UserFilter,
};
pub use form::{PlanFilterForm, ReportFilterForm, UserFilterForm};
pub use highlight::{classify_plan, compose, HighlightSelection, PlanCategory};
pub use sort::{sort_records, sort_records_with, FieldValue, SortDirection, SortKey};
