//! Analytics datasets for the planboard dashboard.
//!
//! Each dataset is a separate module producing a serializable result
//! struct; [`analyze`] orchestrates them into an [`AnalyticsReport`].
//! The pipeline mirrors the dashboard page: the base filter narrows
//! plans and reports together, stat cards summarize the base pair, and
//! the chart datasets follow the highlighted subset when a category is
//! selected.
//!
//! Everything here is pure: callers pass the reference day explicitly,
//! and identical inputs always produce identical reports.

pub mod activity;
pub mod filter;
pub mod plan_stats;
pub mod report;
pub mod scores;
pub mod status;

pub use activity::{analyze_activity, ExecutorActivity};
pub use filter::{AnalyticsFilter, AnalyticsFilterForm};
pub use plan_stats::{summarize_plans, CategoryStat, PlanStats};
pub use report::AnalyticsReport;
pub use scores::{analyze_scores, ScoreDistribution};
pub use status::{analyze_status, status_of, PlanStatus, StatusDistribution};

use planboard_model::{Plan, QuarterlyReport, User};
use planboard_view::{compose, HighlightSelection, PlanCategory};
use time::Date;

/// Run the full dataset suite.
///
/// `highlight` plays the part of a clicked stat card: the id set for
/// that category is captured from the base-filtered stats and the
/// chart datasets are computed over the restricted pair.
pub fn analyze(
    plans: &[Plan],
    reports: &[QuarterlyReport],
    users: &[User],
    filter: &AnalyticsFilter,
    highlight: Option<PlanCategory>,
    today: Date,
) -> AnalyticsReport {
    let (base_plans, base_reports) = filter.apply(plans, reports);
    let plan_stats = summarize_plans(&base_plans, &base_reports, today);

    let mut selection = HighlightSelection::new();
    if let Some(category) = highlight {
        selection.toggle(category, plan_stats.ids_for(category).iter().copied());
    }
    let (shown_plans, shown_reports) = compose(&base_plans, &base_reports, &selection);

    AnalyticsReport {
        filter: filter.clone(),
        reference_date: planboard_model::datetime::format_date(today),
        highlighted: selection.category(),
        plan_stats,
        status: analyze_status(&shown_plans, &shown_reports, today),
        scores: analyze_scores(&shown_reports),
        executor_activity: analyze_activity(&shown_reports, users),
    }
}
