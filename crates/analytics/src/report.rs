//! The aggregated analytics report.

use serde::Serialize;

use planboard_view::PlanCategory;

use crate::activity::ExecutorActivity;
use crate::filter::AnalyticsFilter;
use crate::plan_stats::PlanStats;
use crate::scores::ScoreDistribution;
use crate::status::StatusDistribution;

/// Everything the analytics page shows, in one serializable bundle.
///
/// `planStats` reflects the base-filtered pair; the chart datasets
/// reflect the highlighted subset when `highlighted` is set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub filter: AnalyticsFilter,
    pub reference_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<PlanCategory>,
    pub plan_stats: PlanStats,
    pub status: StatusDistribution,
    pub scores: ScoreDistribution,
    pub executor_activity: Vec<ExecutorActivity>,
}
