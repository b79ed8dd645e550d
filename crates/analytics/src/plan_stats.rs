//! Stat-card numbers: how many plans are active, completed, overdue.
//!
//! Alongside each count the id list is kept in input order -- clicking
//! a card hands exactly that list to the highlight selection.

use serde::Serialize;
use time::Date;

use planboard_model::{Plan, QuarterlyReport};
use planboard_view::{classify_plan, PlanCategory};

/// Count plus the plan ids behind it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryStat {
    pub count: usize,
    pub ids: Vec<i64>,
}

impl CategoryStat {
    fn push(&mut self, id: i64) {
        self.count += 1;
        self.ids.push(id);
    }
}

/// Per-category totals over the base-filtered plans.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStats {
    pub total: usize,
    pub active: CategoryStat,
    pub completed: CategoryStat,
    pub overdue: CategoryStat,
}

impl PlanStats {
    /// The id list a stat card for `category` would highlight.
    pub fn ids_for(&self, category: PlanCategory) -> &[i64] {
        match category {
            PlanCategory::Active => &self.active.ids,
            PlanCategory::Completed => &self.completed.ids,
            PlanCategory::Overdue => &self.overdue.ids,
        }
    }
}

/// Classify every plan against `today` and the given reports.
pub fn summarize_plans(plans: &[Plan], reports: &[QuarterlyReport], today: Date) -> PlanStats {
    let mut stats = PlanStats {
        total: plans.len(),
        ..PlanStats::default()
    };
    for plan in plans {
        match classify_plan(plan, reports, today) {
            PlanCategory::Active => stats.active.push(plan.id),
            PlanCategory::Completed => stats.completed.push(plan.id),
            PlanCategory::Overdue => stats.overdue.push(plan.id),
        }
    }
    stats
}
