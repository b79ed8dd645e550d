//! Plan categories and the highlighted-subset composition.
//!
//! Stat cards on the analytics page classify every plan as active,
//! completed, or overdue. Clicking a card toggles a highlight: while a
//! category is selected, both the plans table and the reports table
//! show only rows belonging to the captured plan ids. Clicking the
//! same card again -- or changing the base filters -- clears the
//! selection, and both tables fall back to the base filtered data
//! unchanged.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::Date;

use planboard_model::{Plan, QuarterlyReport};

/// Lifecycle bucket of a plan relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanCategory {
    Active,
    Completed,
    Overdue,
}

/// Classify one plan against the reports that reference it.
///
/// A plan still running (`endDate` strictly after `today`, or no
/// `endDate` at all) is active. An ended plan is completed when at
/// least one report references it, overdue otherwise.
pub fn classify_plan(plan: &Plan, reports: &[QuarterlyReport], today: Date) -> PlanCategory {
    match plan.end_date {
        Some(end) if end <= today => {
            if reports.iter().any(|r| r.plan_id == plan.id) {
                PlanCategory::Completed
            } else {
                PlanCategory::Overdue
            }
        }
        _ => PlanCategory::Active,
    }
}

/// The toggle state behind the stat cards.
///
/// Captures the plan-id set at selection time; the base collections may
/// be refiltered afterwards without moving the highlight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightSelection {
    category: Option<PlanCategory>,
    ids: BTreeSet<i64>,
}

impl HighlightSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> Option<PlanCategory> {
        self.category
    }

    pub fn ids(&self) -> &BTreeSet<i64> {
        &self.ids
    }

    /// No restriction in effect. A selected category with no plans
    /// behaves exactly like no selection.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Select a category, or clear it when it is already selected.
    pub fn toggle(&mut self, category: PlanCategory, ids: impl IntoIterator<Item = i64>) {
        if self.category == Some(category) {
            self.clear();
        } else {
            self.category = Some(category);
            self.ids = ids.into_iter().collect();
        }
    }

    pub fn clear(&mut self) {
        self.category = None;
        self.ids.clear();
    }
}

/// Apply a highlight to base-filtered collections.
///
/// With no selection both come back unchanged (same elements, same
/// order). With a selection, plans are restricted by `id` and reports
/// by `planId`, order preserved.
pub fn compose(
    plans: &[Plan],
    reports: &[QuarterlyReport],
    selection: &HighlightSelection,
) -> (Vec<Plan>, Vec<QuarterlyReport>) {
    if selection.is_empty() {
        return (plans.to_vec(), reports.to_vec());
    }
    let ids = selection.ids();
    let plans = plans
        .iter()
        .filter(|p| ids.contains(&p.id))
        .cloned()
        .collect();
    let reports = reports
        .iter()
        .filter(|r| ids.contains(&r.plan_id))
        .cloned()
        .collect();
    (plans, reports)
}
