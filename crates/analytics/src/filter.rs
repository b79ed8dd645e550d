//! The analytics base filter.
//!
//! One criteria set restricts plans and reports *together*: year and
//! quarter touch reports only, while plan, executor, and the date
//! window cut both collections so the stat cards and charts stay
//! consistent with each other.

use serde::{Deserialize, Serialize};
use time::Date;

use planboard_model::datetime::{end_of_day, parse_date, start_of_day};
use planboard_model::{Plan, QuarterlyReport};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
    /// Restricts reports by `reportingUserId` and plans by membership
    /// in `executorUserIds`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor_id: Option<i64>,
    /// Reports created from this day on; plans starting from this day.
    #[serde(
        with = "planboard_model::datetime::date_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_from: Option<Date>,
    /// Reports created through this day; plans ending by this day.
    #[serde(
        with = "planboard_model::datetime::date_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_to: Option<Date>,
}

impl AnalyticsFilter {
    pub fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.quarter.is_none()
            && self.plan_id.is_none()
            && self.executor_id.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    fn keeps_report(&self, report: &QuarterlyReport) -> bool {
        if let Some(year) = self.year {
            if report.year != year {
                return false;
            }
        }
        if let Some(quarter) = self.quarter {
            if report.quarter != quarter {
                return false;
            }
        }
        if let Some(id) = self.plan_id {
            if report.plan_id != id {
                return false;
            }
        }
        if let Some(id) = self.executor_id {
            if report.reporting_user_id != id {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            match report.created_at {
                Some(ts) if ts >= start_of_day(from) => {}
                _ => return false,
            }
        }
        if let Some(to) = self.date_to {
            match report.created_at {
                Some(ts) if ts <= end_of_day(to) => {}
                _ => return false,
            }
        }
        true
    }

    fn keeps_plan(&self, plan: &Plan) -> bool {
        if let Some(id) = self.plan_id {
            if plan.id != id {
                return false;
            }
        }
        if let Some(id) = self.executor_id {
            if !plan.executor_user_ids.contains(&id) {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            match plan.start_date {
                Some(d) if d >= from => {}
                _ => return false,
            }
        }
        if let Some(to) = self.date_to {
            match plan.end_date {
                Some(d) if d <= to => {}
                _ => return false,
            }
        }
        true
    }

    /// Narrow both collections, preserving input order.
    pub fn apply(
        &self,
        plans: &[Plan],
        reports: &[QuarterlyReport],
    ) -> (Vec<Plan>, Vec<QuarterlyReport>) {
        let plans = plans.iter().filter(|p| self.keeps_plan(p)).cloned().collect();
        let reports = reports
            .iter()
            .filter(|r| self.keeps_report(r))
            .cloned()
            .collect();
        (plans, reports)
    }
}

/// Raw text state of the analytics filter bar; conversion is lenient
/// the same way the table filter forms are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsFilterForm {
    pub year: String,
    pub quarter: String,
    pub plan_id: String,
    pub executor_id: String,
    pub date_from: String,
    pub date_to: String,
}

impl AnalyticsFilterForm {
    pub fn to_filter(&self) -> AnalyticsFilter {
        fn number<T: std::str::FromStr>(s: &str) -> Option<T> {
            let t = s.trim();
            (!t.is_empty()).then(|| t.parse().ok()).flatten()
        }
        fn day(s: &str) -> Option<Date> {
            let t = s.trim();
            (!t.is_empty()).then(|| parse_date(t)).flatten()
        }
        AnalyticsFilter {
            year: number(&self.year),
            quarter: number(&self.quarter),
            plan_id: number(&self.plan_id),
            executor_id: number(&self.executor_id),
            date_from: day(&self.date_from),
            date_to: day(&self.date_to),
        }
    }
}
