//! Conjunctive filter criteria, one shape per entity kind.
//!
//! Every criterion is an explicit `Option`: `None` means "no
//! restriction", never an empty string or other sentinel. A populated
//! criterion that a record cannot satisfy because the field is absent
//! fails that record -- missing data never matches a positive
//! criterion. Filtering preserves input order and never errors.

use serde::{Deserialize, Serialize};
use time::Date;

use planboard_model::datetime::{end_of_day, start_of_day};
use planboard_model::{Plan, QuarterlyReport, Role, User};

/// A set of criteria that can judge one record kind.
pub trait Criteria {
    type Record;

    /// True when no criterion is populated, i.e. every record matches.
    fn is_empty(&self) -> bool;

    /// All populated criteria must hold (conjunction).
    fn matches(&self, record: &Self::Record) -> bool;
}

/// Apply criteria to a slice, keeping input order. The result is always
/// a subset of the input; with empty criteria it is a full copy.
pub fn filter_records<C: Criteria>(records: &[C::Record], criteria: &C) -> Vec<C::Record>
where
    C::Record: Clone,
{
    records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

fn text_contains(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

// ──────────────────────────────────────────────
// Plans
// ──────────────────────────────────────────────

/// Criteria for the plans table: a free-text search plus a date window
/// on the plan's own range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanFilter {
    /// Case-insensitive substring over `name` or `description`.
    #[serde(rename = "searchTerm", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Keep plans whose `startDate` is on or after this day.
    #[serde(
        rename = "startDate",
        with = "planboard_model::datetime::date_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub starts_from: Option<Date>,
    /// Keep plans whose `endDate` is on or before this day.
    #[serde(
        rename = "endDate",
        with = "planboard_model::datetime::date_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub ends_until: Option<Date>,
}

impl Criteria for PlanFilter {
    type Record = Plan;

    fn is_empty(&self) -> bool {
        self.search.is_none() && self.starts_from.is_none() && self.ends_until.is_none()
    }

    fn matches(&self, plan: &Plan) -> bool {
        if let Some(term) = &self.search {
            let needle = term.to_lowercase();
            let in_name = text_contains(&plan.name, &needle);
            let in_description = plan
                .description
                .as_deref()
                .is_some_and(|d| text_contains(d, &needle));
            if !in_name && !in_description {
                return false;
            }
        }
        if let Some(bound) = self.starts_from {
            match plan.start_date {
                Some(d) if d >= bound => {}
                _ => return false,
            }
        }
        if let Some(bound) = self.ends_until {
            match plan.end_date {
                Some(d) if d <= bound => {}
                _ => return false,
            }
        }
        true
    }
}

// ──────────────────────────────────────────────
// Reports
// ──────────────────────────────────────────────

/// Whether a report has been scored by an analyst. Presence of
/// `analystAssessmentScore` is the whole test; a zero score is still
/// "assessed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentState {
    Assessed,
    Unassessed,
}

/// Criteria for the reports table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter: Option<u8>,
    #[serde(rename = "assessed", skip_serializing_if = "Option::is_none")]
    pub assessment: Option<AssessmentState>,
    /// Keep reports created on or after this day (from 00:00:00).
    #[serde(
        with = "planboard_model::datetime::date_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_from: Option<Date>,
    /// Keep reports created on or before this day (through the last
    /// instant of the day).
    #[serde(
        with = "planboard_model::datetime::date_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_to: Option<Date>,
}

impl Criteria for ReportFilter {
    type Record = QuarterlyReport;

    fn is_empty(&self) -> bool {
        self.plan_id.is_none()
            && self.reporting_user_id.is_none()
            && self.year.is_none()
            && self.quarter.is_none()
            && self.assessment.is_none()
            && self.created_from.is_none()
            && self.created_to.is_none()
    }

    fn matches(&self, report: &QuarterlyReport) -> bool {
        if let Some(id) = self.plan_id {
            if report.plan_id != id {
                return false;
            }
        }
        if let Some(id) = self.reporting_user_id {
            if report.reporting_user_id != id {
                return false;
            }
        }
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
        if let Some(state) = self.assessment {
            let assessed = report.analyst_assessment_score.is_some();
            if assessed != (state == AssessmentState::Assessed) {
                return false;
            }
        }
        if let Some(from) = self.created_from {
            match report.created_at {
                Some(ts) if ts >= start_of_day(from) => {}
                _ => return false,
            }
        }
        if let Some(to) = self.created_to {
            match report.created_at {
                Some(ts) if ts <= end_of_day(to) => {}
                _ => return false,
            }
        }
        true
    }
}

// ──────────────────────────────────────────────
// Users
// ──────────────────────────────────────────────

/// Criteria for the users table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFilter {
    /// Case-insensitive substring over `email` or `fullName`.
    #[serde(rename = "searchTerm", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Criteria for UserFilter {
    type Record = User;

    fn is_empty(&self) -> bool {
        self.search.is_none() && self.role.is_none()
    }

    fn matches(&self, user: &User) -> bool {
        if let Some(term) = &self.search {
            let needle = term.to_lowercase();
            let in_email = text_contains(&user.email, &needle);
            let in_name = user
                .full_name
                .as_deref()
                .is_some_and(|n| text_contains(n, &needle));
            if !in_email && !in_name {
                return false;
            }
        }
        if let Some(role) = self.role {
            if user.user_role != role {
                return false;
            }
        }
        true
    }
}

// ──────────────────────────────────────────────
// Runtime dispatch
// ──────────────────────────────────────────────

/// Filter criteria tagged by the entity kind they apply to. This is the
/// shape saved-filter files use; loading code can check the tag against
/// the collection it is about to filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "camelCase")]
pub enum FilterSpec {
    Plans(PlanFilter),
    Reports(ReportFilter),
    Users(UserFilter),
}

impl FilterSpec {
    pub fn entity(&self) -> &'static str {
        match self {
            FilterSpec::Plans(_) => "plans",
            FilterSpec::Reports(_) => "reports",
            FilterSpec::Users(_) => "users",
        }
    }

    pub fn as_plans(&self) -> Option<&PlanFilter> {
        match self {
            FilterSpec::Plans(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_reports(&self) -> Option<&ReportFilter> {
        match self {
            FilterSpec::Reports(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_users(&self) -> Option<&UserFilter> {
        match self {
            FilterSpec::Users(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use time::macros::{date, datetime};

    fn plan(id: i64, name: &str, description: Option<&str>) -> Plan {
        Plan {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            target_value: None,
            start_date: None,
            end_date: None,
            executor_user_ids: BTreeSet::new(),
            created_by_user_id: None,
            created_at: None,
        }
    }

    fn report(id: i64, plan_id: i64, score: Option<i32>) -> QuarterlyReport {
        QuarterlyReport {
            id,
            plan_id,
            reporting_user_id: 3,
            assessed_by_user_id: None,
            year: 2024,
            quarter: 2,
            actual_value: None,
            analyst_assessment_score: score,
            created_at: Some(datetime!(2024-07-02 09:00:00)),
        }
    }

    fn user(id: i64, email: &str, name: Option<&str>, role: Role) -> User {
        User {
            id,
            email: email.to_string(),
            full_name: name.map(str::to_string),
            user_role: role,
        }
    }

    #[test]
    fn empty_criteria_match_everything_in_order() {
        let plans = vec![plan(2, "b", None), plan(1, "a", None)];
        let out = filter_records(&plans, &PlanFilter::default());
        let ids: Vec<i64> = out.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn plan_search_covers_name_and_description_case_insensitively() {
        let plans = vec![
            plan(1, "Warehouse rollout", None),
            plan(2, "Audit", Some("annual WAREHOUSE check")),
            plan(3, "Hiring", Some("recruiters")),
            plan(4, "Misc", None),
        ];
        let f = PlanFilter {
            search: Some("warehouse".into()),
            ..PlanFilter::default()
        };
        let ids: Vec<i64> = filter_records(&plans, &f).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn plan_date_window_rejects_plans_without_the_field() {
        let mut bounded = plan(1, "a", None);
        bounded.start_date = Some(date!(2024 - 04 - 01));
        bounded.end_date = Some(date!(2024 - 06 - 30));
        let undated = plan(2, "b", None);

        let f = PlanFilter {
            starts_from: Some(date!(2024 - 04 - 01)),
            ..PlanFilter::default()
        };
        let ids: Vec<i64> = filter_records(&[bounded.clone(), undated.clone()], &f)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1]);

        let f = PlanFilter {
            ends_until: Some(date!(2024 - 06 - 30)),
            ..PlanFilter::default()
        };
        let ids: Vec<i64> = filter_records(&[bounded, undated], &f)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn report_exact_criteria_conjoin() {
        let reports = vec![
            report(1, 7, Some(4)),
            report(2, 7, None),
            report(3, 8, Some(5)),
        ];
        let f = ReportFilter {
            plan_id: Some(7),
            assessment: Some(AssessmentState::Assessed),
            ..ReportFilter::default()
        };
        let ids: Vec<i64> = filter_records(&reports, &f).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn zero_score_counts_as_assessed() {
        let reports = vec![report(1, 7, Some(0)), report(2, 7, None)];
        let assessed = ReportFilter {
            assessment: Some(AssessmentState::Assessed),
            ..ReportFilter::default()
        };
        let unassessed = ReportFilter {
            assessment: Some(AssessmentState::Unassessed),
            ..ReportFilter::default()
        };
        assert_eq!(filter_records(&reports, &assessed)[0].id, 1);
        assert_eq!(filter_records(&reports, &unassessed)[0].id, 2);
    }

    #[test]
    fn created_window_is_day_inclusive_on_both_ends() {
        let mut early = report(1, 7, None);
        early.created_at = Some(datetime!(2024-07-01 00:00:00));
        let mut late = report(2, 7, None);
        late.created_at = Some(datetime!(2024-07-01 23:59:59.999));
        let mut outside = report(3, 7, None);
        outside.created_at = Some(datetime!(2024-07-02 00:00:00));
        let mut unstamped = report(4, 7, None);
        unstamped.created_at = None;

        let f = ReportFilter {
            created_from: Some(date!(2024 - 07 - 01)),
            created_to: Some(date!(2024 - 07 - 01)),
            ..ReportFilter::default()
        };
        let ids: Vec<i64> = filter_records(&[early, late, outside, unstamped], &f)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn user_search_and_role_conjoin() {
        let users = vec![
            user(1, "ann@corp.io", Some("Ann Lee"), Role::Analyst),
            user(2, "bob@corp.io", Some("Bob Ann"), Role::Executor),
            user(3, "kim@corp.io", None, Role::Analyst),
        ];
        let f = UserFilter {
            search: Some("ann".into()),
            role: Some(Role::Analyst),
            ..UserFilter::default()
        };
        let ids: Vec<i64> = filter_records(&users, &f).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn spec_round_trips_with_entity_tag() {
        let spec = FilterSpec::Reports(ReportFilter {
            year: Some(2024),
            quarter: Some(2),
            ..ReportFilter::default()
        });
        let raw = serde_json::to_string(&spec).unwrap();
        assert!(raw.contains("\"entity\":\"reports\""));
        let back: FilterSpec = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.entity(), "reports");
        assert_eq!(back.as_reports().unwrap().year, Some(2024));
        assert!(back.as_plans().is_none());
    }
}
