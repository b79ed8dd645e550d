//! Free-text filter forms.
//!
//! UI controls and CLI flags hand over criteria as raw text. Conversion
//! to the typed filters is infallible and lenient: blank text and text
//! that fails to parse as the expected number or date simply leave the
//! criterion unset. Nothing here ever reports an error.

use serde::{Deserialize, Serialize};
use time::Date;

use planboard_model::datetime::parse_date;
use planboard_model::Role;

use crate::filter::{AssessmentState, PlanFilter, ReportFilter, UserFilter};

fn non_blank(s: &str) -> Option<&str> {
    let t = s.trim();
    (!t.is_empty()).then_some(t)
}

fn parse_text(s: &str) -> Option<String> {
    non_blank(s).map(str::to_string)
}

fn parse_i64_field(s: &str) -> Option<i64> {
    non_blank(s)?.parse().ok()
}

fn parse_i32_field(s: &str) -> Option<i32> {
    non_blank(s)?.parse().ok()
}

fn parse_u8_field(s: &str) -> Option<u8> {
    non_blank(s)?.parse().ok()
}

fn parse_date_field(s: &str) -> Option<Date> {
    parse_date(non_blank(s)?)
}

fn parse_assessment(s: &str) -> Option<AssessmentState> {
    match non_blank(s)?.to_ascii_lowercase().as_str() {
        "yes" | "assessed" => Some(AssessmentState::Assessed),
        "no" | "unassessed" => Some(AssessmentState::Unassessed),
        _ => None,
    }
}

fn parse_role_field(s: &str) -> Option<Role> {
    non_blank(s)?.parse().ok()
}

/// Raw text state of the plans filter bar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanFilterForm {
    pub search_term: String,
    pub start_date: String,
    pub end_date: String,
}

impl PlanFilterForm {
    pub fn to_filter(&self) -> PlanFilter {
        PlanFilter {
            search: parse_text(&self.search_term),
            starts_from: parse_date_field(&self.start_date),
            ends_until: parse_date_field(&self.end_date),
        }
    }
}

/// Raw text state of the reports filter bar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportFilterForm {
    pub plan_id: String,
    pub reporting_user_id: String,
    pub year: String,
    pub quarter: String,
    /// `yes` / `no` select; anything else leaves the criterion unset.
    pub assessed: String,
    pub created_from: String,
    pub created_to: String,
}

impl ReportFilterForm {
    pub fn to_filter(&self) -> ReportFilter {
        ReportFilter {
            plan_id: parse_i64_field(&self.plan_id),
            reporting_user_id: parse_i64_field(&self.reporting_user_id),
            year: parse_i32_field(&self.year),
            quarter: parse_u8_field(&self.quarter),
            assessment: parse_assessment(&self.assessed),
            created_from: parse_date_field(&self.created_from),
            created_to: parse_date_field(&self.created_to),
        }
    }
}

/// Raw text state of the users filter bar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserFilterForm {
    pub search_term: String,
    pub role: String,
}

impl UserFilterForm {
    pub fn to_filter(&self) -> UserFilter {
        UserFilter {
            search: parse_text(&self.search_term),
            role: parse_role_field(&self.role),
        }
    }
}
