//! Backend record shapes.
//!
//! Field names must match the backend JSON verbatim (`planId`,
//! `reportingUserId`, `analystAssessmentScore`, ...); every struct
//! carries a camelCase rename and Rust-side snake_case fields.

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

/// A work plan: a target to hit between two calendar dates, assigned to
/// a set of executor users.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub target_value: Option<Decimal>,
    #[serde(default, with = "crate::datetime::date_option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "crate::datetime::date_option")]
    pub end_date: Option<Date>,
    #[serde(default)]
    pub executor_user_ids: BTreeSet<i64>,
    pub created_by_user_id: Option<i64>,
    /// Offset-less ISO 8601 timestamp on the wire.
    #[serde(default, with = "crate::datetime::datetime_option")]
    pub created_at: Option<PrimitiveDateTime>,
}

/// One quarter's report against a plan. A report counts as assessed
/// exactly when `analystAssessmentScore` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyReport {
    pub id: i64,
    pub plan_id: i64,
    pub reporting_user_id: i64,
    pub assessed_by_user_id: Option<i64>,
    pub year: i32,
    pub quarter: u8,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub actual_value: Option<Decimal>,
    pub analyst_assessment_score: Option<i32>,
    /// Offset-less ISO 8601 timestamp on the wire.
    #[serde(default, with = "crate::datetime::datetime_option")]
    pub created_at: Option<PrimitiveDateTime>,
}

impl QuarterlyReport {
    /// Presence of the score is what makes a report assessed; a zero
    /// score still counts.
    pub fn is_assessed(&self) -> bool {
        self.analyst_assessment_score.is_some()
    }
}

/// A dashboard account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub user_role: Role,
}

impl User {
    /// Display label: full name when set, otherwise the email.
    pub fn label(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// Account role. Older backend data uses `MANAGER` for analysts and
/// `USER` for executors; both still deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    #[serde(alias = "MANAGER")]
    Analyst,
    #[serde(alias = "USER")]
    Executor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Analyst => "ANALYST",
            Role::Executor => "EXECUTOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "ANALYST" | "MANAGER" => Ok(Role::Analyst),
            "EXECUTOR" | "USER" => Ok(Role::Executor),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Role string that matches neither a canonical name nor a legacy one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role `{}`", self.0)
    }
}

impl std::error::Error for UnknownRole {}

/// Discussion entry attached to a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub report_id: i64,
    pub user_id: i64,
    pub text: String,
    #[serde(default, with = "crate::datetime::datetime_option")]
    pub created_at: Option<PrimitiveDateTime>,
}

/// Attachment metadata. File bodies never travel through this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i64,
    pub report_id: i64,
    pub uploaded_by_id: Option<i64>,
    pub filename: String,
    pub file_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use time::macros::{date, datetime};

    #[test]
    fn plan_reads_backend_json_verbatim() {
        let raw = r#"{
            "id": 7,
            "name": "Q2 rollout",
            "description": null,
            "targetValue": 85000.5,
            "startDate": "2024-04-01",
            "endDate": "2024-06-30",
            "executorUserIds": [3, 5],
            "createdByUserId": 1,
            "createdAt": "2024-03-05T10:30:00"
        }"#;
        let plan: Plan = serde_json::from_str(raw).unwrap();
        assert_eq!(plan.id, 7);
        assert_eq!(plan.target_value, Some(Decimal::new(850005, 1)));
        assert_eq!(plan.start_date, Some(date!(2024 - 04 - 01)));
        assert_eq!(plan.end_date, Some(date!(2024 - 06 - 30)));
        assert!(plan.executor_user_ids.contains(&5));
        assert_eq!(plan.created_at, Some(datetime!(2024-03-05 10:30:00)));
    }

    #[test]
    fn plan_serializes_camel_case_wire_names() {
        let plan = Plan {
            id: 1,
            name: "n".into(),
            description: None,
            target_value: None,
            start_date: Some(date!(2024 - 01 - 01)),
            end_date: None,
            executor_user_ids: BTreeSet::new(),
            created_by_user_id: Some(9),
            created_at: None,
        };
        let v = serde_json::to_value(&plan).unwrap();
        assert_eq!(v["startDate"], "2024-01-01");
        assert_eq!(v["createdByUserId"], 9);
        assert!(v.get("executorUserIds").is_some());
        assert!(v.get("start_date").is_none());
    }

    #[test]
    fn report_assessment_is_presence_based() {
        let raw = r#"{
            "id": 11,
            "planId": 7,
            "reportingUserId": 3,
            "assessedByUserId": 2,
            "year": 2024,
            "quarter": 2,
            "actualValue": 41000,
            "analystAssessmentScore": 0,
            "createdAt": "2024-07-02T09:00:00.5"
        }"#;
        let report: QuarterlyReport = serde_json::from_str(raw).unwrap();
        assert_eq!(report.plan_id, 7);
        assert_eq!(report.analyst_assessment_score, Some(0));
        assert!(report.is_assessed());
        assert_eq!(report.created_at, Some(datetime!(2024-07-02 09:00:00.5)));

        let unassessed: QuarterlyReport = serde_json::from_str(
            r#"{"id":12,"planId":7,"reportingUserId":3,"assessedByUserId":null,
                "year":2024,"quarter":3,"actualValue":null,
                "analystAssessmentScore":null,"createdAt":null}"#,
        )
        .unwrap();
        assert!(!unassessed.is_assessed());
    }

    #[test]
    fn legacy_role_names_still_deserialize() {
        let u: User = serde_json::from_str(
            r#"{"id":1,"email":"a@b.c","fullName":"Ann","userRole":"MANAGER"}"#,
        )
        .unwrap();
        assert_eq!(u.user_role, Role::Analyst);

        let u: User =
            serde_json::from_str(r#"{"id":2,"email":"x@y.z","fullName":null,"userRole":"USER"}"#)
                .unwrap();
        assert_eq!(u.user_role, Role::Executor);
        assert_eq!(u.label(), "x@y.z");

        let v = serde_json::to_value(&u).unwrap();
        assert_eq!(v["userRole"], "EXECUTOR");
    }

    #[test]
    fn role_parses_canonical_and_legacy_spellings() {
        use std::str::FromStr;
        assert_eq!(Role::from_str("admin"), Ok(Role::Admin));
        assert_eq!(Role::from_str(" Manager "), Ok(Role::Analyst));
        assert_eq!(Role::from_str("USER"), Ok(Role::Executor));
        assert!(Role::from_str("wizard").is_err());
    }

    #[test]
    fn malformed_wire_date_is_rejected_at_the_boundary() {
        let raw = r#"{"id":1,"name":"n","description":null,"targetValue":null,
            "startDate":"01.04.2024","endDate":null,"executorUserIds":[],
            "createdByUserId":null,"createdAt":null}"#;
        assert!(serde_json::from_str::<Plan>(raw).is_err());
    }
}
