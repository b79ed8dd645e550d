//! Payloads the client sends: create bodies, the user PATCH body, and
//! login credentials. Shapes track the backend's create DTOs.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::record::Role;

/// Body for `POST /plans` and `PUT /plans/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlan {
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
}

/// Body for `POST /reports` and `PUT /reports/{id}`.
///
/// `actualValue` is mandatory here even though stored reports may carry
/// none; the backend rejects a report without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub plan_id: i64,
    pub reporting_user_id: i64,
    pub assessed_by_user_id: Option<i64>,
    pub year: i32,
    pub quarter: u8,
    #[serde(with = "rust_decimal::serde::float")]
    pub actual_value: Decimal,
    pub analyst_assessment_score: Option<i32>,
}

/// Body for `POST /users` (registration / admin create).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub user_role: Role,
}

/// Body for `PATCH /users/{id}`. Absent fields are left untouched by
/// the backend, so `None` must not serialize at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<Role>,
}

/// Body for `POST /comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub report_id: i64,
    pub user_id: i64,
    pub text: String,
}

/// Body for `POST /users/auth`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
