//! One report joined with the records it points at.
//!
//! The report itself is fetched strictly; the plan and the two user
//! lookups are best-effort. A backend that already deleted the plan
//! behind an old report still yields a usable detail view.

use std::future::Future;

use serde::Serialize;

use planboard_model::{Plan, QuarterlyReport, User};

use crate::cancel::CancelToken;
use crate::error::ClientError;
use crate::source::RecordSource;

/// A report plus whichever of its referenced records could be loaded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetails {
    pub report: QuarterlyReport,
    pub plan: Option<Plan>,
    pub reporting_user: Option<User>,
    pub assessed_by: Option<User>,
}

/// Fetch a report and resolve its plan, reporter and assessor in one
/// round. Only the report fetch can fail the call (besides
/// cancellation); broken secondary references come back as `None`.
pub async fn report_details<S>(
    source: &S,
    id: i64,
    cancel: &CancelToken,
) -> Result<ReportDetails, ClientError>
where
    S: RecordSource + ?Sized,
{
    let report = source.get_report(id, cancel).await?;
    let (plan, reporting_user, assessed_by) = tokio::join!(
        lenient(source.get_plan(report.plan_id, cancel)),
        lenient(source.get_user(report.reporting_user_id, cancel)),
        assessor(source, report.assessed_by_user_id, cancel),
    );
    Ok(ReportDetails {
        report,
        plan: plan?,
        reporting_user: reporting_user?,
        assessed_by: assessed_by?,
    })
}

/// Demote lookup failures to `None`; cancellation stays an error.
async fn lenient<T>(
    fut: impl Future<Output = Result<T, ClientError>>,
) -> Result<Option<T>, ClientError> {
    match fut.await {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_cancelled() => Err(err),
        Err(_) => Ok(None),
    }
}

async fn assessor<S>(
    source: &S,
    id: Option<i64>,
    cancel: &CancelToken,
) -> Result<Option<User>, ClientError>
where
    S: RecordSource + ?Sized,
{
    match id {
        Some(id) => lenient(source.get_user(id, cancel)).await,
        None => Ok(None),
    }
}
