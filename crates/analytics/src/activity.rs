//! Per-executor activity rows for the activity chart.
//!
//! One row per distinct `reportingUserId` in the shown reports:
//! submission count, assessed count, and the average assessment score
//! rounded to one decimal place. Users missing from the user slice
//! still get a row with a generic label.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use planboard_model::{QuarterlyReport, User};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorActivity {
    pub user_id: i64,
    pub label: String,
    pub submitted: usize,
    pub assessed: usize,
    /// Mean assessed score at one decimal place; absent when the user
    /// has no assessed reports.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub avg_score: Option<Decimal>,
}

/// Aggregate reports per reporting user, rows ordered by user id.
pub fn analyze_activity(reports: &[QuarterlyReport], users: &[User]) -> Vec<ExecutorActivity> {
    #[derive(Default)]
    struct Tally {
        submitted: usize,
        assessed: usize,
        score_total: i64,
    }

    let mut tallies: BTreeMap<i64, Tally> = BTreeMap::new();
    for report in reports {
        let tally = tallies.entry(report.reporting_user_id).or_default();
        tally.submitted += 1;
        if let Some(score) = report.analyst_assessment_score {
            tally.assessed += 1;
            tally.score_total += i64::from(score);
        }
    }

    let labels: BTreeMap<i64, &str> = users.iter().map(|u| (u.id, u.label())).collect();

    tallies
        .into_iter()
        .map(|(user_id, tally)| {
            let avg_score = (tally.assessed > 0)
                .then(|| {
                    Decimal::from(tally.score_total)
                        .checked_div(Decimal::from(tally.assessed as i64))
                })
                .flatten()
                .map(|avg| avg.round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven));
            ExecutorActivity {
                user_id,
                label: labels
                    .get(&user_id)
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| format!("user {user_id}")),
                submitted: tally.submitted,
                assessed: tally.assessed,
                avg_score,
            }
        })
        .collect()
}
