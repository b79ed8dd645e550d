//! Plan status distribution for the status chart.
//!
//! A plan whose end date is still ahead counts as in progress. Ended
//! plans (and plans with no end date) are judged by the average of
//! their assessed report scores: at least 4 is a success, at least 3
//! satisfactory, anything lower -- or no assessed reports at all --
//! problematic.

use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use planboard_model::{Plan, QuarterlyReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanStatus {
    InProgress,
    Success,
    Satisfactory,
    Problematic,
}

/// Counts per status bucket.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDistribution {
    pub in_progress: usize,
    pub success: usize,
    pub satisfactory: usize,
    pub problematic: usize,
}

/// Judge one plan against `today` and the reports shown with it.
pub fn status_of(plan: &Plan, reports: &[QuarterlyReport], today: Date) -> PlanStatus {
    if matches!(plan.end_date, Some(end) if end > today) {
        return PlanStatus::InProgress;
    }
    let scores: Vec<i64> = reports
        .iter()
        .filter(|r| r.plan_id == plan.id)
        .filter_map(|r| r.analyst_assessment_score.map(i64::from))
        .collect();
    if scores.is_empty() {
        return PlanStatus::Problematic;
    }
    let total: i64 = scores.iter().sum();
    let avg = Decimal::from(total)
        .checked_div(Decimal::from(scores.len() as i64))
        .unwrap_or(Decimal::ZERO);
    if avg >= Decimal::from(4) {
        PlanStatus::Success
    } else if avg >= Decimal::from(3) {
        PlanStatus::Satisfactory
    } else {
        PlanStatus::Problematic
    }
}

pub fn analyze_status(
    plans: &[Plan],
    reports: &[QuarterlyReport],
    today: Date,
) -> StatusDistribution {
    let mut dist = StatusDistribution::default();
    for plan in plans {
        match status_of(plan, reports, today) {
            PlanStatus::InProgress => dist.in_progress += 1,
            PlanStatus::Success => dist.success += 1,
            PlanStatus::Satisfactory => dist.satisfactory += 1,
            PlanStatus::Problematic => dist.problematic += 1,
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use time::macros::date;

    const TODAY: Date = date!(2024 - 07 - 15);

    fn plan(id: i64, end: Option<Date>) -> Plan {
        Plan {
            id,
            name: format!("plan {id}"),
            description: None,
            target_value: None,
            start_date: None,
            end_date: end,
            executor_user_ids: BTreeSet::new(),
            created_by_user_id: None,
            created_at: None,
        }
    }

    fn assessed(id: i64, plan_id: i64, score: i32) -> QuarterlyReport {
        QuarterlyReport {
            id,
            plan_id,
            reporting_user_id: 3,
            assessed_by_user_id: Some(2),
            year: 2024,
            quarter: 2,
            actual_value: None,
            analyst_assessment_score: Some(score),
            created_at: None,
        }
    }

    #[test]
    fn future_end_date_is_in_progress_regardless_of_scores() {
        let p = plan(1, Some(date!(2024 - 12 - 31)));
        let reports = vec![assessed(1, 1, 1)];
        assert_eq!(status_of(&p, &reports, TODAY), PlanStatus::InProgress);
    }

    #[test]
    fn ending_today_already_counts_as_ended() {
        let p = plan(1, Some(TODAY));
        let reports = vec![assessed(1, 1, 5)];
        assert_eq!(status_of(&p, &reports, TODAY), PlanStatus::Success);
    }

    #[test]
    fn average_thresholds_split_success_satisfactory_problematic() {
        let p = plan(1, Some(date!(2024 - 06 - 30)));
        // avg 4.5 -> success
        let reports = vec![assessed(1, 1, 4), assessed(2, 1, 5)];
        assert_eq!(status_of(&p, &reports, TODAY), PlanStatus::Success);
        // avg 3.5 -> satisfactory
        let reports = vec![assessed(1, 1, 3), assessed(2, 1, 4)];
        assert_eq!(status_of(&p, &reports, TODAY), PlanStatus::Satisfactory);
        // avg 2.5 -> problematic
        let reports = vec![assessed(1, 1, 2), assessed(2, 1, 3)];
        assert_eq!(status_of(&p, &reports, TODAY), PlanStatus::Problematic);
        // exact boundary: avg 4 is still a success
        let reports = vec![assessed(1, 1, 4)];
        assert_eq!(status_of(&p, &reports, TODAY), PlanStatus::Success);
    }

    #[test]
    fn ended_plan_without_assessed_reports_is_problematic() {
        let p = plan(1, Some(date!(2024 - 06 - 30)));
        let mut unassessed = assessed(1, 1, 3);
        unassessed.analyst_assessment_score = None;
        assert_eq!(status_of(&p, &[unassessed], TODAY), PlanStatus::Problematic);
    }

    #[test]
    fn open_ended_plan_is_scored_not_in_progress() {
        let p = plan(1, None);
        let reports = vec![assessed(1, 1, 5)];
        assert_eq!(status_of(&p, &reports, TODAY), PlanStatus::Success);
        assert_eq!(status_of(&p, &[], TODAY), PlanStatus::Problematic);
    }

    #[test]
    fn distribution_counts_every_plan_once() {
        let plans = vec![
            plan(1, Some(date!(2024 - 12 - 31))),
            plan(2, Some(date!(2024 - 06 - 30))),
            plan(3, Some(date!(2024 - 06 - 30))),
        ];
        let reports = vec![assessed(1, 2, 5)];
        let dist = analyze_status(&plans, &reports, TODAY);
        assert_eq!(dist.in_progress, 1);
        assert_eq!(dist.success, 1);
        assert_eq!(dist.problematic, 1);
        assert_eq!(dist.satisfactory, 0);
    }
}
