//! Assessment score distribution for the bar chart.

use serde::Serialize;

use planboard_model::QuarterlyReport;

/// Counts for scores 1 through 5, in order. Unassessed reports and
/// out-of-scale scores are not counted anywhere.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDistribution {
    pub counts: [usize; 5],
}

impl ScoreDistribution {
    pub fn count_for(&self, score: i32) -> usize {
        match score {
            1..=5 => self.counts[(score - 1) as usize],
            _ => 0,
        }
    }

    pub fn total_assessed(&self) -> usize {
        self.counts.iter().sum()
    }
}

pub fn analyze_scores(reports: &[QuarterlyReport]) -> ScoreDistribution {
    let mut dist = ScoreDistribution::default();
    for report in reports {
        if let Some(score @ 1..=5) = report.analyst_assessment_score {
            dist.counts[(score - 1) as usize] += 1;
        }
    }
    dist
}
