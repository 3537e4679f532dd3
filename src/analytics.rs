use serde::{Deserialize, Serialize};

use crate::grading::round2;
use crate::model::{PassFail, PredictionOutcome};
use crate::risk::RiskLevel;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskDistribution {
    pub low_risk: usize,
    pub medium_risk: usize,
    pub high_risk: usize,
}

/// Summary over a class's predictor outcomes.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ClassAnalytics {
    pub total_predictions: usize,
    pub average_score: f64,
    /// Percentage of `Pass` outcomes, 2 decimals.
    pub pass_rate: f64,
    pub risk_distribution: RiskDistribution,
}

/// Aggregates outcomes into counts, mean predicted score and pass rate.
/// An empty slice gives all zeros.
pub fn class_analytics(outcomes: &[PredictionOutcome]) -> ClassAnalytics {
    if outcomes.is_empty() {
        return ClassAnalytics::default();
    }

    let total = outcomes.len() as f64;
    let mut score_sum = 0.0;
    let mut pass_count = 0usize;
    let mut risk_distribution = RiskDistribution::default();

    for outcome in outcomes {
        score_sum += outcome.predicted_score;
        if outcome.pass_fail == PassFail::Pass {
            pass_count += 1;
        }
        match outcome.risk_category {
            RiskLevel::Low => risk_distribution.low_risk += 1,
            RiskLevel::Medium => risk_distribution.medium_risk += 1,
            RiskLevel::High => risk_distribution.high_risk += 1,
        }
    }

    ClassAnalytics {
        total_predictions: outcomes.len(),
        average_score: round2(score_sum / total),
        pass_rate: round2(pass_count as f64 / total * 100.0),
        risk_distribution,
    }
}
