use std::fmt;

use serde::{Deserialize, Serialize};

pub const LOW_RISK_MIN: f64 = 75.0;
pub const MEDIUM_RISK_MIN: f64 = 60.0;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Medium and High subjects are the ones a study plan targets.
    pub fn is_weak(self) -> bool {
        matches!(self, RiskLevel::Medium | RiskLevel::High)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk tier for a subject mark or a predicted score on the 0-100 scale.
pub fn subject_risk(marks: f64) -> RiskLevel {
    match marks {
        m if m >= LOW_RISK_MIN => RiskLevel::Low,
        m if m >= MEDIUM_RISK_MIN => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}
