use std::fmt;

use serde::{Deserialize, Serialize};

use crate::curriculum::CurriculumCatalog;
use crate::error::Result;
use crate::grading::{round2, SubjectMarks};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ImprovementTrend {
    Improving,
    Declining,
    Consistent,
    #[serde(rename = "Insufficient data")]
    InsufficientData,
}

impl fmt::Display for ImprovementTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImprovementTrend::Improving => "Improving",
            ImprovementTrend::Declining => "Declining",
            ImprovementTrend::Consistent => "Consistent",
            ImprovementTrend::InsufficientData => "Insufficient data",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DaySchedule {
    pub day: String,
    pub focus: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StudySchedule {
    pub improvement_trend: ImprovementTrend,
    pub consistency_score: f64,
    pub weekly_schedule: Vec<DaySchedule>,
    pub milestones: Vec<String>,
}

const WEEKLY_TEMPLATE: [(&str, &str); 7] = [
    ("Monday", "Core subject revision + 10 problems"),
    ("Tuesday", "Weak subject deep dive + 15 problems"),
    ("Wednesday", "Lab work or practical + 5 problems"),
    ("Thursday", "Mock test or practice exam"),
    ("Friday", "Doubt clearing + revision"),
    ("Saturday", "Weekly test + analysis"),
    ("Sunday", "Relaxation and light review"),
];

const MILESTONES: [&str; 4] = [
    "Week 1: Improve weak subjects by 5-10%",
    "Week 2: Achieve 70% on daily tests",
    "Week 3: Complete all weak subject topics",
    "Week 4: Mock exam and final revision",
];

/// Compares the last score with the first, in the order given.
pub fn improvement_trend(scores: &[f64]) -> ImprovementTrend {
    if scores.len() < 2 {
        return ImprovementTrend::InsufficientData;
    }

    let improvement = scores[scores.len() - 1] - scores[0];
    if improvement > 0.0 {
        ImprovementTrend::Improving
    } else if improvement < 0.0 {
        ImprovementTrend::Declining
    } else {
        ImprovementTrend::Consistent
    }
}

/// Unrounded mean of the scores, 0 when there are none.
pub fn mean_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Mean test score expressed as a percentage, 2 decimals. Scores are already
/// on a 0-100 scale so this equals the mean.
pub fn consistency_score(scores: &[f64]) -> f64 {
    round2((mean_score(scores) / 100.0) * 100.0)
}

pub fn generate_study_schedule(test_scores: &[f64]) -> StudySchedule {
    StudySchedule {
        improvement_trend: improvement_trend(test_scores),
        consistency_score: consistency_score(test_scores),
        weekly_schedule: WEEKLY_TEMPLATE
            .iter()
            .map(|(day, focus)| DaySchedule {
                day: day.to_string(),
                focus: focus.to_string(),
            })
            .collect(),
        milestones: MILESTONES.iter().map(|m| m.to_string()).collect(),
    }
}

pub struct ScheduleGenerator {
    catalog: CurriculumCatalog,
}

impl ScheduleGenerator {
    pub fn new(catalog: CurriculumCatalog) -> Self {
        Self { catalog }
    }

    /// The weekly template and milestones are the same for every student;
    /// only the trend and consistency depend on the scores. Marks are
    /// accepted for the semester context but do not shape the schedule.
    pub fn generate_schedule(
        &self,
        semester: u8,
        _marks: &SubjectMarks,
        test_scores: &[f64],
    ) -> Result<StudySchedule> {
        self.catalog.semester(semester)?;
        Ok(generate_study_schedule(test_scores))
    }
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self::new(CurriculumCatalog::default())
    }
}
