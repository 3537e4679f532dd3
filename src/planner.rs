use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curriculum::{CurriculumCatalog, SubjectType};
use crate::error::Result;
use crate::grading::{BacklogSubject, GradeCalculator, SubjectMarks};
use crate::risk::{subject_risk, RiskLevel};

/// Weak subjects and daily tasks are capped at this many entries.
pub const MAX_WEAK_SUBJECTS: usize = 3;
pub const LOW_CONSISTENCY_THRESHOLD: f64 = 50.0;
pub const TASK_DURATION_MINUTES: u32 = 45;

const CONSISTENCY_FOCUS: &str = "Improve daily test consistency and regular practice";
const BACKLOG_FOCUS_PREFIX: &str = "Focus on preventing backlogs in: ";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeakSubject {
    pub code: String,
    pub name: String,
    pub marks: f64,
    pub risk: RiskLevel,
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyTask {
    pub subject: String,
    pub task: String,
    pub duration_minutes: u32,
    pub difficulty: RiskLevel,
    pub day: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StudyResources {
    pub online_platforms: Vec<String>,
    pub textbooks: Vec<String>,
    pub practice: Vec<String>,
}

impl StudyResources {
    pub fn standard() -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            online_platforms: owned(&[
                "YouTube: VTU lecture channels",
                "Udemy: Advanced courses on weak topics",
                "GitHub: Open-source projects for practical learning",
            ]),
            textbooks: owned(&[
                "Reference texts as per VTU curriculum",
                "Previous year question papers",
            ]),
            practice: owned(&[
                "Solve at least 50 previous year questions",
                "Attempt 5 mock exams per weak subject",
                "Join study groups for peer learning",
            ]),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecommendationPlan {
    pub backlog_subjects: Vec<BacklogSubject>,
    pub weak_subjects: Vec<WeakSubject>,
    pub focus_areas: Vec<String>,
    pub daily_tasks: Vec<DailyTask>,
    pub study_resources: StudyResources,
}

/// Core subjects first, then higher marks first. Used with a stable sort so
/// equal keys keep catalog order.
fn weak_subject_order(a: &WeakSubject, b: &WeakSubject) -> Ordering {
    let a_non_core = !a.subject_type.is_core();
    let b_non_core = !b.subject_type.is_core();
    a_non_core
        .cmp(&b_non_core)
        .then_with(|| b.marks.total_cmp(&a.marks))
}

pub struct RecommendationPlanner {
    catalog: CurriculumCatalog,
    grades: GradeCalculator,
}

impl RecommendationPlanner {
    pub fn new(catalog: CurriculumCatalog) -> Self {
        Self {
            catalog,
            grades: GradeCalculator::new(catalog),
        }
    }

    pub fn generate_plan(
        &self,
        semester: u8,
        marks: &SubjectMarks,
        test_consistency: f64,
    ) -> Result<RecommendationPlan> {
        let catalog = self.catalog.semester(semester)?;
        let backlog_subjects = self.grades.identify_backlog_subjects(semester, marks);

        let mut weak_subjects: Vec<WeakSubject> = catalog
            .subjects
            .iter()
            .filter_map(|subject| {
                let mark = *marks.get(subject.code)?;
                let risk = subject_risk(mark);
                risk.is_weak().then(|| WeakSubject {
                    code: subject.code.to_string(),
                    name: subject.name.to_string(),
                    marks: mark,
                    risk,
                    subject_type: subject.subject_type,
                })
            })
            .collect();

        weak_subjects.sort_by(weak_subject_order);
        weak_subjects.truncate(MAX_WEAK_SUBJECTS);

        let focus_areas = self.focus_areas(&backlog_subjects, test_consistency);
        let daily_tasks = self.daily_tasks(&weak_subjects);

        debug!(
            semester,
            backlog = backlog_subjects.len(),
            weak = weak_subjects.len(),
            "recommendation plan generated"
        );

        Ok(RecommendationPlan {
            backlog_subjects,
            weak_subjects,
            focus_areas,
            daily_tasks,
            study_resources: StudyResources::standard(),
        })
    }

    fn focus_areas(&self, backlog: &[BacklogSubject], test_consistency: f64) -> Vec<String> {
        let mut focus = Vec::new();

        if test_consistency < LOW_CONSISTENCY_THRESHOLD {
            focus.push(CONSISTENCY_FOCUS.to_string());
        }

        if !backlog.is_empty() {
            let names: Vec<&str> = backlog.iter().map(|s| s.name.as_str()).collect();
            focus.push(format!("{}{}", BACKLOG_FOCUS_PREFIX, names.join(", ")));
        }

        focus
    }

    fn daily_tasks(&self, weak_subjects: &[WeakSubject]) -> Vec<DailyTask> {
        weak_subjects
            .iter()
            .take(MAX_WEAK_SUBJECTS)
            .enumerate()
            .map(|(idx, subject)| DailyTask {
                subject: subject.name.clone(),
                task: format!("Solve 5 practice problems on {}", subject.name.to_lowercase()),
                duration_minutes: TASK_DURATION_MINUTES,
                difficulty: if subject.risk == RiskLevel::Medium {
                    RiskLevel::Medium
                } else {
                    RiskLevel::High
                },
                day: format!("Day {}", idx + 1),
            })
            .collect()
    }
}

impl Default for RecommendationPlanner {
    fn default() -> Self {
        Self::new(CurriculumCatalog::default())
    }
}

pub fn generate_recommendation_plan(
    semester: u8,
    marks: &SubjectMarks,
    test_consistency: f64,
) -> Result<RecommendationPlan> {
    RecommendationPlanner::default().generate_plan(semester, marks, test_consistency)
}
