use serde::{Deserialize, Serialize};
use tracing::info;

use crate::curriculum::{semester_number, CurriculumCatalog};
use crate::error::{EngineError, Result};
use crate::grading::{academic_status, round2, validate_mark, AcademicStatus, BacklogSubject, GradeCalculator, SubjectMarks};
use crate::planner::{RecommendationPlan, RecommendationPlanner};
use crate::schedule::{mean_score, ImprovementTrend, ScheduleGenerator, StudySchedule};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PredictionRequest {
    pub semester: i64,
    pub subject_marks: SubjectMarks,
    /// Daily test scores, oldest first.
    #[serde(default)]
    pub test_scores: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PerformancePrediction {
    pub semester: u8,
    pub academic_status: AcademicStatus,
    pub sgpa: f64,
    /// Same as `sgpa`; earlier semesters are not folded in.
    pub estimated_cgpa: f64,
    pub backlog_risk: usize,
    pub backlog_subjects: Vec<BacklogSubject>,
    pub test_consistency: f64,
    pub improvement_trend: ImprovementTrend,
    pub recommendation_plan: RecommendationPlan,
    pub study_schedule: StudySchedule,
}

/// Runs the whole semester pipeline for one enrollment: grading, backlog
/// detection, recommendations and the study schedule.
pub struct PredictionEngine {
    catalog: CurriculumCatalog,
    grades: GradeCalculator,
    planner: RecommendationPlanner,
    schedule: ScheduleGenerator,
}

impl PredictionEngine {
    pub fn new(catalog: CurriculumCatalog) -> Self {
        Self {
            catalog,
            grades: GradeCalculator::new(catalog),
            planner: RecommendationPlanner::new(catalog),
            schedule: ScheduleGenerator::new(catalog),
        }
    }

    pub fn catalog(&self) -> CurriculumCatalog {
        self.catalog
    }

    pub fn generate(
        &self,
        semester: u8,
        marks: &SubjectMarks,
        test_scores: &[f64],
    ) -> Result<PerformancePrediction> {
        self.catalog.semester(semester)?;
        if marks.is_empty() {
            return Err(EngineError::NoMarksSubmitted);
        }
        for (code, &value) in marks {
            validate_mark(code, value)?;
        }

        let sgpa = self.grades.calculate_sgpa(semester, marks);
        let status = academic_status(sgpa);
        let backlog_subjects = self.grades.identify_backlog_subjects(semester, marks);

        // The planner sees the unrounded mean.
        let test_consistency = mean_score(test_scores);

        let recommendation_plan = self.planner.generate_plan(semester, marks, test_consistency)?;
        let study_schedule = self.schedule.generate_schedule(semester, marks, test_scores)?;

        info!(
            semester,
            sgpa,
            status = %status,
            backlogs = backlog_subjects.len(),
            trend = %study_schedule.improvement_trend,
            "performance prediction generated"
        );

        Ok(PerformancePrediction {
            semester,
            academic_status: status,
            sgpa,
            estimated_cgpa: sgpa,
            backlog_risk: backlog_subjects.len(),
            backlog_subjects,
            test_consistency: round2(test_consistency),
            improvement_trend: study_schedule.improvement_trend,
            recommendation_plan,
            study_schedule,
        })
    }

    pub fn generate_for(&self, request: &PredictionRequest) -> Result<PerformancePrediction> {
        let semester = semester_number(request.semester)?;
        self.generate(semester, &request.subject_marks, &request.test_scores)
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new(CurriculumCatalog::default())
    }
}
