use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::curriculum::{CurriculumCatalog, SubjectType};
use crate::error::{EngineError, Result};
use crate::grading::{validate_mark, SubjectMarks};
use crate::prediction::{PerformancePrediction, PredictionEngine};
use crate::risk::{subject_risk, RiskLevel};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubjectMarkInput {
    pub subject_code: String,
    pub subject_name: String,
    pub subject_type: SubjectType,
    pub marks: f64,
    pub credits: u32,
    pub weightage: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubjectMark {
    pub subject_code: String,
    pub subject_name: String,
    pub subject_type: SubjectType,
    pub marks: f64,
    pub credits: u32,
    pub weightage: u32,
    pub risk_level: RiskLevel,
}

impl From<SubjectMarkInput> for SubjectMark {
    fn from(input: SubjectMarkInput) -> Self {
        let risk_level = subject_risk(input.marks);
        Self {
            subject_code: input.subject_code,
            subject_name: input.subject_name,
            subject_type: input.subject_type,
            marks: input.marks,
            credits: input.credits,
            weightage: input.weightage,
            risk_level,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

fn default_max_score() -> f64 {
    100.0
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyTestScore {
    pub date: NaiveDate,
    pub topic: String,
    pub difficulty: Difficulty,
    pub score: f64,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
    pub duration_minutes: u32,
}

#[derive(Debug, Serialize, Clone)]
pub struct Enrollment {
    pub id: u64,
    pub student: String,
    pub semester: u8,
    pub academic_year: String,
    pub created_at: DateTime<Utc>,
    pub marks: Vec<SubjectMark>,
    pub tests: Vec<DailyTestScore>,
    pub prediction: Option<PerformancePrediction>,
}

impl Enrollment {
    pub fn subject_marks(&self) -> SubjectMarks {
        self.marks
            .iter()
            .map(|m| (m.subject_code.clone(), m.marks))
            .collect()
    }

    /// Test scores ordered by date; same-day tests keep submission order.
    pub fn test_scores(&self) -> Vec<f64> {
        let mut tests: Vec<&DailyTestScore> = self.tests.iter().collect();
        tests.sort_by_key(|t| t.date);
        tests.iter().map(|t| t.score).collect()
    }
}

/// Enrollments with their marks, daily tests and latest prediction.
///
/// Holds the write rules for a student's records: one enrollment per
/// (student, semester), marks replaced as a whole, tests appended, and the
/// prediction overwritten on every generation. Storage is the caller's job.
pub struct EnrollmentBook {
    catalog: CurriculumCatalog,
    enrollments: Vec<Enrollment>,
    next_id: u64,
}

impl EnrollmentBook {
    pub fn new(catalog: CurriculumCatalog) -> Self {
        Self {
            catalog,
            enrollments: Vec::new(),
            next_id: 1,
        }
    }

    pub fn enroll(&mut self, student: &str, semester: u8, academic_year: &str) -> Result<&Enrollment> {
        self.catalog.semester(semester)?;

        if self
            .enrollments
            .iter()
            .any(|e| e.student == student && e.semester == semester)
        {
            return Err(EngineError::AlreadyEnrolled { semester });
        }

        let id = self.next_id;
        self.next_id += 1;
        self.enrollments.push(Enrollment {
            id,
            student: student.to_string(),
            semester,
            academic_year: academic_year.to_string(),
            created_at: Utc::now(),
            marks: Vec::new(),
            tests: Vec::new(),
            prediction: None,
        });
        info!(student, semester, academic_year, "student enrolled");

        Ok(&self.enrollments[self.enrollments.len() - 1])
    }

    /// Most recently created enrollment of the student.
    pub fn current_enrollment(&self, student: &str) -> Result<&Enrollment> {
        let idx = self.current_index(student)?;
        Ok(&self.enrollments[idx])
    }

    pub fn enrollment(&self, student: &str, semester: u8) -> Result<&Enrollment> {
        let idx = self.semester_index(student, semester)?;
        Ok(&self.enrollments[idx])
    }

    pub fn submit_marks(
        &mut self,
        student: &str,
        semester: u8,
        inputs: Vec<SubjectMarkInput>,
    ) -> Result<&[SubjectMark]> {
        let idx = self.semester_index(student, semester)?;
        for input in &inputs {
            validate_mark(&input.subject_code, input.marks)?;
        }

        let enrollment = &mut self.enrollments[idx];
        enrollment.marks = inputs.into_iter().map(SubjectMark::from).collect();
        debug!(student, semester, count = enrollment.marks.len(), "subject marks replaced");

        Ok(&enrollment.marks)
    }

    pub fn submit_test(&mut self, student: &str, test: DailyTestScore) -> Result<&DailyTestScore> {
        let idx = self.current_index(student)?;
        let enrollment = &mut self.enrollments[idx];
        enrollment.tests.push(test);
        debug!(student, semester = enrollment.semester, total = enrollment.tests.len(), "daily test recorded");

        Ok(&enrollment.tests[enrollment.tests.len() - 1])
    }

    /// Regenerates the prediction for the current enrollment, replacing any
    /// earlier one.
    pub fn generate_prediction(
        &mut self,
        student: &str,
        engine: &PredictionEngine,
    ) -> Result<&PerformancePrediction> {
        let idx = self.current_index(student)?;
        let enrollment = &self.enrollments[idx];
        if enrollment.marks.is_empty() {
            return Err(EngineError::NoMarksSubmitted);
        }

        let prediction = engine.generate(
            enrollment.semester,
            &enrollment.subject_marks(),
            &enrollment.test_scores(),
        )?;

        Ok(&*self.enrollments[idx].prediction.insert(prediction))
    }

    pub fn current_prediction(&self, student: &str) -> Result<&PerformancePrediction> {
        self.current_enrollment(student)?
            .prediction
            .as_ref()
            .ok_or(EngineError::PredictionNotFound)
    }

    fn current_index(&self, student: &str) -> Result<usize> {
        self.enrollments
            .iter()
            .enumerate()
            .filter(|(_, e)| e.student == student)
            .max_by_key(|(_, e)| e.id)
            .map(|(idx, _)| idx)
            .ok_or_else(|| EngineError::EnrollmentNotFound(format!("no active enrollment for {student}")))
    }

    fn semester_index(&self, student: &str, semester: u8) -> Result<usize> {
        self.enrollments
            .iter()
            .position(|e| e.student == student && e.semester == semester)
            .ok_or_else(|| EngineError::EnrollmentNotFound(format!("no enrollment for semester {semester}")))
    }
}

impl Default for EnrollmentBook {
    fn default() -> Self {
        Self::new(CurriculumCatalog::default())
    }
}
