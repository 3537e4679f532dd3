pub mod analytics;
pub mod api;
pub mod config;
pub mod curriculum;
pub mod data;
pub mod enrollment;
pub mod error;
pub mod grading;
pub mod logging;
pub mod model;
pub mod planner;
pub mod prediction;
pub mod risk;
pub mod schedule;

pub use analytics::{class_analytics, ClassAnalytics, RiskDistribution};
pub use curriculum::{get_semester_subjects, semester_number, CurriculumCatalog, SemesterCatalog, Subject, SubjectType};
pub use enrollment::EnrollmentBook;
pub use error::{EngineError, Result};
pub use grading::{academic_status, calculate_sgpa, identify_backlog_subjects, AcademicStatus, SubjectMarks};
pub use model::{load_predictor, Predictor, StudentFeatures};
pub use planner::generate_recommendation_plan;
pub use prediction::{PerformancePrediction, PredictionEngine, PredictionRequest};
pub use risk::{subject_risk, RiskLevel};
pub use schedule::generate_study_schedule;
