use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by the semester engine, the enrollment book and the predictor.
///
/// Every variant is terminal: nothing in the crate retries.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Wide enough to report whatever number the caller sent.
    #[error("Invalid semester {0}. Must be between 1 and 8.")]
    InvalidSemester(i64),

    #[error("{field} must be between {min} and {max}, got {value}")]
    FeatureOutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("marks for {subject_code} must be between 0 and 100, got {value}")]
    MarksOutOfRange { subject_code: String, value: f64 },

    #[error("Already enrolled in semester {semester}")]
    AlreadyEnrolled { semester: u8 },

    #[error("No enrollment found: {0}")]
    EnrollmentNotFound(String),

    #[error("No subject marks submitted yet")]
    NoMarksSubmitted,

    #[error("No prediction found for current enrollment")]
    PredictionNotFound,

    #[error("prediction model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("data error: {0}")]
    Data(String),
}

impl EngineError {
    /// True for errors caused by caller input rather than missing state or
    /// infrastructure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidSemester(_)
                | EngineError::FeatureOutOfRange { .. }
                | EngineError::MarksOutOfRange { .. }
                | EngineError::AlreadyEnrolled { .. }
                | EngineError::NoMarksSubmitted
        )
    }
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::Data(err.to_string())
    }
}

impl From<ndarray::ShapeError> for EngineError {
    fn from(err: ndarray::ShapeError) -> Self {
        EngineError::Data(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_error_names_field_and_range() {
        let err = EngineError::FeatureOutOfRange {
            field: "attendance",
            min: 0.0,
            max: 100.0,
            value: 120.0,
        };
        assert_eq!(err.to_string(), "attendance must be between 0 and 100, got 120");
        assert!(err.is_validation());
    }

    #[test]
    fn invalid_semester_message() {
        let err = EngineError::InvalidSemester(9);
        assert_eq!(err.to_string(), "Invalid semester 9. Must be between 1 and 8.");
        assert_eq!(
            EngineError::InvalidSemester(-1).to_string(),
            "Invalid semester -1. Must be between 1 and 8."
        );
    }

    #[test]
    fn missing_state_is_not_validation() {
        assert!(!EngineError::PredictionNotFound.is_validation());
        assert!(!EngineError::EnrollmentNotFound("semester 3".into()).is_validation());
    }
}
