use std::fmt;
use std::path::Path;
use std::sync::Arc;

use linfa::prelude::*;
use linfa_linear::{FittedLinearRegression, LinearRegression};
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::data::{calculate_accuracy, load_training_data, TrainingData};
use crate::error::{EngineError, Result};
use crate::grading::round2;
use crate::risk::{subject_risk, RiskLevel};

pub const FEATURE_COUNT: usize = 5;

/// (field, min, max), in model column order.
pub const FEATURE_RANGES: [(&str, f64, f64); FEATURE_COUNT] = [
    ("study_hours", 0.0, 24.0),
    ("attendance", 0.0, 100.0),
    ("assignments_score", 0.0, 100.0),
    ("past_marks", 0.0, 100.0),
    ("engagement_score", 0.0, 10.0),
];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct StudentFeatures {
    pub study_hours: f64,
    pub attendance: f64,
    pub assignments_score: f64,
    pub past_marks: f64,
    pub engagement_score: f64,
}

impl StudentFeatures {
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.study_hours,
            self.attendance,
            self.assignments_score,
            self.past_marks,
            self.engagement_score,
        ]
    }

    /// Fails on the first field outside its range.
    pub fn validate(&self) -> Result<()> {
        for ((field, min, max), value) in FEATURE_RANGES.iter().zip(self.to_row()) {
            if !(*min..=*max).contains(&value) {
                return Err(EngineError::FeatureOutOfRange {
                    field: *field,
                    min: *min,
                    max: *max,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PassFail {
    Pass,
    Fail,
}

impl fmt::Display for PassFail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassFail::Pass => f.write_str("Pass"),
            PassFail::Fail => f.write_str("Fail"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub predicted_score: f64,
    pub pass_fail: PassFail,
    pub risk_category: RiskLevel,
    pub confidence: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelInfo {
    pub algorithm: String,
    pub features: Vec<String>,
    pub accuracy: f64,
    pub training_rows: usize,
    pub fallback: bool,
}

/// Overall score / pass-fail predictor. Implementations validate the
/// features before touching the model.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &StudentFeatures) -> Result<PredictionOutcome>;

    fn model_info(&self) -> ModelInfo;
}

fn feature_names() -> Vec<String> {
    FEATURE_RANGES.iter().map(|(name, _, _)| name.to_string()).collect()
}

/// Fixed answer used when no trained model could be loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackPredictor;

impl Predictor for FallbackPredictor {
    fn predict(&self, features: &StudentFeatures) -> Result<PredictionOutcome> {
        features.validate()?;
        Ok(PredictionOutcome {
            predicted_score: 65.0,
            pass_fail: PassFail::Pass,
            risk_category: RiskLevel::Medium,
            confidence: 0.85,
        })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            algorithm: "Fallback (static response)".to_string(),
            features: feature_names(),
            accuracy: 0.0,
            training_rows: 0,
            fallback: true,
        }
    }
}

/// Linear regression for the score, logistic regression for pass/fail,
/// both over standardized features.
pub struct LinfaPredictor {
    regressor: FittedLinearRegression<f64>,
    classifier: FittedLogisticRegression<f64, bool>,
    mean: Array1<f64>,
    std: Array1<f64>,
    accuracy: f64,
    training_rows: usize,
}

impl LinfaPredictor {
    pub fn train(data: &TrainingData) -> Result<Self> {
        let mean = data
            .features
            .mean_axis(Axis(0))
            .ok_or_else(|| EngineError::ModelUnavailable("no training rows".to_string()))?;
        let std = data.features.std_axis(Axis(0), 0.0);
        let scaled = standardize(&data.features, &mean, &std);

        let regressor = LinearRegression::new()
            .fit(&Dataset::new(scaled.clone(), data.scores.clone()))
            .map_err(|e| EngineError::ModelUnavailable(e.to_string()))?;

        let classifier = LogisticRegression::default()
            .max_iterations(200)
            .fit(&Dataset::new(scaled.clone(), data.passed.clone()))
            .map_err(|e| EngineError::ModelUnavailable(e.to_string()))?;

        let accuracy = calculate_accuracy(&classifier.predict(&scaled), &data.passed);
        info!(rows = data.len(), accuracy = %format!("{:.2}%", accuracy * 100.0), "prediction model trained");

        Ok(Self {
            regressor,
            classifier,
            mean,
            std,
            accuracy,
            training_rows: data.len(),
        })
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }
}

fn standardize(features: &Array2<f64>, mean: &Array1<f64>, std: &Array1<f64>) -> Array2<f64> {
    Array2::from_shape_fn(features.dim(), |(i, j)| {
        if std[j] > 0.0 {
            (features[[i, j]] - mean[j]) / std[j]
        } else {
            0.0
        }
    })
}

impl Predictor for LinfaPredictor {
    fn predict(&self, features: &StudentFeatures) -> Result<PredictionOutcome> {
        features.validate()?;

        let row = Array2::from_shape_vec((1, FEATURE_COUNT), features.to_row().to_vec())?;
        let scaled = standardize(&row, &self.mean, &self.std);

        let predicted_score = self.regressor.predict(&scaled)[0].clamp(0.0, 100.0);
        let passed = self.classifier.predict(&scaled)[0];
        let probability = self.classifier.predict_probabilities(&scaled)[0];
        let confidence = probability.max(1.0 - probability);

        Ok(PredictionOutcome {
            predicted_score: round2(predicted_score),
            pass_fail: if passed { PassFail::Pass } else { PassFail::Fail },
            risk_category: subject_risk(predicted_score),
            confidence: round2(confidence),
        })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            algorithm: "Linear Regression + Logistic Regression".to_string(),
            features: feature_names(),
            accuracy: self.accuracy,
            training_rows: self.training_rows,
            fallback: false,
        }
    }
}

/// Trains the linfa model from the CSV at `path`, or hands back the fallback
/// predictor if that fails.
pub fn load_predictor(path: impl AsRef<Path>) -> Arc<dyn Predictor> {
    let path = path.as_ref();
    match load_training_data(path).and_then(|data| LinfaPredictor::train(&data)) {
        Ok(model) => Arc::new(model),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not load prediction model, using fallback");
            Arc::new(FallbackPredictor)
        }
    }
}
