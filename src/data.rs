use std::io::Read;
use std::path::Path;

use csv::Reader;
use ndarray::{Array1, Array2};
use serde::Deserialize;
use tracing::info;

use crate::error::{EngineError, Result};
use crate::model::FEATURE_COUNT;

#[derive(Debug, Deserialize)]
struct TrainingRecord {
    study_hours: f64,
    attendance: f64,
    assignments_score: f64,
    past_marks: f64,
    engagement_score: f64,
    final_score: f64,
    passed: u8,
}

/// Historical student records split into model inputs and the two targets.
#[derive(Debug, Clone)]
pub struct TrainingData {
    pub features: Array2<f64>,
    pub scores: Array1<f64>,
    pub passed: Array1<bool>,
}

impl TrainingData {
    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.features.nrows() == 0
    }

    pub fn pass_count(&self) -> usize {
        self.passed.iter().filter(|&&p| p).count()
    }
}

pub fn load_training_data(path: impl AsRef<Path>) -> Result<TrainingData> {
    let path = path.as_ref();
    let rdr = Reader::from_path(path)?;
    let data = read_records(rdr)?;
    info!(path = %path.display(), rows = data.len(), passed = data.pass_count(), "training data loaded");
    Ok(data)
}

pub fn read_training_data<R: Read>(reader: R) -> Result<TrainingData> {
    read_records(Reader::from_reader(reader))
}

fn read_records<R: Read>(mut rdr: Reader<R>) -> Result<TrainingData> {
    let mut flat = Vec::new();
    let mut scores = Vec::new();
    let mut passed = Vec::new();

    for result in rdr.deserialize::<TrainingRecord>() {
        let record = result?;
        flat.extend_from_slice(&[
            record.study_hours,
            record.attendance,
            record.assignments_score,
            record.past_marks,
            record.engagement_score,
        ]);
        scores.push(record.final_score);
        passed.push(record.passed > 0);
    }

    if scores.is_empty() {
        return Err(EngineError::Data("training data has no rows".to_string()));
    }

    let num_rows = scores.len();
    Ok(TrainingData {
        features: Array2::from_shape_vec((num_rows, FEATURE_COUNT), flat)?,
        scores: Array1::from_vec(scores),
        passed: Array1::from_vec(passed),
    })
}

pub fn calculate_accuracy(predictions: &Array1<bool>, targets: &Array1<bool>) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    predictions
        .iter()
        .zip(targets.iter())
        .filter(|(&pred, &actual)| pred == actual)
        .count() as f64
        / targets.len() as f64
}
