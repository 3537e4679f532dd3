use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::curriculum::{CurriculumCatalog, SubjectType};
use crate::error::{EngineError, Result};

/// Marks keyed by subject code, as submitted for one semester.
pub type SubjectMarks = HashMap<String, f64>;

/// Marks strictly below this are a backlog.
pub const BACKLOG_THRESHOLD: f64 = 40.0;

pub const GOOD_MIN_SGPA: f64 = 8.0;
pub const MODERATE_MIN_SGPA: f64 = 6.5;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AcademicStatus {
    Good,
    Moderate,
    #[serde(rename = "Need Improvement")]
    NeedImprovement,
}

impl AcademicStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicStatus::Good => "Good",
            AcademicStatus::Moderate => "Moderate",
            AcademicStatus::NeedImprovement => "Need Improvement",
        }
    }
}

impl fmt::Display for AcademicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BacklogSubject {
    pub code: String,
    pub name: String,
    pub marks: f64,
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
}

/// 10-point grade scale. Anything under 40 is a fail and earns nothing.
pub fn grade_point(marks: f64) -> u32 {
    if marks >= 90.0 {
        10
    } else if marks >= 80.0 {
        9
    } else if marks >= 70.0 {
        8
    } else if marks >= 60.0 {
        7
    } else if marks >= 50.0 {
        6
    } else if marks >= BACKLOG_THRESHOLD {
        5
    } else {
        0
    }
}

pub fn validate_mark(subject_code: &str, marks: f64) -> Result<()> {
    if (0.0..=100.0).contains(&marks) {
        Ok(())
    } else {
        Err(EngineError::MarksOutOfRange {
            subject_code: subject_code.to_string(),
            value: marks,
        })
    }
}

/// Two decimals, exact ties to even (9.625 -> 9.62).
pub(crate) fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

pub struct GradeCalculator {
    catalog: CurriculumCatalog,
}

impl GradeCalculator {
    pub fn new(catalog: CurriculumCatalog) -> Self {
        Self { catalog }
    }

    /// Credit-weighted grade point average over the subjects that have a mark.
    /// Unmarked subjects are left out of both sums; an unknown semester or an
    /// empty mark set gives 0.0.
    pub fn calculate_sgpa(&self, semester: u8, marks: &SubjectMarks) -> f64 {
        let Ok(catalog) = self.catalog.semester(semester) else {
            return 0.0;
        };

        let mut weighted_points = 0u32;
        let mut total_credits = 0u32;

        for subject in catalog.subjects {
            if let Some(&mark) = marks.get(subject.code) {
                weighted_points += grade_point(mark) * subject.credits;
                total_credits += subject.credits;
            }
        }

        if total_credits == 0 {
            return 0.0;
        }

        round2(weighted_points as f64 / total_credits as f64)
    }

    pub fn identify_backlog_subjects(&self, semester: u8, marks: &SubjectMarks) -> Vec<BacklogSubject> {
        let Ok(catalog) = self.catalog.semester(semester) else {
            return Vec::new();
        };

        catalog
            .subjects
            .iter()
            .filter_map(|subject| {
                let mark = *marks.get(subject.code)?;
                (mark < BACKLOG_THRESHOLD).then(|| BacklogSubject {
                    code: subject.code.to_string(),
                    name: subject.name.to_string(),
                    marks: mark,
                    subject_type: subject.subject_type,
                })
            })
            .collect()
    }
}

impl Default for GradeCalculator {
    fn default() -> Self {
        Self::new(CurriculumCatalog::default())
    }
}

pub fn academic_status(sgpa: f64) -> AcademicStatus {
    if sgpa >= GOOD_MIN_SGPA {
        AcademicStatus::Good
    } else if sgpa >= MODERATE_MIN_SGPA {
        AcademicStatus::Moderate
    } else {
        AcademicStatus::NeedImprovement
    }
}

pub fn calculate_sgpa(semester: u8, marks: &SubjectMarks) -> f64 {
    GradeCalculator::default().calculate_sgpa(semester, marks)
}

pub fn identify_backlog_subjects(semester: u8, marks: &SubjectMarks) -> Vec<BacklogSubject> {
    GradeCalculator::default().identify_backlog_subjects(semester, marks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks(pairs: &[(&str, f64)]) -> SubjectMarks {
        pairs.iter().map(|(c, m)| (c.to_string(), *m)).collect()
    }

    #[test]
    fn grade_point_boundaries() {
        assert_eq!(grade_point(100.0), 10);
        assert_eq!(grade_point(90.0), 10);
        assert_eq!(grade_point(89.99), 9);
        assert_eq!(grade_point(80.0), 9);
        assert_eq!(grade_point(70.0), 8);
        assert_eq!(grade_point(60.0), 7);
        assert_eq!(grade_point(50.0), 6);
        assert_eq!(grade_point(40.0), 5);
        assert_eq!(grade_point(39.9), 0);
        assert_eq!(grade_point(0.0), 0);
    }

    #[test]
    fn sgpa_weights_by_credits() {
        let sgpa = calculate_sgpa(3, &marks(&[("23CS301", 85.0), ("23CS302", 72.0)]));
        assert_eq!(sgpa, 8.5);
    }

    #[test]
    fn sgpa_mixes_credit_sizes() {
        // 10*4 + 0*2 over 6 credits
        let sgpa = calculate_sgpa(3, &marks(&[("23CS301", 95.0), ("23CS305", 20.0)]));
        assert_eq!(sgpa, 6.67);
    }

    #[test]
    fn sgpa_is_zero_without_marks() {
        for semester in 1..=8 {
            assert_eq!(calculate_sgpa(semester, &SubjectMarks::new()), 0.0);
        }
    }

    #[test]
    fn sgpa_ignores_unknown_codes_and_semesters() {
        assert_eq!(calculate_sgpa(3, &marks(&[("23CS401", 95.0)])), 0.0);
        assert_eq!(calculate_sgpa(9, &marks(&[("23CS301", 95.0)])), 0.0);
    }

    #[test]
    fn round2_sends_exact_ties_to_even() {
        assert_eq!(round2(9.625), 9.62);
        assert_eq!(round2(80.125), 80.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(6.666), 6.67);
        assert_eq!(round2(-1.005), -1.0);
    }

    #[test]
    fn sgpa_tie_rounds_to_even() {
        // 10*4 + 10*3 + 7*1 = 77 over 8 credits = 9.625
        let sgpa = calculate_sgpa(
            1,
            &marks(&[("23BMAT101", 95.0), ("23BCHE101", 95.0), ("23BESS101", 65.0)]),
        );
        assert_eq!(sgpa, 9.62);
    }

    #[test]
    fn academic_status_thresholds() {
        assert_eq!(academic_status(8.0), AcademicStatus::Good);
        assert_eq!(academic_status(7.99), AcademicStatus::Moderate);
        assert_eq!(academic_status(6.5), AcademicStatus::Moderate);
        assert_eq!(academic_status(6.49), AcademicStatus::NeedImprovement);
        assert_eq!(academic_status(0.0), AcademicStatus::NeedImprovement);
    }

    #[test]
    fn status_serializes_with_space() {
        let json = serde_json::to_string(&AcademicStatus::NeedImprovement).unwrap();
        assert_eq!(json, "\"Need Improvement\"");
    }

    #[test]
    fn backlog_only_below_forty_in_catalog_order() {
        let backlog = identify_backlog_subjects(
            3,
            &marks(&[("23CS306", 12.0), ("23CS301", 39.5), ("23CS302", 40.0), ("23CS303", 75.0)]),
        );
        let codes: Vec<_> = backlog.iter().map(|b| b.code.as_str()).collect();
        assert_eq!(codes, vec!["23CS301", "23CS306"]);
        assert!(backlog.iter().all(|b| b.marks < BACKLOG_THRESHOLD));
        assert_eq!(backlog[1].subject_type, SubjectType::Lab);
        assert_eq!(backlog[0].name, "Data Structures");
    }

    #[test]
    fn marks_outside_scale_are_rejected() {
        assert!(validate_mark("23CS301", 0.0).is_ok());
        assert!(validate_mark("23CS301", 100.0).is_ok());
        assert!(matches!(
            validate_mark("23CS301", 100.5),
            Err(EngineError::MarksOutOfRange { .. })
        ));
        assert!(validate_mark("23CS301", f64::NAN).is_err());
    }

    #[test]
    fn backlog_empty_for_invalid_semester() {
        assert!(identify_backlog_subjects(0, &marks(&[("23CS301", 10.0)])).is_empty());
    }
}
