use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const MIN_SEMESTER: u8 = 1;
pub const MAX_SEMESTER: u8 = 8;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectType {
    Core,
    Lab,
    Elective,
    Project,
}

impl SubjectType {
    pub fn is_core(self) -> bool {
        self == SubjectType::Core
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub code: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
    pub credits: u32,
    pub weightage: u32,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct SemesterCatalog {
    pub semester: u8,
    pub name: &'static str,
    pub subjects: &'static [Subject],
}

impl SemesterCatalog {
    pub fn subject(&self, code: &str) -> Option<&'static Subject> {
        self.subjects.iter().find(|s| s.code == code)
    }

    pub fn total_credits(&self) -> u32 {
        self.subjects.iter().map(|s| s.credits).sum()
    }
}

/// Read-only curriculum scheme. Copyable handle over `'static` tables, so
/// it can be shared across threads and request handlers without locking.
#[derive(Debug, Clone, Copy)]
pub struct CurriculumCatalog {
    semesters: &'static [SemesterCatalog],
}

impl CurriculumCatalog {
    /// VTU 2022 Computer Science & Engineering scheme, semesters 1-8.
    pub fn vtu_2022_cse() -> Self {
        Self { semesters: &VTU_2022_CSE }
    }

    pub fn semester(&self, semester: u8) -> Result<&'static SemesterCatalog> {
        if !(MIN_SEMESTER..=MAX_SEMESTER).contains(&semester) {
            return Err(EngineError::InvalidSemester(semester.into()));
        }
        self.semesters
            .iter()
            .find(|s| s.semester == semester)
            .ok_or(EngineError::InvalidSemester(semester.into()))
    }

    pub fn semesters(&self) -> impl Iterator<Item = &'static SemesterCatalog> {
        self.semesters.iter()
    }
}

impl Default for CurriculumCatalog {
    fn default() -> Self {
        Self::vtu_2022_cse()
    }
}

/// Narrows a caller-supplied semester number, rejecting anything outside
/// 1-8 (including values that do not fit a `u8`).
pub fn semester_number(raw: i64) -> Result<u8> {
    u8::try_from(raw)
        .ok()
        .filter(|n| (MIN_SEMESTER..=MAX_SEMESTER).contains(n))
        .ok_or(EngineError::InvalidSemester(raw))
}

pub fn get_semester_subjects(semester: u8) -> Result<&'static SemesterCatalog> {
    CurriculumCatalog::vtu_2022_cse().semester(semester)
}

const fn subject(
    code: &'static str,
    name: &'static str,
    subject_type: SubjectType,
    credits: u32,
    weightage: u32,
) -> Subject {
    Subject { code, name, subject_type, credits, weightage }
}

use SubjectType::{Core, Elective, Lab, Project};

static SEMESTER_1: [Subject; 7] = [
    subject("23BMAT101", "Engineering Mathematics - I", Core, 4, 15),
    subject("23BPHY101", "Engineering Physics", Core, 4, 10),
    subject("23BCHE101", "Engineering Chemistry", Core, 3, 8),
    subject("23BEN101", "English for Communication", Core, 3, 5),
    subject("23BPHY102", "Physics Lab", Lab, 2, 4),
    subject("23BCHE102", "Chemistry Lab", Lab, 2, 4),
    subject("23BESS101", "Environmental Studies", Core, 1, 2),
];

static SEMESTER_2: [Subject; 6] = [
    subject("23BMAT201", "Engineering Mathematics - II", Core, 4, 15),
    subject("23BPHY201", "Engineering Physics - II", Core, 4, 10),
    subject("23BCHE201", "Organic Chemistry", Core, 3, 8),
    subject("23BEN201", "Technical English", Core, 3, 5),
    subject("23BPHY202", "Physics Lab - II", Lab, 2, 4),
    subject("23BCHE202", "Chemistry Lab - II", Lab, 2, 4),
];

static SEMESTER_3: [Subject; 6] = [
    subject("23CS301", "Data Structures", Core, 4, 20),
    subject("23CS302", "Digital Logic and Computer Organization", Core, 4, 18),
    subject("23CS303", "Discrete Mathematics", Core, 4, 15),
    subject("23CS304", "Unix and Linux Systems", Core, 3, 12),
    subject("23CS305", "Data Structures Lab", Lab, 2, 8),
    subject("23CS306", "Unix and Linux Systems Lab", Lab, 2, 7),
];

static SEMESTER_4: [Subject; 6] = [
    subject("23CS401", "Design and Analysis of Algorithms", Core, 4, 20),
    subject("23CS402", "Database Management Systems", Core, 4, 18),
    subject("23CS403", "Formal Languages and Automata Theory", Core, 4, 15),
    subject("23CS404", "Microprocessors and Interfacing", Core, 3, 12),
    subject("23CS405", "Database Lab", Lab, 2, 8),
    subject("23CS406", "Microprocessors Lab", Lab, 2, 7),
];

static SEMESTER_5: [Subject; 6] = [
    subject("23CS501", "Software Engineering", Core, 4, 16),
    subject("23CS502", "Operating Systems", Core, 4, 18),
    subject("23CS503", "Computer Networks", Core, 4, 18),
    subject("23CS504", "Machine Learning", Core, 3, 14),
    subject("23CS505", "Operating Systems Lab", Lab, 2, 7),
    subject("23CS506", "Machine Learning Lab", Lab, 2, 7),
];

static SEMESTER_6: [Subject; 7] = [
    subject("23CS601", "Web Technologies", Core, 4, 16),
    subject("23CS602", "Cloud Computing and DevOps", Core, 4, 16),
    subject("23CS603", "Artificial Intelligence", Core, 3, 14),
    subject("23CS604", "Data Science", Core, 3, 14),
    subject("23CS605", "Web Technologies Lab", Lab, 2, 7),
    subject("23CS606", "Cloud and AI Lab", Lab, 2, 7),
    subject("23CS607", "Elective I", Elective, 3, 9),
];

static SEMESTER_7: [Subject; 7] = [
    subject("23CS701", "Security in Computing", Core, 4, 14),
    subject("23CS702", "Distributed Systems", Core, 3, 12),
    subject("23CS703", "Advanced Algorithms", Core, 3, 12),
    subject("23CS704", "Elective II", Elective, 3, 8),
    subject("23CS705", "Elective III", Elective, 3, 8),
    subject("23CS706", "Project Work", Project, 4, 20),
    subject("23CS707", "Security Lab", Lab, 2, 6),
];

static SEMESTER_8: [Subject; 3] = [
    subject("23CS801", "Internship/Project", Project, 8, 40),
    subject("23CS802", "Professional Ethics", Core, 2, 5),
    subject("23CS803", "Seminar", Core, 2, 5),
];

static VTU_2022_CSE: [SemesterCatalog; 8] = [
    SemesterCatalog { semester: 1, name: "First Semester", subjects: &SEMESTER_1 },
    SemesterCatalog { semester: 2, name: "Second Semester", subjects: &SEMESTER_2 },
    SemesterCatalog { semester: 3, name: "Third Semester", subjects: &SEMESTER_3 },
    SemesterCatalog { semester: 4, name: "Fourth Semester", subjects: &SEMESTER_4 },
    SemesterCatalog { semester: 5, name: "Fifth Semester", subjects: &SEMESTER_5 },
    SemesterCatalog { semester: 6, name: "Sixth Semester", subjects: &SEMESTER_6 },
    SemesterCatalog { semester: 7, name: "Seventh Semester", subjects: &SEMESTER_7 },
    SemesterCatalog { semester: 8, name: "Eighth Semester", subjects: &SEMESTER_8 },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_semester_has_unique_subject_codes() {
        for semester in MIN_SEMESTER..=MAX_SEMESTER {
            let catalog = get_semester_subjects(semester).unwrap();
            assert_eq!(catalog.semester, semester);
            assert!(!catalog.subjects.is_empty());

            let codes: HashSet<_> = catalog.subjects.iter().map(|s| s.code).collect();
            assert_eq!(codes.len(), catalog.subjects.len());
        }
    }

    #[test]
    fn rejects_out_of_range_semesters() {
        assert!(matches!(get_semester_subjects(0), Err(EngineError::InvalidSemester(0))));
        assert!(matches!(get_semester_subjects(9), Err(EngineError::InvalidSemester(9))));
    }

    #[test]
    fn semester_number_checks_width_and_range() {
        assert_eq!(semester_number(1).unwrap(), 1);
        assert_eq!(semester_number(8).unwrap(), 8);
        assert!(matches!(semester_number(0), Err(EngineError::InvalidSemester(0))));
        assert!(matches!(semester_number(256), Err(EngineError::InvalidSemester(256))));
        assert!(matches!(semester_number(-1), Err(EngineError::InvalidSemester(-1))));
    }

    #[test]
    fn credits_are_positive() {
        let catalog = CurriculumCatalog::vtu_2022_cse();
        assert_eq!(catalog.semesters().count(), 8);
        for semester in catalog.semesters() {
            assert!(semester.subjects.iter().all(|s| s.credits > 0));
        }
    }

    #[test]
    fn subject_lookup_by_code() {
        let third = get_semester_subjects(3).unwrap();
        let ds = third.subject("23CS301").unwrap();
        assert_eq!(ds.name, "Data Structures");
        assert_eq!(ds.credits, 4);
        assert!(third.subject("23CS999").is_none());
        assert_eq!(third.total_credits(), 19);
    }

    #[test]
    fn subject_type_serializes_under_type_key() {
        let lab = get_semester_subjects(3).unwrap().subject("23CS305").unwrap();
        let json = serde_json::to_value(lab).unwrap();
        assert_eq!(json["type"], "Lab");
        assert_eq!(json["code"], "23CS305");
    }
}
