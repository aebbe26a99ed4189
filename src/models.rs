// Core data structures for the parinaam scraper

use serde::{Deserialize, Serialize};

/// One student's complete extracted result
///
/// Identity is the roll number. A record is only constructed once at least
/// one semester was extracted; an identity block with no semester data is
/// reported as "no data" instead of an empty shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub roll_number: String,
    pub student_name: String,
    pub father_name: String,
    /// Semesters in document order (chronological)
    pub semesters: Vec<SemesterRecord>,
}

impl StudentRecord {
    /// Total number of subject rows across all semesters
    pub fn subject_count(&self) -> usize {
        self.semesters.iter().map(|s| s.subjects.len()).sum()
    }

    /// Latest CGPI reported by the portal, if any semester carries a summary
    pub fn latest_cgpi(&self) -> Option<&str> {
        self.semesters
            .iter()
            .rev()
            .find_map(|s| s.summary.as_ref().map(|sum| sum.cgpi.as_str()))
    }
}

/// One semester's rows as they appear on the result page
///
/// A semester with zero subject rows is still valid (summary-only or
/// header-only blocks occur in the portal markup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterRecord {
    /// Label taken from the semester header row, e.g. "I" or "II"
    pub semester: String,
    pub subjects: Vec<SubjectRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryRecord>,
}

impl SemesterRecord {
    /// Start a new empty semester for the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            semester: label.into(),
            subjects: Vec::new(),
            summary: None,
        }
    }
}

/// One subject row
///
/// All fields are kept as strings: the source markup provides no typed
/// values, and coercing malformed credit/grade-point cells would be lossy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub sno: String,
    pub subject_name: String,
    pub subject_code: String,
    pub credits: String,
    pub grade: String,
    pub grade_points: String,
}

/// Semester summary block (SGPI/CGPI values as opaque portal text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub sgpi: String,
    pub sgpi_total: String,
    pub cgpi: String,
    pub cgpi_total: String,
}
