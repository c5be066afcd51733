//! The job a resume is measured against.

const GENERIC_JOB_DESCRIPTION: &str = "We are seeking a candidate with strong skills in Python, \
data analysis, machine learning, communication, teamwork, and problem-solving.";

const GENERIC_KEYWORDS: [&str; 6] = [
    "Python",
    "data analysis",
    "machine learning",
    "communication",
    "teamwork",
    "problem-solving",
];

/// Reference description plus the ordered skill keywords it is scored on.
/// Immutable once built; handed to the evaluator at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct JobProfile {
    pub description: String,
    pub keywords: Vec<String>,
}

impl JobProfile {
    pub fn new(description: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            description: description.into(),
            keywords,
        }
    }
}

impl Default for JobProfile {
    fn default() -> Self {
        Self::new(
            GENERIC_JOB_DESCRIPTION,
            GENERIC_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        )
    }
}
