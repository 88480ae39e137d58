use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored test case of a coding challenge. `passed` and `actual_output`
/// are overwritten once per submission attempt.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TestCase {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default = "default_weight")]
    #[validate(range(min = 0.0, message = "Test case weight cannot be negative"))]
    pub weight: f64,
    #[serde(default)]
    pub passed: Option<bool>,
    #[serde(default)]
    pub actual_output: Option<String>,
}

/// Program output passes when it equals the expected output after trimming
/// surrounding whitespace on both sides.
pub fn outputs_match(expected_output: &str, actual_output: &str) -> bool {
    actual_output.trim() == expected_output.trim()
}

pub(crate) fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Candidate,
    Recruiter,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestCaseView {
    pub input: String,
    pub expected_output: Option<String>,
    pub actual_output: Option<String>,
    pub is_hidden: bool,
    pub weight: f64,
    pub passed: Option<bool>,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
            is_hidden: false,
            weight: default_weight(),
            passed: None,
            actual_output: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn matches(&self, actual_output: &str) -> bool {
        outputs_match(&self.expected_output, actual_output)
    }

    pub fn view(&self, viewer: Viewer) -> TestCaseView {
        let reveal = match viewer {
            Viewer::Recruiter => true,
            Viewer::Candidate => !self.is_hidden || self.passed == Some(true),
        };
        TestCaseView {
            input: self.input.clone(),
            expected_output: reveal.then(|| self.expected_output.clone()),
            actual_output: self.actual_output.clone(),
            is_hidden: self.is_hidden,
            weight: self.weight,
            passed: self.passed,
        }
    }
}
