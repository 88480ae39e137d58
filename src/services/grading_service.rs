use crate::error::Result;
use crate::models::language::Language;
use crate::models::test_case::{outputs_match, TestCase};
use crate::services::judge_service::{CodeExecutor, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub const EXECUTION_ERROR_OUTPUT: &str = "Execution error";

/// Minimal test case shape accepted by the runner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCaseInput {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
}

impl From<&TestCase> for TestCaseInput {
    fn from(tc: &TestCase) -> Self {
        Self {
            input: tc.input.clone(),
            expected_output: tc.expected_output.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCaseResult {
    pub test_case_id: usize,
    pub passed: bool,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_output: Option<String>,
    pub execution_time: Option<String>,
    pub memory_usage: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRunResult {
    pub total_test_cases: usize,
    pub passed_test_cases: usize,
    pub success_rate: f64,
    pub results: Vec<TestCaseResult>,
}

impl TestRunResult {
    fn from_results(results: Vec<TestCaseResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let success_rate = if total > 0 {
            passed as f64 / total as f64
        } else {
            0.0
        };
        Self {
            total_test_cases: total,
            passed_test_cases: passed,
            success_rate,
            results,
        }
    }
}

#[derive(Clone)]
pub struct GradingService {
    executor: CodeExecutor,
}

impl GradingService {
    pub fn new(executor: CodeExecutor) -> Self {
        Self { executor }
    }

    pub async fn run_test_cases(
        &self,
        source_code: &str,
        language: &str,
        test_cases: &[TestCaseInput],
    ) -> Result<TestRunResult> {
        self.run_test_cases_with_cancel(source_code, language, test_cases, &CancellationToken::new())
            .await
    }

    /// Runs the cases one after another. A case passes when its trimmed
    /// stdout equals the trimmed expected output; an execution error fails
    /// the case and is not retried.
    pub async fn run_test_cases_with_cancel(
        &self,
        source_code: &str,
        language: &str,
        test_cases: &[TestCaseInput],
        cancel: &CancellationToken,
    ) -> Result<TestRunResult> {
        let language: Language = language.parse()?;
        let mut results = Vec::with_capacity(test_cases.len());

        for (idx, case) in test_cases.iter().enumerate() {
            let expected_output = case.expected_output.trim().to_string();
            let execution = self
                .executor
                .run(source_code, language, &case.input, DEFAULT_TIMEOUT_SECS, cancel)
                .await;

            if !execution.is_success() {
                results.push(TestCaseResult {
                    test_case_id: idx + 1,
                    passed: false,
                    input: case.input.clone(),
                    expected_output,
                    actual_output: EXECUTION_ERROR_OUTPUT.to_string(),
                    error_message: Some(
                        execution
                            .message
                            .unwrap_or_else(|| "Unknown error".to_string()),
                    ),
                    error_output: None,
                    execution_time: None,
                    memory_usage: None,
                });
                continue;
            }

            let passed = outputs_match(&case.expected_output, &execution.stdout);
            let actual_output = execution.stdout.trim().to_string();
            results.push(TestCaseResult {
                test_case_id: idx + 1,
                passed,
                input: case.input.clone(),
                expected_output,
                actual_output,
                error_message: None,
                error_output: Some(execution.stderr),
                execution_time: execution.time,
                memory_usage: execution.memory,
            });
        }

        let run = TestRunResult::from_results(results);
        tracing::info!(
            language = %language,
            total = run.total_test_cases,
            passed = run.passed_test_cases,
            "test run finished"
        );
        Ok(run)
    }

    /// Writes the outcome of a run back onto the stored cases, matched by
    /// position. Results whose id falls outside the stored cases are skipped.
    pub fn apply_results(test_cases: &mut [TestCase], run: &TestRunResult) {
        for result in &run.results {
            let slot = result
                .test_case_id
                .checked_sub(1)
                .and_then(|idx| test_cases.get_mut(idx));
            if let Some(tc) = slot {
                tc.passed = Some(result.passed);
                tc.actual_output = Some(result.actual_output.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_cases_yield_zero_rate() {
        let run = TestRunResult::from_results(vec![]);
        assert_eq!(run.total_test_cases, 0);
        assert_eq!(run.success_rate, 0.0);
    }

    #[test]
    fn apply_results_overwrites_by_position() {
        let mut cases = vec![TestCase::new("1", "1"), TestCase::new("2", "4")];
        cases[1].passed = Some(true);
        let run = TestRunResult::from_results(vec![
            TestCaseResult {
                test_case_id: 1,
                passed: true,
                input: "1".into(),
                expected_output: "1".into(),
                actual_output: "1".into(),
                error_message: None,
                error_output: None,
                execution_time: None,
                memory_usage: None,
            },
            TestCaseResult {
                test_case_id: 2,
                passed: false,
                input: "2".into(),
                expected_output: "4".into(),
                actual_output: EXECUTION_ERROR_OUTPUT.into(),
                error_message: Some("boom".into()),
                error_output: None,
                execution_time: None,
                memory_usage: None,
            },
        ]);

        GradingService::apply_results(&mut cases, &run);

        assert_eq!(cases[0].passed, Some(true));
        assert_eq!(cases[1].passed, Some(false));
        assert_eq!(cases[1].actual_output.as_deref(), Some(EXECUTION_ERROR_OUTPUT));
        assert_eq!(run.success_rate, 0.5);
    }

    #[test]
    fn apply_results_skips_ids_outside_the_suite() {
        let mut cases = vec![TestCase::new("1", "1")];
        let result = |id: usize| TestCaseResult {
            test_case_id: id,
            passed: true,
            input: String::new(),
            expected_output: "1".into(),
            actual_output: "1".into(),
            error_message: None,
            error_output: None,
            execution_time: None,
            memory_usage: None,
        };
        let run = TestRunResult::from_results(vec![result(0), result(7)]);

        GradingService::apply_results(&mut cases, &run);

        assert_eq!(cases[0].passed, None);
        assert_eq!(cases[0].actual_output, None);
    }
}
