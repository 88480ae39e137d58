use crate::models::analysis::CodeAnalysis;
use crate::models::score::{FinalScore, PhaseOutcome};
use crate::models::skill::{CandidateSkill, JobSkills};
use crate::models::test_case::TestCase;
use crate::services::grading_service::TestRunResult;
use crate::services::skill_matcher::MatchResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CodingSubmissionPayload {
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(length(min = 1))]
    pub language: String,
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    #[validate(nested)]
    pub test_cases: Vec<TestCase>,
}

/// Everything known about a candidate at evaluation time. Analyses are kept
/// as raw JSON so one malformed document only degrades its own phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CandidateEvaluationRequest {
    pub candidate_id: Option<String>,
    /// Used to fetch and analyze the profile when no GitHub analysis is given.
    pub github_url: Option<String>,
    pub github_analysis: Option<JsonValue>,
    pub resume_analysis: Option<JsonValue>,
    /// Parsed and skill-analyzed when no resume analysis is given.
    pub resume_text: Option<String>,
    pub linkedin_analysis: Option<JsonValue>,
    pub video_analysis: Option<JsonValue>,
    pub code_analysis: Option<JsonValue>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub test_success_rate: Option<f64>,
    #[validate(nested)]
    pub coding_submission: Option<CodingSubmissionPayload>,
    pub cultural_fit_analysis: Option<JsonValue>,
    pub managerial_analysis: Option<JsonValue>,
    #[serde(default)]
    #[validate(nested)]
    pub candidate_skills: Vec<CandidateSkill>,
    pub job_skills: Option<JobSkills>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FinalScoreRequest {
    pub candidate_id: Option<String>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub profile_score: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub video_score: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub coding_score: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub managerial_score: Option<f64>,
}

/// Outcome of grading one code submission, including the values the
/// challenge record stores.
#[derive(Debug, Clone, Serialize)]
pub struct CodingEvaluation {
    pub test_results: TestRunResult,
    pub code_analysis: CodeAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
    pub correctness_score: f64,
    pub time_complexity_score: f64,
    pub space_complexity_score: f64,
    pub style_score: f64,
    pub overall_score: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateEvaluation {
    pub candidate_id: Option<String>,
    pub phases: Vec<PhaseOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_match: Option<MatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coding: Option<CodingEvaluation>,
    pub final_score: FinalScore,
    pub evaluated_at: DateTime<Utc>,
}

impl CandidateEvaluation {
    pub fn degraded_phases(&self) -> impl Iterator<Item = &PhaseOutcome> {
        self.phases.iter().filter(|p| p.is_degraded())
    }
}
