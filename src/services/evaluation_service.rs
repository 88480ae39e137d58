use crate::config::Config;
use crate::dto::evaluation_dto::{
    CandidateEvaluation, CandidateEvaluationRequest, CodingEvaluation, FinalScoreRequest,
};
use crate::error::{Error, Result, ScoringError};
use crate::models::analysis::{
    CodeAnalysis, CulturalFitAnalysis, GithubAnalysis, LinkedinAnalysis, ManagerialAnalysis,
    ResumeAnalysis, VideoAnalysis,
};
use crate::models::score::{FinalScore, Phase, PhaseOutcome, PhaseScore};
use crate::models::skill::{SkillProfile, SkillRecord, SkillSource};
use crate::models::test_case::TestCase;
use crate::services::ai_service::AIService;
use crate::services::github_service::GithubService;
use crate::services::grading_service::{GradingService, TestCaseInput};
use crate::services::judge_service::CodeExecutor;
use crate::services::scoring_service::ScoringService;
use crate::services::skill_matcher::match_candidate_to_job;
use crate::utils::profile_url::extract_github_username;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use validator::Validate;

pub const NO_TEST_CASES_MESSAGE: &str = "No test cases found for this challenge";
const AI_NOT_CONFIGURED: &str = "LLM analysis is not configured";

/// Runs the whole evaluation of a candidate: grading, phase scoring and the
/// final weighted score.
#[derive(Clone)]
pub struct EvaluationService {
    ai: Option<AIService>,
    github: GithubService,
    grading: GradingService,
    scoring: ScoringService,
}

impl EvaluationService {
    pub fn new(
        ai: Option<AIService>,
        github: GithubService,
        grading: GradingService,
        scoring: ScoringService,
    ) -> Self {
        Self {
            ai,
            github,
            grading,
            scoring,
        }
    }

    /// LLM analysis is left out when no API key is configured.
    pub fn from_config(config: &Config, client: Client) -> Self {
        let ai = match AIService::from_config(config, client.clone()) {
            Ok(ai) => Some(ai),
            Err(e) => {
                tracing::warn!("LLM analysis disabled: {}", e);
                None
            }
        };
        let github = GithubService::new(client.clone(), config.github_token.clone());
        let executor = CodeExecutor::from_config(&config.judge, client);
        Self::new(
            ai,
            github,
            GradingService::new(executor),
            ScoringService::new(&config.scoring),
        )
    }

    /// Fetches a GitHub profile by URL and has the LLM assess it.
    pub async fn analyze_github_url(&self, github_url: &str) -> Result<GithubAnalysis> {
        let username = extract_github_username(github_url)
            .ok_or_else(|| Error::BadRequest(format!("Invalid GitHub URL: {}", github_url)))?;
        let ai = self
            .ai
            .as_ref()
            .ok_or_else(|| Error::Config(AI_NOT_CONFIGURED.to_string()))?;
        let profile = self.github.fetch_profile(&username).await?;
        ai.analyze_github_profile(&profile.profile_readme, &profile.repositories)
            .await
    }

    pub async fn analyze_resume_text(&self, resume_text: &str) -> Result<ResumeAnalysis> {
        let ai = self
            .ai
            .as_ref()
            .ok_or_else(|| Error::Config(AI_NOT_CONFIGURED.to_string()))?;
        ai.parse_resume(resume_text).await
    }

    pub async fn evaluate_coding_submission(
        &self,
        code: &str,
        language: &str,
        problem_statement: &str,
        test_cases: &mut [TestCase],
    ) -> Result<CodingEvaluation> {
        let (evaluation, _) = self
            .grade_submission(code, language, problem_statement, test_cases)
            .await?;
        Ok(evaluation)
    }

    async fn grade_submission(
        &self,
        code: &str,
        language: &str,
        problem_statement: &str,
        test_cases: &mut [TestCase],
    ) -> Result<(CodingEvaluation, PhaseScore)> {
        if test_cases.is_empty() {
            return Err(Error::BadRequest(NO_TEST_CASES_MESSAGE.to_string()));
        }

        let inputs: Vec<TestCaseInput> = test_cases.iter().map(TestCaseInput::from).collect();
        let test_results = self.grading.run_test_cases(code, language, &inputs).await?;
        GradingService::apply_results(test_cases, &test_results);

        let (code_analysis, analysis_error) = match &self.ai {
            Some(ai) => match ai.analyze_code_submission(code, problem_statement, language).await {
                Ok(analysis) => (analysis, None),
                Err(e) => {
                    tracing::error!("Code analysis failed: {:?}", e);
                    (CodeAnalysis::default(), Some(e.to_string()))
                }
            },
            None => (CodeAnalysis::default(), Some(AI_NOT_CONFIGURED.to_string())),
        };

        let score = self
            .scoring
            .coding_score(&code_analysis, test_results.success_rate)?;
        let part = |name: &str| score.component(name).unwrap_or(0.0);

        let evaluation = CodingEvaluation {
            correctness_score: part("correctness_score"),
            time_complexity_score: part("time_complexity_score"),
            space_complexity_score: part("space_complexity_score"),
            style_score: part("code_style_score"),
            overall_score: score.score,
            feedback: code_analysis.feedback.clone(),
            test_results,
            code_analysis,
            analysis_error,
        };
        Ok((evaluation, score))
    }

    pub async fn evaluate_candidate(
        &self,
        request: CandidateEvaluationRequest,
    ) -> Result<CandidateEvaluation> {
        request.validate()?;

        let github = match (&request.github_analysis, &request.github_url) {
            (None, Some(url)) => self
                .analyze_github_url(url)
                .await
                .map(Some)
                .map_err(|e| ScoringError::unavailable("github", e)),
            (raw, _) => decode::<GithubAnalysis>("github", raw.as_ref()),
        };
        let resume = match (&request.resume_analysis, &request.resume_text) {
            (None, Some(text)) if !text.trim().is_empty() => self
                .analyze_resume_text(text)
                .await
                .map(Some)
                .map_err(|e| ScoringError::unavailable("resume", e)),
            (raw, _) => decode::<ResumeAnalysis>("resume", raw.as_ref()),
        };
        let linkedin = decode::<LinkedinAnalysis>("linkedin", request.linkedin_analysis.as_ref());

        let profile = PhaseOutcome::from_result(Phase::Profile, self.profile_phase(&github, &resume, &linkedin));

        let video = PhaseOutcome::from_result(
            Phase::Video,
            decode::<VideoAnalysis>("video", request.video_analysis.as_ref())
                .and_then(|a| self.scoring.video_score(&a.unwrap_or_default())),
        );

        let mut coding_evaluation = None;
        let coding_result = match &request.coding_submission {
            Some(submission) => {
                let mut cases = submission.test_cases.clone();
                let (evaluation, score) = self
                    .grade_submission(
                        &submission.code,
                        &submission.language,
                        &submission.problem_statement,
                        &mut cases,
                    )
                    .await?;
                coding_evaluation = Some(evaluation);
                Ok(score)
            }
            None => decode::<CodeAnalysis>("coding", request.code_analysis.as_ref()).and_then(|a| {
                self.scoring
                    .coding_score(&a.unwrap_or_default(), request.test_success_rate.unwrap_or(0.0))
            }),
        };
        let coding = PhaseOutcome::from_result(Phase::Coding, coding_result);

        let cultural_fit = request.cultural_fit_analysis.as_ref().map(|raw| {
            PhaseOutcome::from_result(
                Phase::CulturalFit,
                decode::<CulturalFitAnalysis>("cultural_fit", Some(raw))
                    .and_then(|a| self.scoring.cultural_fit_score(&a.unwrap_or_default())),
            )
        });

        let managerial = request.managerial_analysis.as_ref().map(|raw| {
            let fallback_fit = cultural_fit
                .as_ref()
                .filter(|c| !c.is_degraded())
                .map(|c| c.score);
            PhaseOutcome::from_result(
                Phase::Managerial,
                decode::<ManagerialAnalysis>("managerial", Some(raw)).and_then(|a| {
                    let mut analysis = a.unwrap_or_default();
                    if analysis.cultural_fit_score.is_none() {
                        analysis.cultural_fit_score = fallback_fit;
                    }
                    self.scoring.managerial_score(&analysis)
                }),
            )
        });

        let skill_match = request.job_skills.as_ref().map(|job| {
            let profile = build_skill_profile(&request, &github, &resume);
            match_candidate_to_job(&profile.candidate_skills(), job)
        });

        let final_score = self.scoring.calculate_final_candidate_score(
            profile.score,
            video.score,
            coding.score,
            managerial.as_ref().map(|m| m.score),
        );

        tracing::info!(
            candidate = request.candidate_id.as_deref().unwrap_or("-"),
            overall = final_score.overall_candidate_score,
            assessment = %final_score.assessment,
            "candidate evaluated"
        );

        let mut phases = vec![profile, video, coding];
        phases.extend(cultural_fit);
        phases.extend(managerial);

        Ok(CandidateEvaluation {
            candidate_id: request.candidate_id,
            phases,
            skill_match,
            coding: coding_evaluation,
            final_score,
            evaluated_at: Utc::now(),
        })
    }

    pub fn score_final(&self, request: FinalScoreRequest) -> Result<FinalScore> {
        request.validate()?;
        Ok(self.scoring.calculate_final_candidate_score(
            request.profile_score,
            request.video_score,
            request.coding_score,
            request.managerial_score,
        ))
    }

    fn profile_phase(
        &self,
        github: &std::result::Result<Option<GithubAnalysis>, ScoringError>,
        resume: &std::result::Result<Option<ResumeAnalysis>, ScoringError>,
        linkedin: &std::result::Result<Option<LinkedinAnalysis>, ScoringError>,
    ) -> std::result::Result<PhaseScore, ScoringError> {
        let github = github.as_ref().map_err(Clone::clone)?;
        let resume = resume.as_ref().map_err(Clone::clone)?;
        let linkedin = linkedin.as_ref().map_err(Clone::clone)?;
        self.scoring
            .profile_score(github.as_ref(), resume.as_ref(), linkedin.as_ref())
    }
}

/// Decodes one raw analysis document. Absent or `null` is `None`; a document
/// of the wrong shape is a malformed-phase error.
fn decode<T: DeserializeOwned>(
    phase: &'static str,
    raw: Option<&JsonValue>,
) -> std::result::Result<Option<T>, ScoringError> {
    match raw {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| ScoringError::malformed(phase, e)),
    }
}

fn build_skill_profile(
    request: &CandidateEvaluationRequest,
    github: &std::result::Result<Option<GithubAnalysis>, ScoringError>,
    resume: &std::result::Result<Option<ResumeAnalysis>, ScoringError>,
) -> SkillProfile {
    let mut profile = SkillProfile::new();

    if let Ok(Some(github)) = github {
        for s in github.identified_skills.iter().filter(|s| !s.skill.trim().is_empty()) {
            let record = match s.confidence {
                Some(c) if c.is_finite() => SkillRecord::new(&s.skill, c.clamp(0.0, 1.0), SkillSource::Github),
                _ => SkillRecord::from_github_evidence(&s.skill, s.evidence.as_deref().unwrap_or_default()),
            };
            profile.assess(record);
        }
    }

    if let Ok(Some(resume)) = resume {
        let identified = resume
            .skill_analysis
            .iter()
            .flat_map(|a| a.identified_skills.iter())
            .filter(|s| !s.skill.trim().is_empty());
        for s in identified {
            let confidence = s.confidence.filter(|c| c.is_finite()).unwrap_or(0.0);
            profile.assess(SkillRecord::new(&s.skill, confidence.clamp(0.0, 1.0), SkillSource::Resume));
        }
    }

    for s in request.candidate_skills.iter().filter(|s| !s.skill.trim().is_empty()) {
        let confidence = if s.confidence.is_finite() { s.confidence } else { 0.0 };
        profile.assess(SkillRecord::new(&s.skill, confidence.clamp(0.0, 1.0), SkillSource::Manual));
    }

    profile
}
