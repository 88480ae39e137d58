use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::models::analysis::{
    CodeAnalysis, CulturalFitAnalysis, GithubAnalysis, LinkedinAnalysis, ManagerialAnalysis,
    ResumeAnalysis, VideoAnalysis,
};
use crate::models::score::{
    Assessment, CulturalFitWeights, FinalScore, Phase, PhaseScore, ScoringWeights,
};

const VIDEO_TECHNICAL_WEIGHT: f64 = 0.5;
const VIDEO_COMMUNICATION_WEIGHT: f64 = 0.3;
const VIDEO_REASONING_WEIGHT: f64 = 0.2;

const CODING_CORRECTNESS_WEIGHT: f64 = 0.4;
const CODING_TEST_SUCCESS_WEIGHT: f64 = 0.3;
const CODING_TIME_COMPLEXITY_WEIGHT: f64 = 0.1;
const CODING_SPACE_COMPLEXITY_WEIGHT: f64 = 0.1;
const CODING_STYLE_WEIGHT: f64 = 0.1;

const MANAGERIAL_LEADERSHIP_WEIGHT: f64 = 0.3;
const MANAGERIAL_BEHAVIOR_WEIGHT: f64 = 0.2;
const MANAGERIAL_CULTURAL_FIT_WEIGHT: f64 = 0.3;
const MANAGERIAL_DECISION_MAKING_WEIGHT: f64 = 0.2;

/// Turns phase analyses into normalized scores and combines them into the
/// final candidate score.
#[derive(Debug, Clone, Default)]
pub struct ScoringService {
    weights: ScoringWeights,
    cultural_fit_weights: CulturalFitWeights,
}

impl ScoringService {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            weights: config.weights,
            cultural_fit_weights: config.cultural_fit_weights,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Mean of the GitHub score, the mean resume skill confidence and the
    /// LinkedIn confidence, over only those sources that are present and
    /// above zero.
    pub fn profile_score(
        &self,
        github: Option<&GithubAnalysis>,
        resume: Option<&ResumeAnalysis>,
        linkedin: Option<&LinkedinAnalysis>,
    ) -> Result<PhaseScore, ScoringError> {
        let github_score = component("github_score", github.and_then(|g| g.overall_github_score))?;
        let resume_score = component(
            "resume_score",
            resume
                .and_then(|r| r.skill_analysis.as_ref())
                .and_then(|s| s.mean_confidence()),
        )?;
        let linkedin_score = component("linkedin_score", linkedin.and_then(|l| l.skill_confidence))?;

        let available: Vec<f64> = [github_score, resume_score, linkedin_score]
            .into_iter()
            .filter(|s| *s > 0.0)
            .collect();
        let overall = if available.is_empty() {
            0.0
        } else {
            available.iter().sum::<f64>() / available.len() as f64
        };

        Ok(PhaseScore::new(Phase::Profile, overall)
            .with_component("github_score", github_score)
            .with_component("resume_score", resume_score)
            .with_component("linkedin_score", linkedin_score))
    }

    pub fn video_score(&self, analysis: &VideoAnalysis) -> Result<PhaseScore, ScoringError> {
        let technical = component("technical_knowledge_score", analysis.technical_knowledge_score)?;
        let communication = component("communication_score", analysis.communication_score)?;
        let reasoning = component("logical_reasoning_score", analysis.logical_reasoning_score)?;

        let overall = technical * VIDEO_TECHNICAL_WEIGHT
            + communication * VIDEO_COMMUNICATION_WEIGHT
            + reasoning * VIDEO_REASONING_WEIGHT;

        Ok(PhaseScore::new(Phase::Video, overall)
            .with_component("technical_score", technical)
            .with_component("communication_score", communication)
            .with_component("reasoning_score", reasoning))
    }

    pub fn coding_score(
        &self,
        analysis: &CodeAnalysis,
        test_success_rate: f64,
    ) -> Result<PhaseScore, ScoringError> {
        let correctness = component("correctness_score", analysis.correctness_score)?;
        let test_success = component("test_success_rate", Some(test_success_rate))?;
        let time = component("time_complexity_score", analysis.time_complexity_score)?;
        let space = component("space_complexity_score", analysis.space_complexity_score)?;
        let style = component("code_style_score", analysis.code_style_score)?;

        let overall = correctness * CODING_CORRECTNESS_WEIGHT
            + test_success * CODING_TEST_SUCCESS_WEIGHT
            + time * CODING_TIME_COMPLEXITY_WEIGHT
            + space * CODING_SPACE_COMPLEXITY_WEIGHT
            + style * CODING_STYLE_WEIGHT;

        Ok(PhaseScore::new(Phase::Coding, overall)
            .with_component("correctness_score", correctness)
            .with_component("test_success_rate", test_success)
            .with_component("time_complexity_score", time)
            .with_component("space_complexity_score", space)
            .with_component("code_style_score", style))
    }

    /// A non-zero explicit `cultural_fit_score` is taken as is. Otherwise the
    /// weighted components are averaged over the weights of the non-zero ones.
    pub fn cultural_fit_score(&self, analysis: &CulturalFitAnalysis) -> Result<PhaseScore, ScoringError> {
        let explicit = component("cultural_fit_score", analysis.cultural_fit_score)?;
        let value_alignment = component(
            "value_alignment.score",
            analysis.value_alignment.as_ref().and_then(|d| d.score),
        )?;
        let team_collaboration = component(
            "team_collaboration.score",
            analysis.team_collaboration.as_ref().and_then(|d| d.score),
        )?;
        let adaptability = component(
            "adaptability.score",
            analysis.adaptability.as_ref().and_then(|d| d.score),
        )?;
        let communication_style = match &analysis.communication_style {
            Some(style) if style.score.is_some() => component("communication_style.score", style.score)?,
            Some(style) => {
                let strengths = style.strengths.len();
                let total = strengths + style.areas_for_improvement.len();
                if total > 0 {
                    strengths as f64 / total as f64
                } else {
                    0.0
                }
            }
            None => 0.0,
        };

        let w = &self.cultural_fit_weights;
        let weighted = [
            (value_alignment, w.value_alignment),
            (communication_style, w.communication_style),
            (team_collaboration, w.team_collaboration),
            (adaptability, w.adaptability),
        ];

        let overall = if explicit > 0.0 {
            explicit
        } else {
            let (sum, used_weight) = weighted
                .iter()
                .filter(|(score, _)| *score > 0.0)
                .fold((0.0, 0.0), |(sum, used), (score, weight)| {
                    (sum + score * weight, used + weight)
                });
            if used_weight > 0.0 {
                sum / used_weight
            } else {
                0.0
            }
        };

        Ok(PhaseScore::new(Phase::CulturalFit, overall)
            .with_component("value_alignment_score", value_alignment)
            .with_component("communication_style_score", communication_style)
            .with_component("team_collaboration_score", team_collaboration)
            .with_component("adaptability_score", adaptability))
    }

    pub fn managerial_score(&self, analysis: &ManagerialAnalysis) -> Result<PhaseScore, ScoringError> {
        let leadership = component("leadership_score", analysis.leadership_score)?;
        let behavior = component("behavior_score", analysis.behavior_score)?;
        let cultural_fit = component("cultural_fit_score", analysis.cultural_fit_score)?;
        let decision_making = component("decision_making_score", analysis.decision_making_score)?;

        let overall = leadership * MANAGERIAL_LEADERSHIP_WEIGHT
            + behavior * MANAGERIAL_BEHAVIOR_WEIGHT
            + cultural_fit * MANAGERIAL_CULTURAL_FIT_WEIGHT
            + decision_making * MANAGERIAL_DECISION_MAKING_WEIGHT;

        Ok(PhaseScore::new(Phase::Managerial, overall)
            .with_component("leadership_score", leadership)
            .with_component("behavior_score", behavior)
            .with_component("cultural_fit_score", cultural_fit)
            .with_component("decision_making_score", decision_making))
    }

    /// Weighted sum of the phase scores. Inputs are expected in [0, 1]. When
    /// the managerial round is absent the remaining weights are rescaled so
    /// they again sum to 1.0.
    pub fn calculate_final_candidate_score(
        &self,
        profile_score: f64,
        video_score: f64,
        coding_score: f64,
        managerial_score: Option<f64>,
    ) -> FinalScore {
        let w = self.weights;
        let (overall, weights_applied) = match managerial_score {
            Some(managerial) => (
                profile_score * w.profile
                    + video_score * w.video
                    + coding_score * w.coding
                    + managerial * w.managerial,
                w,
            ),
            None => {
                let (profile, video, coding) = w.without_managerial();
                (
                    profile_score * profile + video_score * video + coding_score * coding,
                    ScoringWeights {
                        profile,
                        video,
                        coding,
                        managerial: 0.0,
                    },
                )
            }
        };

        FinalScore {
            profile_score,
            video_score,
            coding_score,
            managerial_score,
            weights_applied,
            overall_candidate_score: overall,
            assessment: Assessment::from_score(overall),
        }
    }
}

/// Reads one sub-score: absent counts as zero, finite values are clamped into
/// [0, 1].
fn component(field: &'static str, value: Option<f64>) -> Result<f64, ScoringError> {
    match value {
        None => Ok(0.0),
        Some(v) if !v.is_finite() => Err(ScoringError::NonFinite { field }),
        Some(v) => Ok(v.clamp(0.0, 1.0)),
    }
}
