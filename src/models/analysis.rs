//! Typed shapes of the JSON documents returned by the LLM analysis
//! collaborator. Every field is optional: an absent key or an explicit `null`
//! decodes to its default, while a value of the wrong type is a decode error.

use crate::models::test_case::{default_weight, TestCase};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedSkill {
    #[serde(default, deserialize_with = "nullable")]
    pub skill: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingSkill {
    #[serde(default, deserialize_with = "nullable")]
    pub skill: String,
    #[serde(default)]
    pub importance: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillAnalysis {
    #[serde(default, deserialize_with = "nullable")]
    pub identified_skills: Vec<IdentifiedSkill>,
    #[serde(default, deserialize_with = "nullable")]
    pub missing_skills: Vec<MissingSkill>,
    #[serde(default)]
    pub overall_match_score: Option<f64>,
}

impl SkillAnalysis {
    /// Mean confidence over identified skills; `None` when there are none.
    pub fn mean_confidence(&self) -> Option<f64> {
        if self.identified_skills.is_empty() {
            return None;
        }
        let total: f64 = self
            .identified_skills
            .iter()
            .map(|s| s.confidence.unwrap_or(0.0))
            .sum();
        Some(total / self.identified_skills.len() as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GithubAnalysis {
    #[serde(default)]
    pub code_quality_score: Option<f64>,
    #[serde(default)]
    pub project_diversity_score: Option<f64>,
    #[serde(default)]
    pub technical_breadth_score: Option<f64>,
    #[serde(default)]
    pub activity_score: Option<f64>,
    #[serde(default)]
    pub overall_github_score: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub identified_skills: Vec<IdentifiedSkill>,
    #[serde(default, deserialize_with = "nullable")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(default)]
    pub parsed_resume: Option<JsonValue>,
    #[serde(default)]
    pub skill_analysis: Option<SkillAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedinAnalysis {
    #[serde(default)]
    pub skill_confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub engagement: Option<f64>,
    #[serde(default)]
    pub enthusiasm: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysis {
    #[serde(default)]
    pub technical_knowledge_score: Option<f64>,
    #[serde(default)]
    pub communication_score: Option<f64>,
    #[serde(default)]
    pub logical_reasoning_score: Option<f64>,
    #[serde(default)]
    pub overall_interview_score: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub sentiment_analysis: SentimentAnalysis,
    #[serde(default, deserialize_with = "nullable")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeAnalysis {
    #[serde(default)]
    pub correctness_score: Option<f64>,
    #[serde(default)]
    pub time_complexity: Option<String>,
    #[serde(default)]
    pub time_complexity_score: Option<f64>,
    #[serde(default)]
    pub space_complexity: Option<String>,
    #[serde(default)]
    pub space_complexity_score: Option<f64>,
    #[serde(default)]
    pub code_style_score: Option<f64>,
    #[serde(default)]
    pub problem_solving_score: Option<f64>,
    #[serde(default)]
    pub overall_code_score: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub feedback: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredDimension {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunicationStyle {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub areas_for_improvement: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CulturalFitAnalysis {
    #[serde(default)]
    pub cultural_fit_score: Option<f64>,
    #[serde(default)]
    pub value_alignment: Option<ScoredDimension>,
    #[serde(default)]
    pub communication_style: Option<CommunicationStyle>,
    #[serde(default)]
    pub team_collaboration: Option<ScoredDimension>,
    #[serde(default)]
    pub adaptability: Option<ScoredDimension>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerialAnalysis {
    #[serde(default)]
    pub leadership_score: Option<f64>,
    #[serde(default)]
    pub behavior_score: Option<f64>,
    #[serde(default)]
    pub cultural_fit_score: Option<f64>,
    #[serde(default)]
    pub decision_making_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTestCase {
    #[serde(default, deserialize_with = "nullable")]
    pub input: String,
    #[serde(default, deserialize_with = "nullable")]
    pub expected_output: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_hidden: bool,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl From<GeneratedTestCase> for TestCase {
    fn from(generated: GeneratedTestCase) -> Self {
        TestCase {
            input: generated.input,
            expected_output: generated.expected_output,
            is_hidden: generated.is_hidden,
            weight: generated.weight.max(0.0),
            passed: None,
            actual_output: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    #[serde(default, deserialize_with = "nullable")]
    pub question: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "nullable")]
    pub expected_answer: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tests_skills: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub evaluation_criteria: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_null_fields_default() {
        let video: VideoAnalysis = serde_json::from_value(json!({
            "technical_knowledge_score": 0.8,
            "communication_score": null,
            "strengths": null
        }))
        .unwrap();
        assert_eq!(video.technical_knowledge_score, Some(0.8));
        assert_eq!(video.communication_score, None);
        assert_eq!(video.logical_reasoning_score, None);
        assert!(video.strengths.is_empty());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let result: Result<CodeAnalysis, _> =
            serde_json::from_value(json!({ "correctness_score": "high" }));
        assert!(result.is_err());
    }

    #[test]
    fn mean_confidence_counts_missing_confidence_as_zero() {
        let analysis: SkillAnalysis = serde_json::from_value(json!({
            "identified_skills": [
                { "skill": "Python", "confidence": 0.9 },
                { "skill": "SQL" }
            ]
        }))
        .unwrap();
        assert_eq!(analysis.mean_confidence(), Some(0.45));
        assert_eq!(SkillAnalysis::default().mean_confidence(), None);
    }
}
