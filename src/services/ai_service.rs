use crate::config::Config;
use crate::error::Result;
use crate::models::analysis::{
    CodeAnalysis, GeneratedTestCase, GithubAnalysis, InterviewQuestion, ResumeAnalysis,
    SkillAnalysis, VideoAnalysis,
};
use crate::models::skill::JobSkills;
use crate::models::test_case::TestCase;
use crate::services::github_service::RepoSummary;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// A chat model that answers with a JSON document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete_json(&self, payload: JsonValue) -> Result<JsonValue>;
}

#[derive(Clone)]
pub struct OpenAiChat {
    client: Client,
    api_key: String,
}

impl OpenAiChat {
    pub fn new(api_key: String, client: Client) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl ChatCompletion for OpenAiChat {
    async fn complete_json(&self, payload: JsonValue) -> Result<JsonValue> {
        let res = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OpenAI API Error {}: {}", status, text).into());
        }

        let body: JsonValue = res.json().await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .and_then(|s| serde_json::from_str(s).ok())
            .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response format").into())
    }
}

/// Prompts the chat model for the analyses the scoring pipeline consumes and
/// decodes its answers into typed shapes.
#[derive(Clone)]
pub struct AIService {
    chat: Arc<dyn ChatCompletion>,
    model: String,
}

impl AIService {
    pub fn new(chat: Arc<dyn ChatCompletion>, model: impl Into<String>) -> Self {
        Self {
            chat,
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Result<Self> {
        let api_key = config.require_openai_api_key()?.to_string();
        Ok(Self::new(
            Arc::new(OpenAiChat::new(api_key, client)),
            config.openai_model.clone(),
        ))
    }

    fn payload(&self, system_prompt: &str, user_prompt: String) -> JsonValue {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "response_format": { "type": "json_object" }
        })
    }

    async fn ask(&self, system_prompt: &str, user_prompt: String) -> Result<JsonValue> {
        let payload = self.payload(system_prompt, user_prompt);
        self.chat.complete_json(payload).await.map_err(|e| {
            tracing::error!("Chat completion failed: {:?}", e);
            e
        })
    }

    pub async fn analyze_technical_skills(
        &self,
        text: &str,
        job_requirements: Option<&str>,
    ) -> Result<SkillAnalysis> {
        let requirements = job_requirements
            .map(|r| format!("\nJob requirements:\n{}\n", r))
            .unwrap_or_default();
        let prompt = format!(
            "Identify the technical skills demonstrated in the text below.{}\n\
             Text:\n{}\n\n\
             Respond with a JSON object: {{\"identified_skills\": [{{\"skill\", \"confidence\" (0-1), \
             \"description\", \"evidence\"}}], \"missing_skills\": [{{\"skill\", \"importance\"}}], \
             \"overall_match_score\" (0-1)}}",
            requirements, text
        );
        let raw = self
            .ask("You are a technical skills analyzer for recruitment.", prompt)
            .await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Extracts structured resume data, then runs skill analysis over the
    /// same text.
    pub async fn parse_resume(&self, resume_text: &str) -> Result<ResumeAnalysis> {
        let prompt = format!(
            "Extract structured information from the following resume text:\n\n{}\n\n\
             Respond with a JSON object containing name, contact {{\"email\", \"phone\"}}, \
             education [{{\"degree\", \"institution\", \"year\"}}], experience [{{\"company\", \
             \"title\", \"period\", \"description\"}}], skills [{{\"category\", \"items\"}}], \
             projects [{{\"name\", \"description\", \"technologies\"}}] and certifications \
             [{{\"name\", \"issuer\", \"date\"}}].",
            resume_text
        );
        let parsed_resume = self
            .ask("You are a resume parsing expert.", prompt)
            .await?;
        let skill_analysis = self.analyze_technical_skills(resume_text, None).await?;
        Ok(ResumeAnalysis {
            parsed_resume: Some(parsed_resume),
            skill_analysis: Some(skill_analysis),
        })
    }

    pub async fn analyze_github_profile(
        &self,
        readme: &str,
        repos: &[RepoSummary],
    ) -> Result<GithubAnalysis> {
        let prompt = format!(
            "Evaluate this GitHub profile.\n\nProfile README:\n{}\n\nRepositories:\n{}\n\n\
             Respond with a JSON object containing code_quality_score, project_diversity_score, \
             technical_breadth_score, activity_score and overall_github_score (all 0-1), \
             identified_skills [{{\"skill\", \"confidence\", \"evidence\"}}] and a short summary.",
            readme,
            serde_json::to_string(repos)?
        );
        let raw = self
            .ask("You are a GitHub profile analyzer for technical recruitment.", prompt)
            .await?;
        Ok(serde_json::from_value(raw)?)
    }

    pub async fn analyze_video_interview(&self, transcript: &str) -> Result<VideoAnalysis> {
        let prompt = format!(
            "Assess this technical interview transcript.\n\nTranscript:\n{}\n\n\
             Respond with a JSON object containing technical_knowledge_score, communication_score, \
             logical_reasoning_score and overall_interview_score (all 0-1), strengths, weaknesses, \
             sentiment_analysis {{\"confidence\", \"engagement\", \"enthusiasm\"}} and a summary.",
            transcript
        );
        let raw = self
            .ask("You are an expert technical interviewer.", prompt)
            .await?;
        Ok(serde_json::from_value(raw)?)
    }

    pub async fn analyze_code_submission(
        &self,
        code: &str,
        problem_statement: &str,
        language: &str,
    ) -> Result<CodeAnalysis> {
        let prompt = format!(
            "Review this {} solution.\n\nProblem:\n{}\n\nCode:\n```\n{}\n```\n\n\
             Respond with a JSON object containing correctness_score, time_complexity, \
             time_complexity_score, space_complexity, space_complexity_score, code_style_score, \
             problem_solving_score, overall_code_score (scores 0-1), strengths, weaknesses and feedback.",
            language, problem_statement, code
        );
        let raw = self
            .ask("You are an expert code reviewer for technical interviews.", prompt)
            .await?;
        Ok(serde_json::from_value(raw)?)
    }

    pub async fn extract_job_skills(&self, job_description: &str) -> Result<JobSkills> {
        let prompt = format!(
            "Extract the technical skills required by this job description and classify each as \
             essential, preferred or mentioned.\n\nJob Description:\n{}\n\n\
             Respond with a JSON object: {{\"essential_skills\": [{{\"skill\", \"context\"}}], \
             \"preferred_skills\": [...], \"mentioned_skills\": [...]}}",
            job_description
        );
        let raw = self
            .ask("You are a job description analyzer for technical roles.", prompt)
            .await?;
        Ok(serde_json::from_value(raw)?)
    }

    pub async fn generate_test_cases(
        &self,
        problem_statement: &str,
        language: &str,
        num_cases: usize,
    ) -> Result<Vec<TestCase>> {
        let prompt = format!(
            "Write {} test cases for the following {} programming problem. Include edge cases and \
             mark roughly a third of them hidden.\n\nProblem:\n{}\n\n\
             Respond with a JSON object: {{\"test_cases\": [{{\"input\", \"expected_output\", \
             \"description\", \"is_hidden\", \"weight\"}}]}}",
            num_cases, language, problem_statement
        );
        let raw = self
            .ask("You are a test designer for coding interviews.", prompt)
            .await?;
        let cases = Self::sanitize_test_cases(&raw);
        tracing::info!(requested = num_cases, generated = cases.len(), "test cases generated");
        Ok(cases)
    }

    pub async fn generate_interview_questions(
        &self,
        job_description: &str,
        candidate_skills: &[String],
        difficulty: &str,
    ) -> Result<Vec<InterviewQuestion>> {
        let prompt = format!(
            "Prepare {} difficulty interview questions for this role.\n\nJob Description:\n{}\n\n\
             Candidate skills: {}\n\n\
             Respond with a JSON object: {{\"questions\": [{{\"question\", \"type\", \"difficulty\", \
             \"expected_answer\", \"tests_skills\", \"evaluation_criteria\"}}]}}",
            difficulty,
            job_description,
            candidate_skills.join(", ")
        );
        let raw = self
            .ask("You are an expert technical interviewer.", prompt)
            .await?;
        Ok(list_items(&raw, "questions")
            .iter()
            .filter_map(|v| serde_json::from_value::<InterviewQuestion>(v.clone()).ok())
            .filter(|q| !q.question.trim().is_empty())
            .collect())
    }

    /// Keeps the generated cases that decode and carry an expected output.
    pub fn sanitize_test_cases(raw: &JsonValue) -> Vec<TestCase> {
        list_items(raw, "test_cases")
            .iter()
            .filter_map(|v| serde_json::from_value::<GeneratedTestCase>(v.clone()).ok())
            .filter(|tc| !tc.expected_output.trim().is_empty())
            .map(TestCase::from)
            .collect()
    }
}

fn list_items<'a>(raw: &'a JsonValue, key: &str) -> &'a [JsonValue] {
    if let Some(arr) = raw.get(key).and_then(|a| a.as_array()) {
        arr
    } else if let Some(arr) = raw.as_array() {
        arr
    } else {
        &[]
    }
}
