use async_trait::async_trait;
use recruitment_scoring::config::JudgeConfig;
use recruitment_scoring::dto::evaluation_dto::CandidateEvaluationRequest;
use recruitment_scoring::error::{Error, Result};
use recruitment_scoring::models::score::{Assessment, Phase};
use recruitment_scoring::models::test_case::{TestCase, Viewer};
use recruitment_scoring::services::ai_service::{AIService, ChatCompletion};
use recruitment_scoring::services::evaluation_service::EvaluationService;
use recruitment_scoring::services::github_service::GithubService;
use recruitment_scoring::services::grading_service::GradingService;
use recruitment_scoring::services::judge_service::{
    CodeExecutor, JudgeApi, JudgeError, SubmissionCreated, SubmissionRequest, SubmissionStatus,
};
use recruitment_scoring::services::scoring_service::ScoringService;
use recruitment_scoring::utils::encoding::encode_b64;
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Judge whose every submission prints the same line.
struct ConstantJudge {
    stdout: String,
}

#[async_trait]
impl JudgeApi for ConstantJudge {
    async fn create_submission(
        &self,
        _request: &SubmissionRequest,
    ) -> std::result::Result<SubmissionCreated, JudgeError> {
        Ok(SubmissionCreated {
            token: Some("t".to_string()),
        })
    }

    async fn fetch_submission(&self, _token: &str) -> std::result::Result<SubmissionStatus, JudgeError> {
        Ok(SubmissionStatus {
            stdout: Some(encode_b64(&self.stdout)),
            ..SubmissionStatus::with_status(3, "Accepted")
        })
    }
}

/// Chat model that replays a fixed answer, or fails when none is set.
struct ScriptedChat {
    answer: Option<JsonValue>,
    prompts: Mutex<Vec<JsonValue>>,
}

#[async_trait]
impl ChatCompletion for ScriptedChat {
    async fn complete_json(&self, payload: JsonValue) -> Result<JsonValue> {
        self.prompts.lock().unwrap().push(payload);
        self.answer
            .clone()
            .ok_or_else(|| anyhow::anyhow!("OpenAI API Error 503: overloaded").into())
    }
}

/// Serves canned GitHub API documents for user `ada` on a local port and
/// returns the base URL.
async fn github_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&request);
                let path = head.split_whitespace().nth(1).unwrap_or("/");
                let body = match path.split('?').next().unwrap_or(path) {
                    "/users/ada" => Some(json!({
                        "name": "Ada",
                        "public_repos": 2,
                        "followers": 10,
                        "created_at": "2015-01-01T00:00:00Z"
                    })),
                    "/users/ada/repos" => Some(json!([
                        { "name": "engine", "language": "Rust", "stargazers_count": 12 },
                        { "name": "forked-lib", "fork": true }
                    ])),
                    "/repos/ada/ada/readme" => Some(json!({ "content": encode_b64("# Ada\nI write Rust") })),
                    _ => None,
                };
                let response = match body {
                    Some(body) => {
                        let body = body.to_string();
                        format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        )
                    }
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{}", addr)
}

fn service(stdout: &str, answer: Option<JsonValue>) -> (EvaluationService, Arc<ScriptedChat>) {
    service_with_github("http://127.0.0.1:9", stdout, answer)
}

fn service_with_github(
    github_base: &str,
    stdout: &str,
    answer: Option<JsonValue>,
) -> (EvaluationService, Arc<ScriptedChat>) {
    let chat = Arc::new(ScriptedChat {
        answer,
        prompts: Mutex::new(Vec::new()),
    });
    let executor = CodeExecutor::new(
        Arc::new(ConstantJudge {
            stdout: stdout.to_string(),
        }),
        &JudgeConfig::default(),
    );
    let service = EvaluationService::new(
        Some(AIService::new(chat.clone(), "gpt-4o")),
        GithubService::with_base_url(Client::new(), github_base, None),
        GradingService::new(executor),
        ScoringService::default(),
    );
    (service, chat)
}

#[tokio::test]
async fn submission_updates_cases_and_scores_coding() {
    let (service, chat) = service(
        "42\n",
        Some(json!({
            "correctness_score": 1.0,
            "time_complexity_score": 1.0,
            "space_complexity_score": 1.0,
            "code_style_score": 0.5,
            "feedback": "Clean solution"
        })),
    );
    let mut cases = vec![TestCase::new("", "42"), TestCase::new("", "43").hidden()];

    let evaluation = service
        .evaluate_coding_submission("print(42)", "python", "Print 42", &mut cases)
        .await
        .unwrap();

    assert_eq!(evaluation.test_results.success_rate, 0.5);
    assert!((evaluation.overall_score - (0.4 + 0.15 + 0.1 + 0.1 + 0.05)).abs() < 1e-9);
    assert_eq!(evaluation.style_score, 0.5);
    assert_eq!(evaluation.feedback, "Clean solution");
    assert!(evaluation.analysis_error.is_none());
    assert_eq!(cases[0].passed, Some(true));
    assert_eq!(cases[1].passed, Some(false));
    assert!(cases[1].view(Viewer::Candidate).expected_output.is_none());
    assert_eq!(chat.prompts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_code_review_keeps_test_results() {
    let (service, _) = service("7", None);
    let mut cases = vec![TestCase::new("", "7")];

    let evaluation = service
        .evaluate_coding_submission("print(7)", "python", "Print 7", &mut cases)
        .await
        .unwrap();

    assert!(evaluation.analysis_error.as_deref().unwrap().contains("503"));
    assert_eq!(evaluation.correctness_score, 0.0);
    assert!((evaluation.overall_score - 0.3).abs() < 1e-9);
}

#[tokio::test]
async fn unsupported_submission_language_is_an_input_error() {
    let (service, _) = service("1", None);
    let request: CandidateEvaluationRequest = serde_json::from_value(json!({
        "coding_submission": {
            "code": "x",
            "language": "brainfuck",
            "test_cases": [{ "input": "", "expected_output": "1" }]
        }
    }))
    .unwrap();

    let err = service.evaluate_candidate(request).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedLanguage(_)));
}

#[tokio::test]
async fn full_candidate_evaluation() {
    let (service, _) = service("ok", Some(json!({ "correctness_score": 0.9 })));
    let request: CandidateEvaluationRequest = serde_json::from_value(json!({
        "candidate_id": "c-17",
        "github_analysis": { "overall_github_score": 0.9 },
        "resume_analysis": {
            "skill_analysis": { "identified_skills": [{ "skill": "Rust", "confidence": 0.8 }] }
        },
        "video_analysis": {
            "technical_knowledge_score": 0.8,
            "communication_score": 0.8,
            "logical_reasoning_score": 0.8
        },
        "code_analysis": {
            "correctness_score": 0.9,
            "time_complexity_score": 0.9,
            "space_complexity_score": 0.9,
            "code_style_score": 0.9
        },
        "test_success_rate": 0.9,
        "managerial_analysis": {
            "leadership_score": 0.7,
            "behavior_score": 0.7,
            "cultural_fit_score": 0.7,
            "decision_making_score": 0.7
        }
    }))
    .unwrap();

    let evaluation = service.evaluate_candidate(request).await.unwrap();

    let phases: Vec<Phase> = evaluation.phases.iter().map(|p| p.phase).collect();
    assert_eq!(phases, vec![Phase::Profile, Phase::Video, Phase::Coding, Phase::Managerial]);
    assert_eq!(evaluation.degraded_phases().count(), 0);

    let expected = 0.85 * 0.2 + 0.8 * 0.3 + 0.9 * 0.4 + 0.7 * 0.1;
    let final_score = &evaluation.final_score;
    assert!((final_score.overall_candidate_score - expected).abs() < 1e-9);
    assert_eq!(final_score.assessment, Assessment::Strong);
    assert_eq!(evaluation.candidate_id.as_deref(), Some("c-17"));
}

#[tokio::test]
async fn empty_request_scores_zero() {
    let (service, _) = service("", None);
    let evaluation = service
        .evaluate_candidate(CandidateEvaluationRequest::default())
        .await
        .unwrap();

    assert_eq!(evaluation.final_score.overall_candidate_score, 0.0);
    assert_eq!(evaluation.final_score.assessment, Assessment::BelowAverage);
    assert!(evaluation.skill_match.is_none());
}

#[tokio::test]
async fn github_profile_is_fetched_without_forks() {
    let base = github_stub().await;
    let github = GithubService::with_base_url(Client::new(), &base, None);

    let profile = github.fetch_profile("ada").await.unwrap();

    assert_eq!(profile.name.as_deref(), Some("Ada"));
    assert_eq!(profile.followers, Some(10));
    assert_eq!(profile.profile_readme, "# Ada\nI write Rust");
    assert_eq!(profile.repositories.len(), 1);
    assert_eq!(profile.repositories[0].name, "engine");
    assert_eq!(profile.repositories[0].stars, 12);
}

#[tokio::test]
async fn unknown_github_user_is_an_error() {
    let base = github_stub().await;
    let github = GithubService::with_base_url(Client::new(), &base, None);

    assert!(github.fetch_profile("nobody").await.is_err());
}

#[tokio::test]
async fn github_url_is_analyzed_into_the_profile_phase() {
    let base = github_stub().await;
    let (service, chat) = service_with_github(
        &base,
        "",
        Some(json!({
            "overall_github_score": 0.8,
            "identified_skills": [{ "skill": "Rust", "confidence": 0.9 }]
        })),
    );
    let request: CandidateEvaluationRequest = serde_json::from_value(json!({
        "github_url": "https://github.com/ada",
        "job_skills": { "essential_skills": [{ "skill": "rust" }] }
    }))
    .unwrap();

    let evaluation = service.evaluate_candidate(request).await.unwrap();

    let profile = &evaluation.phases[0];
    assert_eq!(profile.phase, Phase::Profile);
    assert!(!profile.is_degraded());
    assert!((profile.score - 0.8).abs() < 1e-9);
    assert_eq!(profile.breakdown["github_score"], 0.8);
    assert_eq!(evaluation.skill_match.unwrap().essential_match_score, 1.0);

    let prompts = chat.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    let user_prompt = prompts[0]["messages"][1]["content"].as_str().unwrap();
    assert!(user_prompt.contains("engine"));
    assert!(user_prompt.contains("I write Rust"));
    assert!(!user_prompt.contains("forked-lib"));
}

#[tokio::test]
async fn resume_text_is_parsed_into_the_profile_phase() {
    let (service, chat) = service(
        "",
        Some(json!({
            "name": "Ada Lovelace",
            "identified_skills": [
                { "skill": "Rust", "confidence": 0.8 },
                { "skill": "SQL", "confidence": 0.6 }
            ]
        })),
    );
    let request: CandidateEvaluationRequest = serde_json::from_value(json!({
        "resume_text": "Ada Lovelace. Rust and SQL."
    }))
    .unwrap();

    let evaluation = service.evaluate_candidate(request).await.unwrap();

    let profile = &evaluation.phases[0];
    assert!(!profile.is_degraded());
    assert!((profile.breakdown["resume_score"] - 0.7).abs() < 1e-9);
    assert!((profile.score - 0.7).abs() < 1e-9);
    assert_eq!(chat.prompts.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn failed_resume_parse_degrades_only_profile() {
    let (service, _) = service("", None);
    let request: CandidateEvaluationRequest = serde_json::from_value(json!({
        "resume_text": "Ada Lovelace",
        "video_analysis": { "communication_score": 1.0 }
    }))
    .unwrap();

    let evaluation = service.evaluate_candidate(request).await.unwrap();

    let degraded: Vec<Phase> = evaluation.degraded_phases().map(|p| p.phase).collect();
    assert_eq!(degraded, vec![Phase::Profile]);
    assert!(evaluation.phases[0].error.as_deref().unwrap().contains("503"));
    assert!((evaluation.phases[1].score - 0.3).abs() < 1e-9);
}
