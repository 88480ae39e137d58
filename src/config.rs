use crate::error::{Error, Result};
use crate::models::score::{CulturalFitWeights, ScoringWeights};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_JUDGE_API_URL: &str = "https://api.judge0.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub github_token: Option<String>,
    pub judge: JudgeConfig,
    pub scoring: ScoringConfig,
}

/// Connection and polling settings for the remote code judge.
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_JUDGE_API_URL.to_string(),
            api_key: None,
            poll_interval: Duration::from_secs(1),
            max_poll_attempts: 10,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub cultural_fit_weights: CulturalFitWeights,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let judge_defaults = JudgeConfig::default();
        let judge = JudgeConfig {
            api_url: get_env_or("JUDGE0_API_URL", DEFAULT_JUDGE_API_URL),
            api_key: get_env_opt("JUDGE0_API_KEY"),
            poll_interval: get_env_parse_opt::<u64>("JUDGE0_POLL_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(judge_defaults.poll_interval),
            max_poll_attempts: get_env_parse_opt("JUDGE0_MAX_POLL_ATTEMPTS")?
                .unwrap_or(judge_defaults.max_poll_attempts),
        };
        if judge.max_poll_attempts == 0 {
            return Err(Error::Config(
                "JUDGE0_MAX_POLL_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        let base = ScoringWeights::default();
        let weights = ScoringWeights::new(
            get_env_parse_opt("PROFILE_WEIGHT")?.unwrap_or(base.profile),
            get_env_parse_opt("VIDEO_INTERVIEW_WEIGHT")?.unwrap_or(base.video),
            get_env_parse_opt("CODING_CHALLENGE_WEIGHT")?.unwrap_or(base.coding),
            get_env_parse_opt("MANAGERIAL_ROUND_WEIGHT")?.unwrap_or(base.managerial),
        )
        .map_err(|e| Error::Config(format!("Invalid scoring weights: {}", e)))?;

        let cultural = CulturalFitWeights::default();
        let cultural_fit_weights = CulturalFitWeights {
            value_alignment: get_env_parse_opt("CULTURAL_VALUE_ALIGNMENT_WEIGHT")?
                .unwrap_or(cultural.value_alignment),
            communication_style: get_env_parse_opt("CULTURAL_COMMUNICATION_STYLE_WEIGHT")?
                .unwrap_or(cultural.communication_style),
            team_collaboration: get_env_parse_opt("CULTURAL_TEAM_COLLABORATION_WEIGHT")?
                .unwrap_or(cultural.team_collaboration),
            adaptability: get_env_parse_opt("CULTURAL_ADAPTABILITY_WEIGHT")?
                .unwrap_or(cultural.adaptability),
        };
        cultural_fit_weights
            .check()
            .map_err(|e| Error::Config(format!("Invalid cultural fit weights: {}", e)))?;

        Ok(Self {
            openai_api_key: get_env_opt("OPENAI_API_KEY"),
            openai_model: get_env_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            github_token: get_env_opt("GITHUB_TOKEN"),
            judge,
            scoring: ScoringConfig {
                weights,
                cultural_fit_weights,
            },
        })
    }

    pub fn require_openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| Error::Config("Missing environment variable: OPENAI_API_KEY".to_string()))
    }
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or(name: &str, default: &str) -> String {
    get_env_opt(name).unwrap_or_else(|| default.to_string())
}

fn get_env_parse_opt<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(None),
    }
}
