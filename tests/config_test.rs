use recruitment_scoring::config::{Config, DEFAULT_JUDGE_API_URL, DEFAULT_OPENAI_MODEL};
use recruitment_scoring::error::Error;
use std::env;
use std::time::Duration;

const VARS: [&str; 12] = [
    "JUDGE0_API_URL",
    "JUDGE0_POLL_INTERVAL_MS",
    "JUDGE0_MAX_POLL_ATTEMPTS",
    "PROFILE_WEIGHT",
    "VIDEO_INTERVIEW_WEIGHT",
    "CODING_CHALLENGE_WEIGHT",
    "MANAGERIAL_ROUND_WEIGHT",
    "OPENAI_MODEL",
    "CULTURAL_VALUE_ALIGNMENT_WEIGHT",
    "CULTURAL_COMMUNICATION_STYLE_WEIGHT",
    "CULTURAL_TEAM_COLLABORATION_WEIGHT",
    "CULTURAL_ADAPTABILITY_WEIGHT",
];

fn clear() {
    for var in VARS {
        env::remove_var(var);
    }
}

// Environment variables are process-wide, so every scenario runs in this one test.
#[test]
fn config_from_env() {
    clear();
    let config = Config::from_env().unwrap();
    assert_eq!(config.judge.api_url, DEFAULT_JUDGE_API_URL);
    assert_eq!(config.judge.poll_interval, Duration::from_secs(1));
    assert_eq!(config.judge.max_poll_attempts, 10);
    assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
    assert_eq!(config.scoring.weights.coding, 0.4);
    assert_eq!(config.scoring.cultural_fit_weights.value_alignment, 0.4);

    env::set_var("JUDGE0_API_URL", "http://judge.local:2358");
    env::set_var("JUDGE0_POLL_INTERVAL_MS", "250");
    env::set_var("PROFILE_WEIGHT", "0.25");
    env::set_var("VIDEO_INTERVIEW_WEIGHT", "0.25");
    env::set_var("CODING_CHALLENGE_WEIGHT", "0.25");
    env::set_var("MANAGERIAL_ROUND_WEIGHT", "0.25");
    let config = Config::from_env().unwrap();
    assert_eq!(config.judge.api_url, "http://judge.local:2358");
    assert_eq!(config.judge.poll_interval, Duration::from_millis(250));
    assert_eq!(config.scoring.weights.managerial, 0.25);

    env::set_var("CODING_CHALLENGE_WEIGHT", "0.5");
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));

    env::set_var("CODING_CHALLENGE_WEIGHT", "lots");
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));

    env::set_var("CODING_CHALLENGE_WEIGHT", "0.25");
    env::set_var("JUDGE0_MAX_POLL_ATTEMPTS", "0");
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));
    env::remove_var("JUDGE0_MAX_POLL_ATTEMPTS");

    env::set_var("CULTURAL_TEAM_COLLABORATION_WEIGHT", "0.6");
    let config = Config::from_env().unwrap();
    assert_eq!(config.scoring.cultural_fit_weights.team_collaboration, 0.6);

    env::set_var("CULTURAL_VALUE_ALIGNMENT_WEIGHT", "-3");
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));

    env::set_var("CULTURAL_VALUE_ALIGNMENT_WEIGHT", "0");
    env::set_var("CULTURAL_COMMUNICATION_STYLE_WEIGHT", "0");
    env::set_var("CULTURAL_TEAM_COLLABORATION_WEIGHT", "0");
    env::set_var("CULTURAL_ADAPTABILITY_WEIGHT", "0");
    assert!(matches!(Config::from_env(), Err(Error::Config(_))));

    clear();
}
