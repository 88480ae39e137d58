use recruitment_scoring::{
    config::Config, dto::evaluation_dto::CandidateEvaluationRequest, AppState,
};
use std::env;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Usage: `recruitment-scoring [request.json]`. Reads stdin without a path.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    let state = AppState::new(config)?;

    let raw = match env::args().nth(1) {
        Some(path) => tokio::fs::read_to_string(&path).await?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let request: CandidateEvaluationRequest = serde_json::from_str(&raw)?;
    let evaluation = state.evaluation_service.evaluate_candidate(request).await?;

    info!(
        assessment = %evaluation.final_score.assessment,
        degraded = evaluation.degraded_phases().count(),
        "evaluation complete"
    );
    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}
