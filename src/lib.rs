pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::services::evaluation_service::EvaluationService;
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub evaluation_service: EvaluationService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        let evaluation_service = EvaluationService::from_config(&config, http_client);

        Ok(Self {
            config,
            evaluation_service,
        })
    }
}
