use std::env;

use async_openai::config::OpenAIConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Model endpoint used by the tutoring chat.
    pub openai_config: OpenAIConfig,
    pub model_id: String,
    /// Base URL of the challenge backend.
    pub api_url: String,
    pub user_id: u32,
    pub show_timestamps: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingApiKey,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(f, "NALA_MODEL_API_KEY is not set"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from environment. Returns an error if the model API
/// key is missing; everything else has a default.
pub fn load() -> Result<Config, ConfigError> {
    let base_url = env::var("NALA_MODEL_BASE_URL")
        .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string());

    let api_key = env::var("NALA_MODEL_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;

    let model_id =
        env::var("NALA_MODEL").unwrap_or_else(|_| "anthropic/claude-haiku-4.5".to_string());

    let api_url = env::var("NALA_API_URL").unwrap_or_else(|_| "http://localhost:5001".to_string());

    let user_id = env::var("NALA_USER_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);

    let show_timestamps = env::var("NALA_SHOW_TIMESTAMPS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let openai_config = OpenAIConfig::new()
        .with_api_base(base_url)
        .with_api_key(api_key);

    Ok(Config {
        openai_config,
        model_id,
        api_url,
        user_id,
        show_timestamps,
    })
}
