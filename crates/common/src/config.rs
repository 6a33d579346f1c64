use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub github: GithubConfig,
    pub openai: OpenAiConfig,
    pub generator: GeneratorConfig,
    pub pipeline: PipelineConfig,
    pub api: ApiConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(".")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default)]
    pub test_admin_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    pub token: String,
    pub user_agent: String,
    #[serde(default = "GithubConfig::default_page_size")]
    pub page_size: u32,
    #[serde(default = "GithubConfig::default_max_pages")]
    pub max_pages: u32,
}

impl GithubConfig {
    const fn default_page_size() -> u32 {
        100
    }

    // Safety ceiling for the repository pagination loop: an upstream that
    // never returns an empty page must become a fault, not an infinite loop.
    const fn default_max_pages() -> u32 {
        1000
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default = "OpenAiConfig::default_base_url")]
    pub base_url: String,
}

impl OpenAiConfig {
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "GeneratorConfig::default_primary_model")]
    pub primary_model: String,
    #[serde(default = "GeneratorConfig::default_fallback_model")]
    pub fallback_model: String,
    #[serde(default = "GeneratorConfig::default_image_model")]
    pub image_model: String,
    #[serde(default = "GeneratorConfig::default_image_size")]
    pub image_size: String,
    #[serde(default = "GeneratorConfig::default_image_quality")]
    pub image_quality: String,
}

impl GeneratorConfig {
    fn default_primary_model() -> String {
        "gpt-4".to_string()
    }

    fn default_fallback_model() -> String {
        "gpt-3.5-turbo".to_string()
    }

    fn default_image_model() -> String {
        "dall-e-3".to_string()
    }

    fn default_image_size() -> String {
        "1024x1024".to_string()
    }

    fn default_image_quality() -> String {
        "standard".to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "PipelineConfig::default_run_timeout_secs")]
    pub run_timeout_secs: u64,
}

impl PipelineConfig {
    // A full run makes up to 22 paid model calls; leave generous headroom.
    const fn default_run_timeout_secs() -> u64 {
        600
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "ObservabilityConfig::default_metrics_path")]
    pub metrics_path: String,
}

impl ObservabilityConfig {
    fn default_metrics_path() -> String {
        "/metrics".to_string()
    }
}
