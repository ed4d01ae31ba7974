//! Application configuration. Model endpoints, paths, server address.

use serde::Deserialize;

/// Dashboard page size cap.
pub const DEFAULT_DASHBOARD_LIMIT: u32 = 1024;

pub const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_SUMMARIZER_MODEL: &str = "philschmid/bart-large-cnn-samsum";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "facebook/bart-large-mnli";
pub const DEFAULT_TRANSCRIBER_MODEL: &str = "openai/whisper-small";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub data_dir: Option<String>,

    /// Listen address for the HTTP server. Read from SESSION_INSIGHT_BIND_ADDR.
    #[serde(default)]
    pub bind_addr: Option<String>,

    /// Run the terminal menu instead of the HTTP server. Read from SESSION_INSIGHT_INTERACTIVE.
    #[serde(default)]
    pub interactive: Option<bool>,

    /// Max sessions shown on the dashboard (default 1024).
    #[serde(default)]
    pub dashboard_limit: Option<u32>,

    // ─────────────────────────────────────────────────────────────────────────
    // Model inference
    // ─────────────────────────────────────────────────────────────────────────
    /// Inference API token. Read from SESSION_INSIGHT_HF_API_TOKEN or HF_API_TOKEN.
    #[serde(default)]
    pub hf_api_token: Option<String>,

    /// Inference API base URL; model ids are appended.
    #[serde(default)]
    pub hf_api_url: Option<String>,

    #[serde(default)]
    pub summarizer_model: Option<String>,

    #[serde(default)]
    pub classifier_model: Option<String>,

    #[serde(default)]
    pub transcriber_model: Option<String>,

    /// Per-request timeout for model calls, in seconds (default 60).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Simulated model latency for the mock adapters, in milliseconds (default 0).
    #[serde(default)]
    pub mock_latency_ms: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("SESSION_INSIGHT").try_parsing(true));
        if let Ok(path) = std::env::var("SESSION_INSIGHT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // HF_API_TOKEN is read directly (no prefix) so an existing Hugging Face setup just works
        if cfg.hf_api_token.is_none() {
            cfg.hf_api_token = std::env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty());
        }
        Ok(cfg)
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    pub fn bind_addr_or_default(&self) -> String {
        self.bind_addr
            .clone()
            .unwrap_or_else(|| "127.0.0.1:5000".to_string())
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive.unwrap_or(false)
    }

    pub fn dashboard_limit_or_default(&self) -> u32 {
        self.dashboard_limit.unwrap_or(DEFAULT_DASHBOARD_LIMIT)
    }

    /// Returns true if a model API token is configured; otherwise mock adapters are used.
    pub fn is_hf_configured(&self) -> bool {
        self.hf_api_token.is_some()
    }

    pub fn hf_api_url_or_default(&self) -> String {
        self.hf_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_HF_API_URL.to_string())
    }

    pub fn summarizer_model_or_default(&self) -> String {
        self.summarizer_model
            .clone()
            .unwrap_or_else(|| DEFAULT_SUMMARIZER_MODEL.to_string())
    }

    pub fn classifier_model_or_default(&self) -> String {
        self.classifier_model
            .clone()
            .unwrap_or_else(|| DEFAULT_CLASSIFIER_MODEL.to_string())
    }

    pub fn transcriber_model_or_default(&self) -> String {
        self.transcriber_model
            .clone()
            .unwrap_or_else(|| DEFAULT_TRANSCRIBER_MODEL.to_string())
    }

    pub fn request_timeout_secs_or_default(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(60)
    }

    pub fn mock_latency_ms_or_default(&self) -> u64 {
        self.mock_latency_ms.unwrap_or(0)
    }
}
