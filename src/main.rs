//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run HTTP or terminal UI.
//! No business logic here.

use dotenv::dotenv;
use session_insight::adapters::ai::{
    HfModels, HuggingFaceAdapter, MockClassifier, MockSummarizer, MockTranscriber,
};
use session_insight::adapters::http::{AppState, create_router};
use session_insight::adapters::persistence::SqliteRepo;
use session_insight::adapters::ui::tui::TuiInputPort;
use session_insight::ports::{
    ClassifierPort, InputPort, SessionStorePort, SummarizerPort, TranscriberPort,
};
use session_insight::shared::config::AppConfig;
use session_insight::usecases::{InsightExtractor, SessionService, SessionSummarizer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let data_path = PathBuf::from(cfg.data_dir_or_default());
    let data_dir_abs = data_path
        .canonicalize()
        .unwrap_or_else(|_| data_path.clone());
    info!(path = %data_dir_abs.display(), "data directory");

    // --- Session store ---
    let repo = SqliteRepo::connect(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?;
    info!(path = %repo.db_path().display(), "session database");
    let store: Arc<dyn SessionStorePort> = Arc::new(repo);

    // --- Model adapters: constructed once, shared by every request ---
    let (summarizer, classifier, transcriber): (
        Arc<dyn SummarizerPort>,
        Arc<dyn ClassifierPort>,
        Arc<dyn TranscriberPort>,
    ) = if cfg.is_hf_configured() {
        let models = HfModels {
            summarizer: cfg.summarizer_model_or_default(),
            classifier: cfg.classifier_model_or_default(),
            transcriber: cfg.transcriber_model_or_default(),
        };
        info!(
            url = %cfg.hf_api_url_or_default(),
            summarizer = %models.summarizer,
            classifier = %models.classifier,
            transcriber = %models.transcriber,
            timeout_secs = cfg.request_timeout_secs_or_default(),
            "model inference enabled"
        );
        let hf = Arc::new(
            HuggingFaceAdapter::new(
                cfg.hf_api_url_or_default(),
                cfg.hf_api_token.clone(),
                models,
                Duration::from_secs(cfg.request_timeout_secs_or_default()),
            )
            .map_err(|e| anyhow::anyhow!("{}", e))?,
        );
        (
            hf.clone() as Arc<dyn SummarizerPort>,
            hf.clone() as Arc<dyn ClassifierPort>,
            hf as Arc<dyn TranscriberPort>,
        )
    } else {
        let latency = cfg.mock_latency_ms_or_default();
        warn!(latency_ms = latency, "HF_API_TOKEN not set, using mock model adapters");
        (
            Arc::new(MockSummarizer::new().with_delay(latency)) as Arc<dyn SummarizerPort>,
            Arc::new(MockClassifier::new().with_delay(latency)) as Arc<dyn ClassifierPort>,
            Arc::new(MockTranscriber::new()) as Arc<dyn TranscriberPort>,
        )
    };

    // --- Services ---
    let extractor = Arc::new(InsightExtractor::new(classifier));
    let session_summarizer = Arc::new(SessionSummarizer::new(summarizer, extractor));
    let sessions = Arc::new(SessionService::new(session_summarizer, transcriber, store));
    let dashboard_limit = cfg.dashboard_limit_or_default();

    // --- Run (terminal menu or HTTP server) ---
    if cfg.is_interactive() {
        session_insight::adapters::ui::init_ui();
        let input_port: Arc<dyn InputPort> =
            Arc::new(TuiInputPort::new(Arc::clone(&sessions), dashboard_limit));
        input_port
            .run()
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        return Ok(());
    }

    let app = create_router(AppState::new(sessions, dashboard_limit));
    let addr = cfg.bind_addr_or_default();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("bind {}: {}", addr, e))?;
    info!(addr = %addr, "HTTP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
    }
}
