//! medextract server binary.
//!
//! Startup order: tracing, config from env, collaborator construction
//! (OCR engine, backend clients) producing the extraction engine, then the
//! axum listener. Collaborators are built on the blocking pool because the
//! backend clients are blocking HTTP clients.

use tracing_subscriber::EnvFilter;

use medextract::api::{extraction_router, ApiContext};
use medextract::backends::{GeminiExtractor, OllamaExtractor, RuleBasedExtractor};
use medextract::config::{self, ServiceConfig};
use medextract::ocr::DocumentRecognizer;
use medextract::pipeline::ExtractionEngine;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let service_config = ServiceConfig::from_env();
    tracing::info!(
        "{} starting v{}",
        config::SERVICE_NAME,
        config::APP_VERSION
    );

    let bind_addr = service_config.bind_addr;
    let engine = tokio::task::spawn_blocking(move || build_engine(&service_config))
        .await
        .expect("engine initialization task failed");

    let app = extraction_router(ApiContext::new(engine));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("failed to bind listener");
    tracing::info!(addr = %bind_addr, "listening");

    axum::serve(listener, app).await.expect("server error");
}

/// Construct all collaborators and probe the ones that can be probed, so
/// misconfiguration shows up in the startup log instead of on request N.
fn build_engine(service_config: &ServiceConfig) -> ExtractionEngine {
    #[cfg(feature = "ocr")]
    let recognizer = match DocumentRecognizer::new(&service_config.tessdata_dir) {
        Ok(recognizer) => recognizer,
        Err(err) => {
            tracing::error!(error = %err, "OCR engine initialization failed");
            std::process::exit(1);
        }
    };
    #[cfg(not(feature = "ocr"))]
    let recognizer = {
        tracing::warn!("built without the `ocr` feature: image OCR disabled, PDF text layers only");
        DocumentRecognizer::new()
    };

    let ollama = OllamaExtractor::new(
        &service_config.ollama_base_url,
        &service_config.ollama_model,
        service_config.ollama_timeout_secs,
    );
    match ollama.is_model_available() {
        Ok(true) => tracing::info!(model = %service_config.ollama_model, "Ollama model available"),
        Ok(false) => tracing::warn!(
            model = %service_config.ollama_model,
            "Ollama model not pulled: local LLM requests will fail until it is"
        ),
        Err(err) => tracing::warn!(
            error = %err,
            "Ollama unreachable at startup: local LLM requests will fail until it is running"
        ),
    }

    let gemini = GeminiExtractor::new(
        service_config.gemini_api_key.clone(),
        &service_config.gemini_model,
        service_config.gemini_timeout_secs,
    );
    if !gemini.has_api_key() {
        tracing::warn!("GEMINI_API_KEY not set: cloud backend requests will fail");
    }

    ExtractionEngine::new(
        Box::new(recognizer),
        Box::new(RuleBasedExtractor::new()),
        Box::new(ollama),
        Box::new(gemini),
    )
}
