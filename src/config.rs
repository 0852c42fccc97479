use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const SERVICE_NAME: &str = "medextract";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound on a multipart upload (single request, all parts).
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    "medextract=info,tower_http=info".to_string()
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub ollama_timeout_secs: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_timeout_secs: u64,
    /// Directory containing Tesseract traineddata files (`ocr` feature).
    pub tessdata_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            ollama_base_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.2".to_string(),
            ollama_timeout_secs: 300,
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_timeout_secs: 120,
            tessdata_dir: PathBuf::from("/usr/share/tesseract-ocr/5/tessdata"),
        }
    }
}

impl ServiceConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset. Invalid values are logged and replaced
    /// by the default rather than aborting startup.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = match std::env::var("MEDEXTRACT_BIND_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid MEDEXTRACT_BIND_ADDR, using default");
                defaults.bind_addr
            }),
            Err(_) => defaults.bind_addr,
        };

        Self {
            bind_addr,
            ollama_base_url: env_or("OLLAMA_BASE_URL", defaults.ollama_base_url),
            ollama_model: env_or("OLLAMA_MODEL", defaults.ollama_model),
            ollama_timeout_secs: env_u64_or("OLLAMA_TIMEOUT_SECS", defaults.ollama_timeout_secs),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: env_or("GEMINI_MODEL", defaults.gemini_model),
            gemini_timeout_secs: env_u64_or("GEMINI_TIMEOUT_SECS", defaults.gemini_timeout_secs),
            tessdata_dir: std::env::var("TESSDATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.tessdata_dir),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}

fn env_u64_or(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "invalid integer, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_service() {
        let config = ServiceConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
        assert_eq!(config.ollama_model, "llama3.2");
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }

    #[test]
    fn service_name_is_medextract() {
        assert_eq!(SERVICE_NAME, "medextract");
    }
}
