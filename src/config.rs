use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Lexiguard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,lexiguard=debug".to_string()
}

/// Get the application data directory (~/Lexiguard/)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Lexiguard")
}

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Gemini API key. Empty key means every inference call will fail
    /// with an auth error, which the pipeline records as a failed document.
    pub gemini_api_key: String,
    /// Base URL of the Gemini REST API. Overridable for tests.
    pub gemini_base_url: String,
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Directory holding the SQLite database and uploaded files.
    pub data_dir: PathBuf,
    /// When set, error responses include the underlying failure detail.
    pub debug: bool,
    /// Hard timeout on each inference HTTP call, in seconds.
    pub inference_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
            bind_addr: std::env::var("LEXIGUARD_BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8700".into()),
            data_dir: std::env::var("LEXIGUARD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| app_data_dir()),
            debug: std::env::var("LEXIGUARD_DEBUG")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            inference_timeout_secs: std::env::var("LEXIGUARD_INFERENCE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("lexiguard.db")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Lexiguard"));
    }

    #[test]
    fn database_and_uploads_under_data_dir() {
        let config = AppConfig {
            gemini_api_key: String::new(),
            gemini_base_url: "http://localhost:1".into(),
            bind_addr: "127.0.0.1:0".into(),
            data_dir: PathBuf::from("/tmp/lexi-test"),
            debug: false,
            inference_timeout_secs: 300,
        };
        assert!(config.database_path().starts_with(&config.data_dir));
        assert!(config.uploads_dir().starts_with(&config.data_dir));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
