use std::env;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Worker endpoint configuration, when one is configured at all.
    pub worker: Option<WorkerConfig>,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// HTTP request configuration.
    pub request: RequestConfig,
}

/// AI worker endpoint configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    /// Base URL of the worker service.
    pub base_url: String,
    /// Optional bearer credential sent with every worker call.
    pub api_key: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Human-readable output.
    Pretty,
    /// Newline-delimited JSON output.
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Per-request timeout in milliseconds. A timed-out call surfaces as a
    /// network-class failure; there are no retries.
    pub timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The worker endpoint is optional at load time: operations that need it
    /// report a configuration failure when they run, before mutating any
    /// state.
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let worker = env::var("WORKER_URL")
            .or_else(|_| env::var("PUBLIC_WORKER_URL"))
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|base_url| WorkerConfig {
                base_url,
                api_key: env::var("WORKER_API_KEY").ok(),
            });

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30000),
        };

        Ok(Config {
            worker,
            logging,
            request,
        })
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout_ms: 30000 }
    }
}
