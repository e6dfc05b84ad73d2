//! Config environment variable tests
//!
//! Verifies that Config::from_env() reads and applies environment variable
//! overrides. Config::from_env() also loads from a .env file via dotenvy, so
//! these tests focus on override behavior.
//!
//! Tests use #[serial] to prevent race conditions with shared env vars.

use diagramcraft::config::{Config, LogFormat};
use serial_test::serial;
use std::env;

fn clear_worker_vars() {
    env::remove_var("WORKER_URL");
    env::remove_var("PUBLIC_WORKER_URL");
    env::remove_var("WORKER_API_KEY");
}

#[test]
#[serial]
fn test_config_loads_without_any_worker_endpoint() {
    clear_worker_vars();

    let config = Config::from_env().unwrap();
    // The endpoint is optional at load time; regeneration reports the
    // missing configuration when it runs.
    assert!(config.worker.is_none());
}

#[test]
#[serial]
fn test_config_reads_worker_url() {
    clear_worker_vars();
    env::set_var("WORKER_URL", "https://worker.example.com");
    env::set_var("WORKER_API_KEY", "secret-key");

    let config = Config::from_env().unwrap();
    let worker = config.worker.expect("worker config should be present");
    assert_eq!(worker.base_url, "https://worker.example.com");
    assert_eq!(worker.api_key.as_deref(), Some("secret-key"));

    clear_worker_vars();
}

#[test]
#[serial]
fn test_config_falls_back_to_public_worker_url() {
    clear_worker_vars();
    env::set_var("PUBLIC_WORKER_URL", "https://public.example.com");

    let config = Config::from_env().unwrap();
    let worker = config.worker.expect("worker config should be present");
    assert_eq!(worker.base_url, "https://public.example.com");
    assert_eq!(worker.api_key, None);

    clear_worker_vars();
}

#[test]
#[serial]
fn test_config_request_timeout_override() {
    env::set_var("REQUEST_TIMEOUT_MS", "12000");

    let config = Config::from_env().unwrap();
    assert_eq!(config.request.timeout_ms, 12000);

    env::remove_var("REQUEST_TIMEOUT_MS");
    let config = Config::from_env().unwrap();
    assert_eq!(config.request.timeout_ms, 30000);
}

#[test]
#[serial]
fn test_config_json_log_format() {
    env::set_var("LOG_FORMAT", "json");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);

    env::set_var("LOG_FORMAT", "pretty");
    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Pretty);
    env::remove_var("LOG_FORMAT");
}

#[test]
#[serial]
fn test_config_default_log_level() {
    env::remove_var("LOG_LEVEL");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.level, "info");
}
