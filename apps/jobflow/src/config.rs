use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_SERPER_URL: &str = "https://google.serper.dev";
const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration loaded from environment variables.
/// Fails at startup if a required credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub serper_api_key: String,
    pub serper_url: String,
    pub gemini_api_key: String,
    pub gemini_url: String,
    pub search_timeout: Duration,
    pub generation_timeout: Duration,
    /// Total attempts per generation call, including the first.
    pub generation_max_attempts: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            serper_api_key: require_env("SERPER_API_KEY")?,
            serper_url: std::env::var("SERPER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SERPER_URL.to_string()),
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_URL.to_string()),
            search_timeout: Duration::from_secs(
                parse_env_or("SEARCH_TIMEOUT_SECS", 30)
                    .context("SEARCH_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            generation_timeout: Duration::from_secs(
                parse_env_or("GENERATION_TIMEOUT_SECS", 120)
                    .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            generation_max_attempts: parse_env_or("GENERATION_MAX_ATTEMPTS", 3)
                .context("GENERATION_MAX_ATTEMPTS must be a positive integer")?
                .max(1),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Upper bound for the whole RESEARCH call. The search client's own timeout
    /// fires first and degrades to the placeholder; this only catches a hung adapter.
    pub fn search_deadline(&self) -> Duration {
        self.search_timeout + Duration::from_secs(5)
    }

    /// Upper bound for one posting's tailoring, covering every attempt and its backoff.
    pub fn tailor_deadline(&self) -> Duration {
        let attempts = self.generation_max_attempts.max(1);
        let backoff_secs: u64 = (0..attempts - 1).map(|a| 1u64 << a.min(16)).sum();
        self.generation_timeout * attempts + Duration::from_secs(backoff_secs)
    }
}

/// Per-run settings that come from the command line rather than the environment.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub applications_dir: PathBuf,
}

impl RunSettings {
    pub fn ledger_path(&self) -> PathBuf {
        self.applications_dir.join("jobs.csv")
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            applications_dir: PathBuf::from("applications"),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(&raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("could not parse '{raw}'"))
}
