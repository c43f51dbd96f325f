use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::messages::Locale;

const DEFAULT_DELAY_MS: u64 = 60_000;
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_STATE_DB: &str = "./kv.db";

#[derive(Clone)]
pub struct AppConfig {
    pub prusalink_api_url: String,
    pub prusalink_api_key: String,
    pub webhook_url: String,
    pub delay: Duration,
    pub http_timeout: Duration,
    pub state_db_path: PathBuf,
    pub locale: Locale,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Missing required env var: {key}"))
        };

        let prusalink_api_url = get("PRUSALINK_API_URL")?;
        let prusalink_api_key = get("PRUSALINK_API_KEY")?;
        let webhook_url = get("WEBHOOK_URL")?;

        let delay_ms = millis(&lookup, "DELAY_MS", DEFAULT_DELAY_MS)?;
        let http_timeout_ms = millis(&lookup, "HTTP_TIMEOUT_MS", DEFAULT_HTTP_TIMEOUT_MS)?;

        let state_db_path = lookup("STATE_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATE_DB.to_string())
            .into();

        let locale = match lookup("NOTIFY_LOCALE") {
            Some(v) if !v.trim().is_empty() => v.trim().parse::<Locale>()?,
            _ => Locale::default(),
        };

        // fail fast, fail loud
        if !is_http(&prusalink_api_url) {
            bail!("PRUSALINK_API_URL must start with http:// or https://");
        }
        if !is_http(&webhook_url) {
            bail!("WEBHOOK_URL must start with http:// or https://");
        }

        Ok(Self {
            prusalink_api_url,
            prusalink_api_key,
            webhook_url,
            delay: Duration::from_millis(delay_ms),
            http_timeout: Duration::from_millis(http_timeout_ms),
            state_db_path,
            locale,
        })
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("prusalink_api_url", &self.prusalink_api_url)
            .field("prusalink_api_key", &"<redacted>")
            .field("webhook_url", &self.webhook_url)
            .field("delay", &self.delay)
            .field("http_timeout", &self.http_timeout)
            .field("state_db_path", &self.state_db_path)
            .field("locale", &self.locale)
            .finish()
    }
}

fn millis<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key).filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };
    let ms: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a whole number of milliseconds, got {raw:?}"))?;
    if ms == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(ms)
}

fn is_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
