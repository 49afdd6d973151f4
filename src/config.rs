use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3333/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ADMIN_COOKIE: &str = "access_token";

/// Runtime configuration, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the listings API
    pub api_base_url: Url,
    pub http_timeout: Duration,
    pub user_agent: String,
    /// Cookie that carries the admin access token
    pub admin_cookie: String,
    /// Bearer token for admin commands, if any
    pub admin_token: Option<String>,
}

impl Config {
    /// Load from process environment, after reading `.env` if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("LISTINGS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self {
            api_base_url: Url::parse(&raw_url)
                .with_context(|| format!("Invalid LISTINGS_API_URL: {}", raw_url))?,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("listing-filters/", env!("CARGO_PKG_VERSION")).to_string(),
            admin_cookie: DEFAULT_ADMIN_COOKIE.to_string(),
            admin_token: None,
        };

        if let Some(raw) = lookup("LISTINGS_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid LISTINGS_HTTP_TIMEOUT_SECS: {}", raw))?;
            config.http_timeout = Duration::from_secs(secs);
        }

        if let Some(agent) = lookup("LISTINGS_USER_AGENT").filter(|v| !v.is_empty()) {
            config.user_agent = agent;
        }

        if let Some(cookie) = lookup("LISTINGS_ADMIN_COOKIE").filter(|v| !v.is_empty()) {
            config.admin_cookie = cookie;
        }

        config.admin_token = lookup("LISTINGS_ADMIN_TOKEN").filter(|v| !v.trim().is_empty());

        Ok(config)
    }
}
