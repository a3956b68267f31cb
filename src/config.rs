// src/config.rs
// =============================================================================
// Configuration, loaded from environment variables (and a .env file, which
// main() loads first). Command-line flags override what is read here, and
// are applied before anything is parsed or validated.
//
// Variables:
// - SQUARES_API_URL       base URL of the dashboard API (default http://localhost:3000)
// - SQUARES_TOKEN         bearer token sent with every request (optional)
// - SQUARES_TIMEOUT_SECS  per-request timeout, 1..=300 (default 10)
// - SQUARES_SEQUENCING    "settled" (default) or "latest", see Sequencing
// - RUST_LOG              log filter (default warn)
// - LOG_FORMAT            "text" (default) or "json"
// =============================================================================

use crate::fetch::Sequencing;
use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
    pub sequencing: Sequencing,
    pub log_level: String,
    pub log_format: String,
}

/// Values given on the command line (--api-url, --token).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub token: Option<String>,
}

impl Overrides {
    /// The override for an environment key, if one was given.
    fn get(&self, key: &str) -> Option<String> {
        match key {
            "SQUARES_API_URL" => self.api_url.clone(),
            "SQUARES_TOKEN" => self.token.clone(),
            _ => None,
        }
    }

    /// Layers these overrides on top of another lookup.
    fn over<'a>(
        &'a self,
        lookup: impl Fn(&str) -> Option<String> + 'a,
    ) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| self.get(key).or_else(|| lookup(key))
    }
}

impl Config {
    pub fn from_env(overrides: &Overrides) -> Result<Self> {
        // A bad SQUARES_API_URL must not matter when --api-url replaces it,
        // so overrides go in before parsing
        Self::from_lookup(overrides.over(|key| env::var(key).ok()))
    }

    /// Builds a config from any key lookup, so tests don't touch the real
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("SQUARES_API_URL").unwrap_or_else(|| "http://localhost:3000".to_string());
        let api_url = parse_api_url(&api_url)?;

        let token = lookup("SQUARES_TOKEN").filter(|t| !t.trim().is_empty());

        let timeout_secs: u64 = match lookup("SQUARES_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("SQUARES_TIMEOUT_SECS must be a number, got '{}'", raw))?,
            None => 10,
        };

        let sequencing = match lookup("SQUARES_SEQUENCING").as_deref() {
            None | Some("settled") => Sequencing::LastSettled,
            Some("latest") => Sequencing::LatestIssued,
            Some(other) => bail!(
                "SQUARES_SEQUENCING must be 'settled' or 'latest', got '{}'",
                other
            ),
        };

        let config = Self {
            api_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
            sequencing,
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "warn".to_string()),
            log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let secs = self.timeout.as_secs();
        if !(1..=300).contains(&secs) {
            bail!("SQUARES_TIMEOUT_SECS must be between 1 and 300, got {}", secs);
        }

        if self.log_format != "text" && self.log_format != "json" {
            bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        Ok(())
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid API URL '{}'", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("API URL must be http or https, got '{}'", raw);
    }
    Ok(url)
}
