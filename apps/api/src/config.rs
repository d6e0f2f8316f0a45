use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which backend writes the prose summary of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryBackend {
    Llm,
    Template,
}

impl FromStr for SummaryBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" => Ok(SummaryBackend::Llm),
            "template" => Ok(SummaryBackend::Template),
            other => bail!("SUMMARY_BACKEND must be 'llm' or 'template', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub candidates_csv: String,
    pub port: u16,
    pub rust_log: String,
    pub summary_backend: SummaryBackend,
    /// How many ranked candidates the summarizer sees.
    pub summary_top_n: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let summary_top_n = or_default("SUMMARY_TOP_N", "5")
            .parse::<usize>()
            .context("SUMMARY_TOP_N must be a positive integer")?;
        if summary_top_n == 0 {
            bail!("SUMMARY_TOP_N must be at least 1");
        }

        Ok(Config {
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            candidates_csv: or_default("CANDIDATES_CSV", "data/candidates.csv"),
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
            summary_backend: or_default("SUMMARY_BACKEND", "llm").parse()?,
            summary_top_n,
        })
    }
}
