// src/config.rs

use crate::core::locale::{Lang, LocaleStore};
use clap::Parser;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Command-line options. Each has an environment fallback.
#[derive(Debug, Parser)]
#[command(name = "vulnscan-dashboard")]
#[command(about = "Terminal dashboard for the vulnscan web service", long_about = None)]
pub struct Cli {
    /// Base URL of the scanning service's JSON API
    #[arg(long, env = "VULNSCAN_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Seconds between refresh cycles
    #[arg(long, env = "VULNSCAN_POLL_INTERVAL", default_value_t = 3)]
    pub interval: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "VULNSCAN_REQUEST_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Interface language (ru or en); remembered for later runs
    #[arg(long, env = "VULNSCAN_LANG")]
    pub lang: Option<Lang>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API base URL must use http or https, got '{0}'")]
    Scheme(String),

    #[error("{0} must be at least one second")]
    ZeroDuration(&'static str),
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base: Url,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    /// Language requested on the command line, overriding the stored one.
    pub lang: Option<Lang>,
    pub locale_store: Option<LocaleStore>,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let api_base = Url::parse(&cli.api_base).map_err(|source| ConfigError::BaseUrl {
            url: cli.api_base.clone(),
            source,
        })?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(ConfigError::Scheme(api_base.scheme().to_string()));
        }
        if cli.interval == 0 {
            return Err(ConfigError::ZeroDuration("interval"));
        }
        if cli.timeout == 0 {
            return Err(ConfigError::ZeroDuration("timeout"));
        }

        Ok(Self {
            api_base,
            poll_interval: Duration::from_secs(cli.interval),
            request_timeout: Duration::from_secs(cli.timeout),
            lang: cli.lang,
            locale_store: LocaleStore::default_location(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("vulnscan-dashboard").chain(args.iter().copied()))
    }

    #[test]
    fn explicit_arguments_are_validated() {
        let settings = Settings::from_cli(cli(&[
            "--api-base", "https://scanner.internal/api",
            "--interval", "5",
            "--timeout", "2",
            "--lang", "en",
        ]))
        .unwrap();
        assert_eq!(settings.api_base.as_str(), "https://scanner.internal/api");
        assert_eq!(settings.poll_interval, Duration::from_secs(5));
        assert_eq!(settings.request_timeout, Duration::from_secs(2));
        assert_eq!(settings.lang, Some(Lang::En));
    }

    #[test]
    fn rejects_bad_urls_and_zero_durations() {
        assert!(matches!(
            Settings::from_cli(cli(&["--api-base", "not a url"])),
            Err(ConfigError::BaseUrl { .. })
        ));
        assert!(matches!(
            Settings::from_cli(cli(&["--api-base", "ftp://x/api"])),
            Err(ConfigError::Scheme(_))
        ));
        assert!(matches!(
            Settings::from_cli(cli(&["--api-base", DEFAULT_API_BASE, "--interval", "0"])),
            Err(ConfigError::ZeroDuration("interval"))
        ));
    }

    #[test]
    fn unknown_language_is_a_parse_error() {
        let parsed = Cli::try_parse_from(["vulnscan-dashboard", "--lang", "de"]);
        assert!(parsed.is_err());
    }
}
