//! Command-line arguments.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use tootline_client::transport::HttpConfig;

use crate::ArgsSessionStore;

/// Tootline terminal client
#[derive(Parser, Debug, Clone)]
#[command(name = "tootline")]
#[command(about = "Terminal client for your Mastodon home timeline")]
#[command(version)]
pub struct Args {
    /// Mastodon instance, e.g. `mastodon.social`
    #[arg(long, env = "TOOTLINE_INSTANCE")]
    pub instance: Option<String>,

    /// OAuth access token with the `read:statuses` scope
    #[arg(long, env = "TOOTLINE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Posts per page (1-40)
    #[arg(long, default_value_t = 20)]
    pub page_limit: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log file; the terminal is used for the UI
    #[arg(long, default_value = "tootline.log")]
    pub log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// HTTP client configuration.
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            page_limit: self.page_limit,
            ..HttpConfig::default()
        }
    }

    /// Session source backed by `--instance` and `--token`.
    pub fn session_store(&self) -> ArgsSessionStore {
        ArgsSessionStore::new(self.instance.clone(), self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["tootline", "--instance", "example.social"]).unwrap();

        assert_eq!(args.page_limit, 20);
        assert_eq!(args.log_file, PathBuf::from("tootline.log"));
        assert_eq!(args.http_config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "tootline",
            "--token",
            "secret",
            "--page-limit",
            "40",
            "--timeout-secs",
            "5",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let config = args.http_config();
        assert_eq!(config.page_limit, 40);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.token.as_deref(), Some("secret"));
    }

    #[test]
    fn rejects_non_numeric_page_limit() {
        assert!(Args::try_parse_from(["tootline", "--page-limit", "many"]).is_err());
    }
}
