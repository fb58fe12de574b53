use crate::api::{DEFAULT_REFRESH_PATH, DEFAULT_TIMEOUT};
use clap::{Arg, ArgMatches, Command};
use std::time::Duration;

pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_TIMEOUT_SECONDS: &str = "timeout-seconds";
pub const ARG_REFRESH_PATH: &str = "refresh-path";

#[derive(Debug, Clone)]
pub struct Options {
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub refresh_path: String,
}

impl Options {
    /// Parse API client arguments from matches. The base URL stays optional here
    /// because commands that never touch the network do not need it.
    ///
    /// # Errors
    /// Returns an error if the timeout is zero.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let timeout = matches
            .get_one::<u64>(ARG_TIMEOUT_SECONDS)
            .copied()
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        if timeout.is_zero() {
            anyhow::bail!("--{ARG_TIMEOUT_SECONDS} must be greater than zero");
        }

        let refresh_path = matches
            .get_one::<String>(ARG_REFRESH_PATH)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REFRESH_PATH.to_string());

        Ok(Self {
            base_url: matches
                .get_one::<String>(ARG_API_BASE_URL)
                .cloned()
                .filter(|v| !v.trim().is_empty()),
            timeout,
            refresh_path,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long(ARG_API_BASE_URL)
                .help("API base URL, example: https://api.coursedesk.dev/api/v1")
                .env("COURSEDESK_API_BASE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_SECONDS)
                .long(ARG_TIMEOUT_SECONDS)
                .help("Request timeout in seconds")
                .env("COURSEDESK_TIMEOUT_SECONDS")
                .default_value("10")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_REFRESH_PATH)
                .long(ARG_REFRESH_PATH)
                .help("Relative path of the token refresh endpoint")
                .env("COURSEDESK_REFRESH_PATH")
                .default_value(DEFAULT_REFRESH_PATH)
                .global(true),
        )
}
