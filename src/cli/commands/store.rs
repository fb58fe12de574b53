use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::path::PathBuf;

pub const ARG_STORE_PATH: &str = "store-path";
pub const ARG_STORE_KEY: &str = "store-key";

pub const DEFAULT_STORE_PATH: &str = ".coursedesk/session.json";

#[derive(Clone)]
pub struct Options {
    pub path: PathBuf,
    pub key: Option<SecretString>,
}

impl Options {
    /// Parse session store arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the store path is empty.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let path = matches
            .get_one::<String>(ARG_STORE_PATH)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_STORE_PATH}"))?;

        Ok(Self {
            path: PathBuf::from(path),
            key: matches
                .get_one::<String>(ARG_STORE_KEY)
                .filter(|v| !v.trim().is_empty())
                .map(|v| SecretString::from(v.trim().to_string())),
        })
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("path", &self.path)
            .field("key", &self.key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_STORE_PATH)
                .long(ARG_STORE_PATH)
                .help("Path of the encrypted session file")
                .env("COURSEDESK_STORE_PATH")
                .default_value(DEFAULT_STORE_PATH)
                .global(true),
        )
        .arg(
            Arg::new(ARG_STORE_KEY)
                .long(ARG_STORE_KEY)
                .help("Base64 encoded 32 byte key for the session store")
                .long_help(
                    "Base64 encoded 32 byte key for the session store. Generate one with `coursedesk session keygen`. When unset a built-in key is used.",
                )
                .env("COURSEDESK_STORE_KEY")
                .hide_env_values(true)
                .global(true),
        )
}
