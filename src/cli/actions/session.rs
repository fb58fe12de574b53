use crate::{
    cli::{actions::print_json, globals::GlobalArgs},
    session::{SessionStore, StoreKey, keys},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde_json::{Map, Value};
use tracing::info;

#[derive(Debug)]
pub enum Command {
    Set {
        token: SecretString,
        refresh_token: Option<SecretString>,
    },
    Status,
    Clear,
    Keygen,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: Command,
}

// Entries listed by `session status`; tokens are reported as present/absent only.
const SECRET_KEYS: [&str; 2] = [keys::TOKEN, keys::REFRESH_TOKEN];
const VISIBLE_KEYS: [&str; 7] = [
    keys::USER_ID,
    keys::NAME,
    keys::EMAIL,
    keys::ROLE,
    keys::POSITION,
    keys::ABOUT,
    keys::LINKS,
];

/// Execute the session action.
/// # Errors
/// Returns an error if the store cannot be opened, read or written.
pub async fn execute(args: Args) -> Result<()> {
    if matches!(args.command, Command::Keygen) {
        println!("{}", StoreKey::generate().to_base64());
        return Ok(());
    }

    let store = args.globals.open_store()?;

    // Clearing must work on a file that no longer loads.
    if !matches!(args.command, Command::Clear) {
        store
            .hydrate()
            .with_context(|| format!("failed to load {}", args.globals.store_path.display()))?;
    }

    match args.command {
        Command::Set {
            token,
            refresh_token,
        } => {
            store.set_session(&token, refresh_token.as_ref())?;
            info!("session tokens stored");
        }
        Command::Clear => {
            store.clear()?;
            info!("session store cleared");
        }
        Command::Status => {
            let mut status = Map::new();
            status.insert(
                "store".to_string(),
                Value::String(args.globals.store_path.display().to_string()),
            );

            for key in SECRET_KEYS {
                status.insert(key.to_string(), Value::Bool(store.get(key)?.is_some()));
            }
            for key in VISIBLE_KEYS {
                if let Some(value) = store.get(key)? {
                    status.insert(key.to_string(), value);
                }
            }

            print_json(&status)?;
        }
        Command::Keygen => {}
    }

    Ok(())
}
