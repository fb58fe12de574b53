pub mod navigate;
pub mod profile;
pub mod progress;
pub mod quiz;
pub mod request;
pub mod session;
pub mod verify;
pub mod whoami;
pub mod wishlist;

// Internal "interpreter" for `Action`.
mod run;

use crate::api::Envelope;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug)]
pub enum Action {
    Session(session::Args),
    Request(request::Args),
    Navigate(navigate::Args),
    Whoami(whoami::Args),
    Verify(verify::Args),
    Wishlist(wishlist::Args),
    Progress(progress::Args),
    Profile(profile::Args),
    Quiz(quiz::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Writes `value` to stdout as pretty JSON.
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the envelope, then turns a failed one into an error so the exit code
/// reflects it.
fn print_envelope(envelope: &Envelope) -> Result<()> {
    print_json(envelope)?;

    match envelope.error() {
        Some(error) => anyhow::bail!(
            "request failed with status {}: {error}",
            envelope.status()
        ),
        None => Ok(()),
    }
}
