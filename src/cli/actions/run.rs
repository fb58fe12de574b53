use crate::cli::actions::{
    Action, navigate, profile, progress, quiz, request, session, verify, whoami, wishlist,
};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Session(args) => session::execute(args).await,
        Action::Request(args) => request::execute(args).await,
        Action::Navigate(args) => navigate::execute(args).await,
        Action::Whoami(args) => whoami::execute(args).await,
        Action::Verify(args) => verify::execute(args).await,
        Action::Wishlist(args) => wishlist::execute(args).await,
        Action::Progress(args) => progress::execute(args).await,
        Action::Profile(args) => profile::execute(args).await,
        Action::Quiz(args) => quiz::execute(args).await,
    }
}
