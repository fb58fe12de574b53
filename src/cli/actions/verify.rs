use crate::{
    cli::{actions::print_envelope, globals::GlobalArgs},
    features::auth::client::verify_email,
};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub code: String,
}

/// Execute the verify action.
/// # Errors
/// Returns an error if the request fails or the code is rejected.
pub async fn execute(args: Args) -> Result<()> {
    let client = args.globals.client()?;
    let envelope = verify_email(&client, &args.email, &args.code).await?;
    print_envelope(&envelope)
}
