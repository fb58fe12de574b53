use crate::{
    cli::{actions::print_json, globals::GlobalArgs},
    features::{auth::client::fetch_me, profile},
};
use anyhow::Result;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub remember: bool,
}

/// Execute the whoami action.
/// # Errors
/// Returns an error if the identity cannot be resolved or stored.
pub async fn execute(args: Args) -> Result<()> {
    let client = args.globals.client()?;
    let user = fetch_me(&client).await?;

    if args.remember {
        profile::remember_identity(client.session().as_ref(), &user)?;
        info!("identity stored for {}", user.id);
    }

    print_json(&user)
}
