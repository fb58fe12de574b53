use crate::{
    cli::{actions::{print_envelope, print_json}, globals::GlobalArgs},
    features::profile::{self, ProfileFields},
    session::SessionStore,
};
use anyhow::Result;

#[derive(Debug)]
pub enum Command {
    Show,
    Set {
        fields: ProfileFields,
        remote: bool,
    },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: Command,
}

/// Execute the profile action.
/// # Errors
/// Returns an error if the store cannot be used or the remote save fails.
pub async fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Show => {
            let store = args.globals.open_store()?;
            store.hydrate()?;
            print_json(&profile::load_local(store.as_ref())?)
        }
        Command::Set {
            fields,
            remote: false,
        } => {
            let store = args.globals.open_store()?;
            store.hydrate()?;
            let fields = fields.merged_over(profile::load_local(store.as_ref())?);
            profile::save_local(store.as_ref(), &fields)?;
            print_json(&fields)
        }
        Command::Set {
            fields,
            remote: true,
        } => {
            let api = args.globals.client()?;
            api.session().hydrate()?;
            let fields = fields.merged_over(profile::load_local(api.session().as_ref())?);
            let envelope = profile::save_remote(&api, &fields).await?;
            print_envelope(&envelope)
        }
    }
}
