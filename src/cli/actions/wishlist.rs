use crate::{
    cli::{actions::print_json, globals::GlobalArgs},
    features::wishlist::{Wishlist, client},
};
use anyhow::Result;
use serde_json::json;

#[derive(Debug)]
pub enum Command {
    List,
    Add(String),
    Remove(String),
    Toggle(String),
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: Command,
}

/// Execute the wishlist action.
/// # Errors
/// Returns an error if a wishlist request fails.
pub async fn execute(args: Args) -> Result<()> {
    let api = args.globals.client()?;

    match args.command {
        Command::List => print_json(&client::list(&api).await?),
        Command::Add(course_id) => {
            client::add(&api, &course_id).await?;
            print_json(&json!({ "courseId": course_id, "wishlisted": true }))
        }
        Command::Remove(course_id) => {
            client::remove(&api, &course_id).await?;
            print_json(&json!({ "courseId": course_id, "wishlisted": false }))
        }
        Command::Toggle(course_id) => {
            let mut wishlist = Wishlist::load(&api).await?;
            let wishlisted = wishlist.toggle(&api, &course_id).await?;
            print_json(&json!({ "courseId": course_id, "wishlisted": wishlisted }))
        }
    }
}
