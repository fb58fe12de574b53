use crate::{
    cli::{actions::print_json, globals::GlobalArgs},
    features::progress::ProgressTracker,
};
use anyhow::Result;
use serde_json::json;

#[derive(Debug)]
pub enum Command {
    Show { course_id: String },
    Complete { course_id: String, lesson_id: String },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: Command,
}

/// Execute the progress action.
/// # Errors
/// Returns an error if progress cannot be fetched or updated.
pub async fn execute(args: Args) -> Result<()> {
    let api = args.globals.client()?;

    match args.command {
        Command::Show { course_id } => {
            let tracker = ProgressTracker::load(&api, &course_id).await?;
            print_json(&json!({
                "progress": tracker.progress(),
                "percent": tracker.percent(),
            }))
        }
        Command::Complete {
            course_id,
            lesson_id,
        } => {
            let mut tracker = ProgressTracker::load(&api, &course_id).await?;
            let updated = tracker.complete_lesson(&api, &lesson_id).await?;
            print_json(&json!({
                "progress": tracker.progress(),
                "percent": tracker.percent(),
                "updated": updated,
            }))
        }
    }
}
