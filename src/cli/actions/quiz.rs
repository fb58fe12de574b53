use crate::{
    cli::{actions::print_json, globals::GlobalArgs},
    features::mcq,
};
use anyhow::Result;
use rand::{SeedableRng, rngs::StdRng};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub chapter_id: String,
    pub seed: Option<u64>,
}

/// Execute the quiz action.
/// # Errors
/// Returns an error if the MCQs cannot be fetched.
pub async fn execute(args: Args) -> Result<()> {
    let api = args.globals.client()?;
    let mcqs = mcq::client::list_for_chapter(&api, &args.chapter_id).await?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    print_json(&mcq::shuffle_quiz(&mcqs, &mut rng))
}
