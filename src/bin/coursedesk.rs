use anyhow::Result;
use coursedesk::cli::{self, telemetry};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    let action = cli::start()?;

    let result = action.execute().await;

    telemetry::shutdown_tracer();

    result
}
