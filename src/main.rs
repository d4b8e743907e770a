use anyhow::Result;
use finpilot::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
