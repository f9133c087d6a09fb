use clap::Parser;
use kma_processor::cli::{run, Cli};
use kma_processor::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
