use anyhow::Result;
use megha::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
