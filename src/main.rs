use clap::Parser;

use cloudshelf::cli;
use cloudshelf::cli::Args;
use cloudshelf::config::load_storage_config;
use cloudshelf::error::Result;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    if let Err(e) = run_app(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_app(args: Args) -> Result<()> {
    let config = load_storage_config()?;
    cli::run(args, config).await?;
    Ok(())
}
