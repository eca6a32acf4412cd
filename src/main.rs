//! agentics CLI binary entry point.

use agentics::cli::{handle_chat, handle_run, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    let result = async move {
        let config = cli.load_config()?;
        match cli.command {
            Commands::Run(args) => handle_run(args, &config).await,
            Commands::Chat(args) => handle_chat(args, &config).await,
        }
    }
    .await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
