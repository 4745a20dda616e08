mod cli;

use clap::Parser;
use plugin_bridge::logger::init_tracing;
use tracing::error;

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;
    let _guard = init_tracing(&config.log)?;

    let result = match cli.command {
        Commands::Serve(args) => cli::serve::execute(args).await,
        Commands::Dispatch(args) => cli::dispatch::execute(args).await,
        Commands::Channels(args) => cli::channels::execute(args).await,
    };
    if let Err(err) = &result {
        error!("{err:#}");
    }
    result
}
