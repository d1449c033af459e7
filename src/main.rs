use clap::Parser;
use climate_api::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args).await,
        Command::Check(args) => cli::check::run(args).await,
    }
}
