use std::process::ExitCode;

use clap::Parser;
use marketplace_scripts::cli::Cli;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let Cli { priv_key, rpc_url, command } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    match command.run(priv_key.as_deref(), &rpc_url).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
