use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zoomharvest::cli::{
    handle_config_command, handle_fetch_command, handle_report_command, Cli, CliCommand,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        CliCommand::Version => {
            println!("zoomharvest {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliCommand::Fetch(args) => handle_fetch_command(args).await,
        CliCommand::Report(args) => handle_report_command(args),
        CliCommand::Config(args) => handle_config_command(args),
    }
}
