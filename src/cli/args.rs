use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zoomharvest")]
#[command(about = "Archive Zoom cloud recordings to local disk", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Download recordings for the configured user and date range
    Fetch(FetchCliArgs),
    /// Inspect the accumulated download report
    Report(ReportCliArgs),
    /// Inspect the resolved configuration
    Config(ConfigCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug, Default)]
pub struct FetchCliArgs {
    /// Inclusive start date (YYYY-MM-DD), overrides the config
    #[arg(long, conflicts_with = "year")]
    pub from: Option<String>,
    /// Inclusive end date (YYYY-MM-DD), overrides the config
    #[arg(long, conflicts_with = "year")]
    pub to: Option<String>,
    /// Fetch a whole calendar year (shorthand for --from/--to)
    #[arg(long)]
    pub year: Option<i32>,
    /// User ID or email whose recordings are listed, overrides the config
    #[arg(long)]
    pub user: Option<String>,
    /// Download directory, overrides the config
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Report file path, overrides the config
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct ReportCliArgs {
    #[command(subcommand)]
    pub command: ReportCommand,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Print the report rows in append order
    Show {
        /// Maximum number of rows to show (most recent last)
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[derive(ClapArgs, Debug)]
pub struct ConfigCliArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration with secrets redacted
    Show,
    /// Print the config file path
    Path,
}
