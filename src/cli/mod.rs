use anyhow::Result;

use crate::archive::Archiver;
use crate::config::Config;
use crate::download::HttpFetcher;
use crate::global;
use crate::report::Report;

pub mod args;

pub use args::{
    Cli, CliCommand, ConfigCliArgs, ConfigCommand, FetchCliArgs, ReportCliArgs, ReportCommand,
};

pub async fn handle_fetch_command(args: FetchCliArgs) -> Result<()> {
    let mut config = Config::load()?;
    apply_overrides(&mut config, &args);

    let archiver = Archiver::new(config, Box::new(HttpFetcher::new()))?;
    archiver.run().await?;
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &FetchCliArgs) {
    if let Some(year) = args.year {
        config.range.from = Some(format!("{year}-01-01"));
        config.range.to = Some(format!("{year}-12-31"));
    }
    if let Some(from) = &args.from {
        config.range.from = Some(from.clone());
    }
    if let Some(to) = &args.to {
        config.range.to = Some(to.clone());
    }
    if let Some(user) = &args.user {
        config.zoom.user_id = user.clone();
    }
    if let Some(dir) = &args.dir {
        config.output.download_dir = dir.clone();
    }
    if let Some(report) = &args.report {
        config.output.report_path = report.clone();
    }
}

pub fn handle_report_command(args: ReportCliArgs) -> Result<()> {
    let ReportCommand::Show { limit } = args.command;

    let config = Config::load()?;
    let report = Report::new(&config.output.report_path);
    if !report.path().exists() {
        println!("No report found at {}", report.path().display());
        return Ok(());
    }

    let rows = report.read_rows()?;
    if rows.is_empty() {
        println!("Report is empty.");
        return Ok(());
    }

    let start = rows.len().saturating_sub(limit);
    for row in &rows[start..] {
        println!("File: {}", row.file_name);
        println!("Date: {}", row.recording_date);
        println!("Path: {}", row.local_path);
        println!("Size: {:.2} MB", row.size_mb);
        println!("---");
    }
    println!("Showing {} of {} row(s).", rows.len() - start, rows.len());

    Ok(())
}

pub fn handle_config_command(args: ConfigCliArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("account_id: {}", redact(&config.zoom.account_id));
            println!("client_id: {}", redact(&config.zoom.client_id));
            println!("client_secret: {}", redact(&config.zoom.client_secret));
            println!("user_id: {}", or_unset(&config.zoom.user_id));
            println!("api_base_url: {}", config.zoom.api_base_url);
            println!("oauth_base_url: {}", config.zoom.oauth_base_url);
            println!("page_size: {}", config.zoom.page_size);
            println!("from: {}", config.range.from.as_deref().unwrap_or("(unset)"));
            println!("to: {}", config.range.to.as_deref().unwrap_or("(unset)"));
            println!("download_dir: {}", config.output.download_dir.display());
            println!("report_path: {}", config.output.report_path.display());
        }
        ConfigCommand::Path => {
            println!("{}", global::config_file()?.display());
        }
    }
    Ok(())
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "(unset)"
    } else {
        "[redacted]"
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_expands_to_full_range() {
        let mut config = Config::default();
        let args = FetchCliArgs {
            year: Some(2021),
            ..Default::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.range.from.as_deref(), Some("2021-01-01"));
        assert_eq!(config.range.to.as_deref(), Some("2021-12-31"));
    }

    #[test]
    fn test_explicit_dates_override_config() {
        let mut config = Config::default();
        config.range.from = Some("2020-01-01".to_string());
        config.range.to = Some("2020-12-31".to_string());

        let args = FetchCliArgs {
            from: Some("2022-03-01".to_string()),
            ..Default::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.range.from.as_deref(), Some("2022-03-01"));
        assert_eq!(config.range.to.as_deref(), Some("2020-12-31"));
    }

    #[test]
    fn test_output_overrides() {
        let mut config = Config::default();
        let args = FetchCliArgs {
            user: Some("user@example.com".to_string()),
            dir: Some("/tmp/recs".into()),
            report: Some("/tmp/recs/report.csv".into()),
            ..Default::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.zoom.user_id, "user@example.com");
        assert_eq!(config.output.download_dir, std::path::PathBuf::from("/tmp/recs"));
        assert_eq!(
            config.output.report_path,
            std::path::PathBuf::from("/tmp/recs/report.csv")
        );
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact(""), "(unset)");
        assert_eq!(redact("secret"), "[redacted]");
    }
}
