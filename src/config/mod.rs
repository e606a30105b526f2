use crate::dates;
use crate::global;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub zoom: ZoomConfig,
    pub range: RangeConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Server-to-server OAuth app credentials.
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    /// User ID or email whose cloud recordings are listed.
    pub user_id: String,
    pub api_base_url: String,
    pub oauth_base_url: String,
    /// Listing page size. Zoom caps this at 300.
    pub page_size: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Inclusive start date, YYYY-MM-DD.
    pub from: Option<String>,
    /// Inclusive end date, YYYY-MM-DD.
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub download_dir: PathBuf,
    pub report_path: PathBuf,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            user_id: String::new(),
            api_base_url: "https://api.zoom.us/v2".to_string(),
            oauth_base_url: "https://zoom.us".to_string(),
            page_size: 300,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        let dir = global::default_download_dir();
        Self {
            report_path: dir.join("recordings_report.csv"),
            download_dir: dir,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }

    /// Parse and validate the configured date range.
    pub fn resolved_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        let from = self
            .range
            .from
            .as_deref()
            .context("No start date configured; set [range] from in the config or pass --from/--year")?;
        let to = self
            .range
            .to
            .as_deref()
            .context("No end date configured; set [range] to in the config or pass --to/--year")?;

        let start = dates::parse_date(from)?;
        let end = dates::parse_date(to)?;
        if start > end {
            bail!("Start date {start} is after end date {end}");
        }
        Ok((start, end))
    }
}
