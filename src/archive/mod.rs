//! Drives the full pipeline: authenticate once, walk the month windows,
//! list recordings, download each file, append report rows.

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::auth::Authenticator;
use crate::config::Config;
use crate::dates::month_windows;
use crate::download::MediaFetcher;
use crate::report::{Report, ReportRow};
use crate::zoom::{Meeting, RecordingsClient};

const FALLBACK_TOPIC: &str = "Meeting";

/// Outcome of processing a single recording file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Downloaded { size_mb: f64 },
    SkippedExisting,
    SkippedNoUrl,
    Failed { reason: String },
}

/// Aggregate counts for a completed run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub windows: usize,
    pub meetings: usize,
    pub downloaded: usize,
    pub skipped_existing: usize,
    pub skipped_no_url: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Downloaded { .. } => self.downloaded += 1,
            FileOutcome::SkippedExisting => self.skipped_existing += 1,
            FileOutcome::SkippedNoUrl => self.skipped_no_url += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Replaces path-hostile characters in meeting topics so they can be used
/// as file name components.
pub struct TopicSanitizer {
    unsafe_chars: Regex,
}

impl TopicSanitizer {
    pub fn new() -> Result<Self> {
        let unsafe_chars = Regex::new(r#"[/\\:*?"<>|]"#)?;
        Ok(Self { unsafe_chars })
    }

    pub fn sanitize(&self, topic: &str) -> String {
        let cleaned = self.unsafe_chars.replace_all(topic.trim(), "_");
        if cleaned.is_empty() {
            FALLBACK_TOPIC.to_string()
        } else {
            cleaned.into_owned()
        }
    }
}

/// Orchestrates one archival run over a resolved configuration.
pub struct Archiver {
    config: Config,
    fetcher: Box<dyn MediaFetcher>,
    report: Report,
    sanitizer: TopicSanitizer,
}

impl Archiver {
    pub fn new(config: Config, fetcher: Box<dyn MediaFetcher>) -> Result<Self> {
        let report = Report::new(&config.output.report_path);
        let sanitizer = TopicSanitizer::new()?;
        Ok(Self {
            config,
            fetcher,
            report,
            sanitizer,
        })
    }

    /// Run the full pipeline and print a summary.
    ///
    /// Only authentication (and invalid configuration) aborts the run;
    /// window and file failures degrade and the batch continues.
    pub async fn run(&self) -> Result<RunSummary> {
        let (start, end) = self.config.resolved_range()?;

        std::fs::create_dir_all(&self.config.output.download_dir)
            .context("Failed to create download directory")?;

        let authenticator = Authenticator::new(&self.config.zoom.oauth_base_url);
        let token = authenticator
            .access_token(
                &self.config.zoom.account_id,
                &self.config.zoom.client_id,
                &self.config.zoom.client_secret,
            )
            .await
            .context("Zoom authentication failed")?;
        info!("Zoom API token retrieved");

        let client = RecordingsClient::new(&self.config.zoom.api_base_url, &token);
        let mut summary = RunSummary::default();

        for window in month_windows(start, end) {
            info!("Fetching recordings from {} to {}", window.from, window.to);
            let meetings = client
                .list_recordings(
                    &self.config.zoom.user_id,
                    &window,
                    self.config.zoom.page_size,
                )
                .await;
            info!("Found {} meetings in this window", meetings.len());

            summary.windows += 1;
            for meeting in &meetings {
                self.process_meeting(meeting, &token, &mut summary).await;
            }
        }

        self.print_summary(&summary);
        Ok(summary)
    }

    /// Process every recording file of one meeting, recording outcomes.
    pub async fn process_meeting(&self, meeting: &Meeting, token: &str, summary: &mut RunSummary) {
        let recording_date = recording_date(&meeting.start_time);
        let topic = self.sanitizer.sanitize(&meeting.topic);
        summary.meetings += 1;

        for file in &meeting.recording_files {
            let file_name = format!("{}_{}.mp4", topic, file.id);
            let outcome = self
                .process_file(file.download_url.as_deref(), &file_name, &recording_date, token)
                .await;
            summary.record(&outcome);
        }
    }

    async fn process_file(
        &self,
        download_url: Option<&str>,
        file_name: &str,
        recording_date: &str,
        token: &str,
    ) -> FileOutcome {
        let url = match download_url {
            Some(url) => url,
            None => {
                debug!("Skipping {file_name}: no download URL");
                return FileOutcome::SkippedNoUrl;
            }
        };

        let dest = self.config.output.download_dir.join(file_name);
        if dest.exists() {
            info!("Skipping existing file: {file_name}");
            return FileOutcome::SkippedExisting;
        }

        let authed_url = format!("{url}?access_token={token}");
        info!("Downloading {file_name}");

        let size_mb = match self.fetcher.fetch(&authed_url, &dest).await {
            Ok(size_mb) => size_mb,
            Err(err) => {
                warn!("Failed to download {file_name}: {err:#}");
                return FileOutcome::Failed {
                    reason: format!("{err:#}"),
                };
            }
        };

        let row = ReportRow {
            file_name: file_name.to_string(),
            recording_date: recording_date.to_string(),
            local_path: dest.display().to_string(),
            size_mb,
        };
        if let Err(err) = self.report.append(&row) {
            warn!("Downloaded {file_name} but failed to record it: {err:#}");
            return FileOutcome::Failed {
                reason: format!("report append: {err:#}"),
            };
        }

        FileOutcome::Downloaded { size_mb }
    }

    fn print_summary(&self, summary: &RunSummary) {
        println!(
            "Processed {} window(s), {} meeting(s).",
            summary.windows, summary.meetings
        );
        println!(
            "Downloaded {} file(s); skipped {} existing, {} without download URL; {} failed.",
            summary.downloaded, summary.skipped_existing, summary.skipped_no_url, summary.failed
        );
        println!(
            "Recordings directory: {}",
            self.config.output.download_dir.display()
        );
        println!("Report: {}", self.report.path().display());
    }
}

/// Date portion of an RFC 3339 timestamp, empty if the input is shorter.
fn recording_date(start_time: &str) -> String {
    start_time.get(..10).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_path_separators() {
        let sanitizer = TopicSanitizer::new().unwrap();
        assert_eq!(sanitizer.sanitize("Q1/Planning"), "Q1_Planning");
        assert_eq!(sanitizer.sanitize(r"a\b:c*d?e"), "a_b_c_d_e");
        assert_eq!(sanitizer.sanitize("\"review\" <v2>|final"), "_review_ _v2__final");
    }

    #[test]
    fn test_sanitize_keeps_plain_topics() {
        let sanitizer = TopicSanitizer::new().unwrap();
        assert_eq!(sanitizer.sanitize("Weekly Sync"), "Weekly Sync");
    }

    #[test]
    fn test_sanitize_empty_topic_falls_back() {
        let sanitizer = TopicSanitizer::new().unwrap();
        assert_eq!(sanitizer.sanitize(""), "Meeting");
        assert_eq!(sanitizer.sanitize("   "), "Meeting");
    }

    #[test]
    fn test_recording_date_takes_date_prefix() {
        assert_eq!(recording_date("2022-06-07T14:00:00Z"), "2022-06-07");
        assert_eq!(recording_date("2022-06-07"), "2022-06-07");
        assert_eq!(recording_date("short"), "");
    }

    #[test]
    fn test_summary_records_outcomes() {
        let mut summary = RunSummary::default();
        summary.record(&FileOutcome::Downloaded { size_mb: 1.0 });
        summary.record(&FileOutcome::SkippedExisting);
        summary.record(&FileOutcome::SkippedNoUrl);
        summary.record(&FileOutcome::Failed {
            reason: "boom".to_string(),
        });
        summary.record(&FileOutcome::Downloaded { size_mb: 2.0 });

        assert_eq!(summary.downloaded, 2);
        assert_eq!(summary.skipped_existing, 1);
        assert_eq!(summary.skipped_no_url, 1);
        assert_eq!(summary.failed, 1);
    }
}
