//! Typed models and listing client for the Zoom cloud recordings API.

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::dates::DateWindow;

/// A recorded meeting as returned by the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meeting {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub topic: String,
    /// RFC 3339 start timestamp; the date prefix becomes the report field.
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub recording_files: Vec<RecordingFile>,
}

/// One media asset of a recorded meeting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordingFile {
    #[serde(default)]
    pub id: String,
    /// Absent for assets Zoom does not expose for download; those are skipped.
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub recording_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RecordingsPage {
    #[serde(default)]
    meetings: Vec<Meeting>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Client for the recordings listing endpoint.
pub struct RecordingsClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RecordingsClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    /// List every recorded meeting for `user_id` within `window`.
    ///
    /// Follows `next_page_token` until the page set is exhausted. A failed
    /// page logs a warning and returns whatever was accumulated so far;
    /// partial results are processed, not resurfaced as an error.
    pub async fn list_recordings(
        &self,
        user_id: &str,
        window: &DateWindow,
        page_size: u32,
    ) -> Vec<Meeting> {
        let url = format!("{}/users/{}/recordings", self.base_url, user_id);
        let from = window.from.format("%Y-%m-%d").to_string();
        let to = window.to.format("%Y-%m-%d").to_string();

        let mut meetings = Vec::new();
        let mut next_page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[("from", from.as_str()), ("to", to.as_str())])
                .query(&[("page_size", page_size)]);
            if let Some(token) = &next_page_token {
                request = request.query(&[("next_page_token", token.as_str())]);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    warn!("Recordings request failed for {from}..{to}: {err}");
                    break;
                }
            };

            let status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    warn!("Failed to read recordings response for {from}..{to}: {err}");
                    break;
                }
            };

            if !status.is_success() {
                warn!("Recordings request returned {status} for {from}..{to}: {body}");
                break;
            }

            let (page_meetings, page_token) = match parse_page(&body) {
                Ok(page) => page,
                Err(err) => {
                    warn!("Failed to parse recordings page for {from}..{to}: {err}");
                    break;
                }
            };

            debug!(
                "Fetched page with {} meetings for {from}..{to}",
                page_meetings.len()
            );
            meetings.extend(page_meetings);

            // Zoom signals exhaustion with a missing or empty token.
            match page_token.filter(|token| !token.is_empty()) {
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }

        meetings
    }
}

fn parse_page(body: &str) -> Result<(Vec<Meeting>, Option<String>)> {
    let page: RecordingsPage = serde_json::from_str(body)?;
    Ok((page.meetings, page.next_page_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_with_meetings() {
        let body = r#"{
            "from": "2022-06-01",
            "to": "2022-06-30",
            "page_size": 300,
            "total_records": 2,
            "next_page_token": "tok123",
            "meetings": [
                {
                    "id": 111,
                    "topic": "Weekly Sync",
                    "start_time": "2022-06-07T14:00:00Z",
                    "recording_files": [
                        {
                            "id": "f1",
                            "file_type": "MP4",
                            "recording_type": "shared_screen_with_speaker_view",
                            "file_size": 1048576,
                            "download_url": "https://zoom.us/rec/download/f1"
                        }
                    ]
                },
                {
                    "id": 222,
                    "topic": "Retro",
                    "start_time": "2022-06-21T09:30:00Z",
                    "recording_files": [
                        {"id": "f2", "file_type": "TIMELINE"}
                    ]
                }
            ]
        }"#;

        let (meetings, next) = parse_page(body).unwrap();
        assert_eq!(meetings.len(), 2);
        assert_eq!(next.as_deref(), Some("tok123"));

        assert_eq!(meetings[0].topic, "Weekly Sync");
        assert_eq!(
            meetings[0].recording_files[0].download_url.as_deref(),
            Some("https://zoom.us/rec/download/f1")
        );
        assert!(meetings[1].recording_files[0].download_url.is_none());
    }

    #[test]
    fn test_parse_page_empty_token_and_missing_fields() {
        let body = r#"{"meetings": [], "next_page_token": ""}"#;
        let (meetings, next) = parse_page(body).unwrap();
        assert!(meetings.is_empty());
        assert_eq!(next.as_deref(), Some(""));
    }

    #[test]
    fn test_parse_page_tolerates_absent_lists() {
        let (meetings, next) = parse_page("{}").unwrap();
        assert!(meetings.is_empty());
        assert!(next.is_none());
    }
}
