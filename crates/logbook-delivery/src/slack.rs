//! Slack announcements for merged changelog updates

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info, instrument};
use url::Url;

use logbook_changelog::Changelog;

use crate::error::{DeliveryError, Result};

/// Matches `[title](url)` with the shortest possible title and URL
static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("Invalid regex"));

/// Rewrite Markdown links into Slack's `<url|title>` form
pub fn convert_markdown_links_to_slack_style(content: &str) -> String {
    MARKDOWN_LINK.replace_all(content, "<${2}|${1}>").into_owned()
}

/// The newest change-set of one changelog, ready to post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Root-relative directory of the changelog, `/`-separated
    pub directory: String,
    /// Changes of the newest change-set
    pub changes: Vec<String>,
    /// Pull request that carried the update
    pub pull_request_url: String,
}

impl Announcement {
    /// Announce the newest change-set of `changelog`
    pub fn from_changelog(
        directory: impl Into<String>,
        changelog: &Changelog,
        pull_request_url: impl Into<String>,
    ) -> Result<Self> {
        let directory = directory.into();
        let changes = match changelog.latest_change_set() {
            Some(set) => set.changes.clone(),
            None => return Err(DeliveryError::NothingToAnnounce(directory)),
        };

        Ok(Self {
            directory,
            changes,
            pull_request_url: pull_request_url.into(),
        })
    }
}

/// Posts announcements to a Slack incoming webhook
pub struct SlackNotifier {
    client: Client,
    webhook: Url,
    username: String,
    icon_emoji: String,
}

impl SlackNotifier {
    /// Create a notifier for `webhook`
    pub fn new(webhook: &str) -> Result<Self> {
        let webhook = Url::parse(webhook).map_err(|e| DeliveryError::invalid_url("<webhook>", e))?;

        Ok(Self {
            client: Client::builder().build()?,
            webhook,
            username: "Changelog Bot".to_string(),
            icon_emoji: ":newspaper:".to_string(),
        })
    }

    /// Post under a different name and icon
    pub fn with_identity(mut self, username: impl Into<String>, icon_emoji: impl Into<String>) -> Self {
        self.username = username.into();
        self.icon_emoji = icon_emoji.into();
        self
    }

    /// Block Kit payload for an announcement
    pub fn payload(&self, announcement: &Announcement) -> serde_json::Value {
        let changes = announcement
            .changes
            .iter()
            .map(|change| format!("• {}", convert_markdown_links_to_slack_style(change)))
            .collect::<Vec<_>>()
            .join("\n");

        json!({
            "username": self.username,
            "icon_emoji": self.icon_emoji,
            "blocks": [
                {
                    "type": "header",
                    "text": {
                        "type": "plain_text",
                        "text": format!("/{}", announcement.directory),
                    },
                },
                {
                    "type": "context",
                    "elements": [
                        {
                            "type": "mrkdwn",
                            "text": "A new changelog entry has been added.",
                        },
                    ],
                },
                {
                    "type": "section",
                    "text": { "type": "mrkdwn", "text": changes },
                },
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": format!("<{}|View pull request>", announcement.pull_request_url),
                    },
                },
            ],
        })
    }

    /// Post an announcement
    #[instrument(skip(self, announcement), fields(directory = %announcement.directory))]
    pub async fn send(&self, announcement: &Announcement) -> Result<()> {
        let payload = self.payload(announcement);
        debug!(changes = announcement.changes.len(), "posting to Slack");

        let response = self
            .client
            .post(self.webhook.clone())
            .json(&payload)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        info!(directory = %announcement.directory, "sent Slack message");
        Ok(())
    }
}
