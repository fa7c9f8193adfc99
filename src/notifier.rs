use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{error, info};

use crate::error::NotifyError;
use crate::fetcher::{Entry, PUBLISHED_FORMAT};
use crate::formatter::to_display_text;

pub const USERNAME: &str = "RSS-NOTIFY";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookMessage {
    pub username: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub url: String,
    pub description: String,
    pub author: EmbedAuthor,
    pub footer: EmbedFooter,
    /// ISO-8601 timestamp
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    /// The webhook answered 204 No Content
    Delivered,
    /// Any other status; the response body is kept for the log
    Rejected { status: StatusCode, body: String },
}

pub struct Notifier {
    client: Client,
    webhook_url: String,
}

impl Notifier {
    pub fn new(client: Client, webhook_url: impl Into<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }

    /// Reformats a `Mon, 09 Dec 2024 12:00:00 +0000` date as RFC 3339.
    pub fn iso_timestamp(published: &str) -> Result<String, NotifyError> {
        DateTime::parse_from_str(published, PUBLISHED_FORMAT)
            .map(|dt| dt.to_rfc3339())
            .map_err(|source| NotifyError::Timestamp {
                value: published.to_string(),
                source,
            })
    }

    pub fn build_message(entry: &Entry, site_name: &str) -> Result<WebhookMessage, NotifyError> {
        let timestamp = Self::iso_timestamp(&entry.published)?;

        Ok(WebhookMessage {
            username: USERNAME.to_string(),
            embeds: vec![Embed {
                title: entry.title.clone(),
                url: entry.link.clone(),
                description: to_display_text(&entry.description),
                author: EmbedAuthor {
                    name: entry
                        .author
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
                    url: entry.link.clone(),
                },
                footer: EmbedFooter {
                    text: site_name.to_string(),
                },
                timestamp,
            }],
        })
    }

    /// Posts one entry to the webhook.
    ///
    /// A non-204 answer is logged and reported as `Rejected`, not as an error.
    pub async fn notify(
        &self,
        entry: &Entry,
        site_name: &str,
    ) -> Result<NotifyOutcome, NotifyError> {
        let message = Self::build_message(entry, site_name)?;

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            info!("Notification sent: {}", entry.title);
            return Ok(NotifyOutcome::Delivered);
        }

        let body = response.text().await.unwrap_or_default();
        error!("Failed to send notification: {} {}", status.as_u16(), body);
        Ok(NotifyOutcome::Rejected { status, body })
    }
}
