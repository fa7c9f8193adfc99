use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;
use tracing::{debug, warn};

pub const UNKNOWN_WEBSITE: &str = "Unknown Website";

/// Format of `Entry::published`, e.g. `Mon, 09 Dec 2024 12:00:00 +0000`
pub const PUBLISHED_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// One item of a fetched feed, rebuilt on every poll.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entry {
    /// Dedupe key: the feed-provided id, or the link when the feed has none
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub author: Option<String>,
    pub published: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedFeed {
    pub site_name: String,
    pub entries: Vec<Entry>,
}

impl FetchedFeed {
    pub fn empty() -> Self {
        Self {
            site_name: UNKNOWN_WEBSITE.to_string(),
            entries: Vec::new(),
        }
    }
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn build_client() -> anyhow::Result<Client> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("RssNotify/1.0 (Feed Watcher)")
            .build()?;
        Ok(client)
    }

    /// Fetches and parses a feed. Failures are logged and yield an empty feed.
    pub async fn fetch(&self, url: &str) -> FetchedFeed {
        match self.try_fetch(url).await {
            Ok(feed) => feed,
            Err(e) => {
                warn!("Failed to fetch feed {}: {}", url, e);
                FetchedFeed::empty()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> anyhow::Result<FetchedFeed> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        let feed = Self::parse_feed(&bytes)?;
        debug!("Parsed {} entries from {}", feed.entries.len(), url);
        Ok(feed)
    }

    pub fn parse_feed(bytes: &[u8]) -> anyhow::Result<FetchedFeed> {
        // Leave missing ids empty so the entry link can stand in for them
        let parsed = parser::Builder::new()
            .id_generator(|_links, _title, _uri| String::new())
            .build()
            .parse(bytes)?;

        let site_name = parsed
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| UNKNOWN_WEBSITE.to_string());

        let entries = parsed.entries.into_iter().map(Self::convert_entry).collect();

        Ok(FetchedFeed { site_name, entries })
    }

    pub fn convert_entry(entry: feed_rs::model::Entry) -> Entry {
        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        let id = if entry.id.is_empty() {
            link.clone()
        } else {
            entry.id
        };

        let description = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .unwrap_or_default();

        let published = entry
            .published
            .or(entry.updated)
            .map(|dt| dt.format(PUBLISHED_FORMAT).to_string())
            .unwrap_or_default();

        Entry {
            id,
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            description,
            link,
            author: entry.authors.into_iter().next().map(|a| a.name),
            published,
        }
    }
}
