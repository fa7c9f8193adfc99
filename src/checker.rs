use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::error::NotifyError;
use crate::fetcher::{Entry, Fetcher};
use crate::matcher::Matcher;
use crate::notifier::{Notifier, NotifyOutcome};

/// Counters for one pass over every configured feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub feeds: usize,
    pub entries: usize,
    /// Entries matching a keyword, whether or not they were seen before
    pub matched: usize,
    pub notified: usize,
    /// Dispatched but not accepted by the webhook
    pub failed: usize,
    /// Matched but not dispatched: no usable dedupe key or date
    pub skipped: usize,
}

enum Dispatch {
    Sent,
    Failed,
    Skipped,
}

/// Runs the fetch, match, dedupe, notify, record cycle.
pub struct Checker {
    db: Database,
    fetcher: Fetcher,
    matcher: Matcher,
    notifier: Notifier,
    feeds: Vec<String>,
    interval: Duration,
}

impl Checker {
    pub fn new(config: &Config, db: Database, client: Client) -> anyhow::Result<Self> {
        let matcher = Matcher::new(&config.keywords)?;
        info!(
            "Watching {} feeds for {} keywords",
            config.feeds.len(),
            matcher.len()
        );

        Ok(Self {
            db,
            fetcher: Fetcher::new(client.clone()),
            matcher,
            notifier: Notifier::new(client, config.webhook_url.clone()),
            feeds: config.feeds.clone(),
            interval: config.interval()?,
        })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Processes every feed once, in configured order.
    pub async fn check_feeds(&self) -> anyhow::Result<PassSummary> {
        let mut summary = PassSummary::default();

        for url in &self.feeds {
            info!("Checking feed: {}", url);
            let feed = self.fetcher.fetch(url).await;
            summary.feeds += 1;

            for entry in &feed.entries {
                summary.entries += 1;

                if !self.matcher.matches(entry) {
                    continue;
                }
                summary.matched += 1;

                // Without a key the entry cannot be deduplicated
                if entry.id.is_empty() {
                    warn!("Skipping entry '{}': no id or link", entry.title);
                    summary.skipped += 1;
                    continue;
                }

                if self.db.exists(&entry.id).await? {
                    continue;
                }

                match self.dispatch(entry, &feed.site_name).await? {
                    Dispatch::Sent => summary.notified += 1,
                    Dispatch::Failed => summary.failed += 1,
                    Dispatch::Skipped => summary.skipped += 1,
                }
            }
        }

        info!(
            "Pass complete: {} feeds, {} entries, {} matched, {} notified, {} failed, {} skipped",
            summary.feeds,
            summary.entries,
            summary.matched,
            summary.notified,
            summary.failed,
            summary.skipped
        );
        Ok(summary)
    }

    /// Sends one entry and records it. Every attempted dispatch is recorded,
    /// delivered or not, so an entry is never posted twice.
    async fn dispatch(&self, entry: &Entry, site_name: &str) -> anyhow::Result<Dispatch> {
        let result = match self.notifier.notify(entry, site_name).await {
            Ok(NotifyOutcome::Delivered) => Dispatch::Sent,
            Ok(NotifyOutcome::Rejected { .. }) => Dispatch::Failed,
            Err(e @ NotifyError::Transport(_)) => {
                error!("Failed to send notification for '{}': {}", entry.title, e);
                Dispatch::Failed
            }
            Err(e @ NotifyError::Timestamp { .. }) => {
                warn!("Skipping entry '{}' ({}): {}", entry.title, entry.id, e);
                return Ok(Dispatch::Skipped);
            }
        };

        self.db.record(&entry.id).await?;
        Ok(result)
    }

    /// Polls until `shutdown` completes. Shutdown is only observed between
    /// passes, so a pass in progress always finishes.
    pub async fn run_until<F>(&self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            self.check_feeds().await?;

            info!(
                "Waiting {}sec for the next check...",
                self.interval.as_secs_f64()
            );
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping");
                    return Ok(());
                }
            }
        }
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}

/// What the process does once configuration is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Empty the seen-entry store and exit
    Clear,
    /// Poll until shutdown
    Poll,
}

impl Mode {
    /// Reads the command line (without the program name). Unknown
    /// arguments are logged and ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mode = Mode::Poll;
        for arg in args {
            match arg.as_ref() {
                "--clear" => mode = Mode::Clear,
                other => warn!("Ignoring unknown argument: {}", other),
            }
        }
        mode
    }
}

/// Resolves once Ctrl-C is received.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Runs the selected mode. The store is closed before returning, whether
/// the mode succeeded or not.
pub async fn start<F>(
    config: &Config,
    db: Database,
    client: Client,
    mode: Mode,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    match mode {
        Mode::Clear => {
            let result = db.clear().await;
            db.close().await;
            info!("Database cleared ({} entries removed)", result?);
            Ok(())
        }
        Mode::Poll => {
            let checker = Checker::new(config, db, client)?;
            let result = checker.run_until(shutdown).await;
            checker.close().await;
            result
        }
    }
}
