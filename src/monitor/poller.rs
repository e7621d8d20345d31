//! Periodic refresh of the published status and speed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use super::StatusMonitor;
use super::error::FetchError;
use crate::context::ScrapeContext;
use crate::request::{DOWNLOAD_PAGE, STATS_PAGE};

/// Source of daemon pages, implemented by the HTTP transport.
///
/// `page` is a path relative to the web interface root, such as
/// [`STATS_PAGE`].
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the markup of `page`.
    async fn fetch(&self, page: &str) -> Result<String, FetchError>;
}

/// What one poll cycle managed to refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// A status was parsed and published.
    pub status_published: bool,
    /// Number of downloads the published speed was computed from.
    pub downloads: Option<usize>,
}

/// Fetches the stats and download pages on a timer and publishes the results.
pub struct Poller<S> {
    source: S,
    context: Arc<ScrapeContext>,
    monitor: Arc<StatusMonitor>,
    period: Duration,
}

impl<S: PageSource> Poller<S> {
    #[must_use]
    pub fn new(source: S, context: Arc<ScrapeContext>, monitor: Arc<StatusMonitor>, period: Duration) -> Self {
        Self {
            source,
            context,
            monitor,
            period,
        }
    }

    /// The monitor this poller publishes to.
    #[must_use]
    pub fn monitor(&self) -> &Arc<StatusMonitor> {
        &self.monitor
    }

    /// Runs one refresh cycle. Fetch failures are logged and skipped.
    pub async fn poll_once(&self) -> PollOutcome {
        let mut outcome = PollOutcome::default();

        match self.source.fetch(STATS_PAGE).await {
            Ok(html) => match self.context.stats(&html) {
                Some(stats) => {
                    self.monitor.publish_status(stats);
                    outcome.status_published = true;
                }
                None => warn!(page = STATS_PAGE, "status page had no content"),
            },
            Err(e) => warn!(error = %e, "status refresh failed"),
        }

        match self.source.fetch(DOWNLOAD_PAGE).await {
            Ok(html) => {
                let downloads = self.context.downloads(&html);
                self.monitor.publish_downloads(&downloads);
                outcome.downloads = Some(downloads.len());
            }
            Err(e) => warn!(error = %e, "download refresh failed"),
        }

        debug!(?outcome, "poll cycle finished");
        outcome
    }

    /// Polls every period until `shutdown` resolves.
    ///
    /// The first cycle runs immediately. Returns the number of cycles run.
    pub async fn run<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(period_ms = self.period.as_millis(), "poller started");
        let mut cycles = 0_u64;
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.poll_once().await;
                    cycles += 1;
                }
            }
        }
        info!(cycles, "poller stopped");
        cycles
    }
}
