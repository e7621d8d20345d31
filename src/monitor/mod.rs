//! Published connection status and aggregated download speed.
//!
//! [`StatusMonitor`] holds the two values the UI layer watches. Each lives in
//! its own `tokio::sync::watch` channel, so storing a new value and waking
//! the subscribers is one `send_replace` and a reader can never see the
//! notification before the value.
//!
//! [`Poller`] refreshes both on a timer from a [`PageSource`].

mod error;
mod poller;

pub use error::FetchError;
pub use poller::{PageSource, PollOutcome, Poller};

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::locale::NumberLocale;
use crate::scrape::{DownloadRecord, StatsRecord};

/// Sum of all download speeds in the latest download list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedSpeed {
    /// Total in kilobytes per second.
    pub kilobytes_per_second: f64,
    /// The total formatted for display, e.g. `"15.50 kb/s"`.
    pub display: String,
}

impl AggregatedSpeed {
    /// Builds the value for `kilobytes_per_second` in `locale`.
    #[must_use]
    pub fn new(kilobytes_per_second: f64, locale: NumberLocale) -> Self {
        Self {
            kilobytes_per_second,
            display: locale.format_speed(kilobytes_per_second),
        }
    }
}

/// Numeric part of a speed text such as `"193.10 kb/s"`.
///
/// The number is what precedes the first space; text without a unit, or
/// whose number does not parse, counts as zero.
#[must_use]
pub fn speed_value(text: &str, locale: NumberLocale) -> f64 {
    let number = match text.find(' ') {
        Some(idx) if idx > 0 => &text[..idx],
        _ => return 0.0,
    };
    locale.parse_decimal(number).unwrap_or_else(|| {
        debug!(speed = text, "speed is not a number, counting as zero");
        0.0
    })
}

/// Total speed of `records` in kilobytes per second.
#[must_use]
pub fn total_speed(records: &[DownloadRecord], locale: NumberLocale) -> f64 {
    records
        .iter()
        .map(|record| speed_value(&record.speed, locale))
        .sum()
}

/// Holder of the latest status and aggregated speed.
///
/// Shared behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct StatusMonitor {
    locale: NumberLocale,
    status: watch::Sender<StatsRecord>,
    speed: watch::Sender<AggregatedSpeed>,
}

impl StatusMonitor {
    /// Starts with an unknown status and zero speed, formatted for `locale`.
    #[must_use]
    pub fn new(locale: NumberLocale) -> Self {
        let (status, _) = watch::channel(StatsRecord::default());
        let (speed, _) = watch::channel(AggregatedSpeed::new(0.0, locale));
        Self {
            locale,
            status,
            speed,
        }
    }

    /// Replaces the current status and notifies subscribers.
    pub fn publish_status(&self, stats: StatsRecord) {
        debug!(primary = %stats.primary, secondary = %stats.secondary, "publishing status");
        self.status.send_replace(stats);
    }

    /// Recomputes the aggregated speed from `records`, publishes it and returns it.
    pub fn publish_downloads(&self, records: &[DownloadRecord]) -> AggregatedSpeed {
        let speed = AggregatedSpeed::new(total_speed(records, self.locale), self.locale);
        debug!(
            downloads = records.len(),
            total = speed.kilobytes_per_second,
            "publishing aggregated speed"
        );
        self.speed.send_replace(speed.clone());
        speed
    }

    /// Snapshot of the current status.
    #[must_use]
    pub fn status(&self) -> StatsRecord {
        self.status.borrow().clone()
    }

    /// Snapshot of the current aggregated speed.
    #[must_use]
    pub fn aggregated_speed(&self) -> AggregatedSpeed {
        self.speed.borrow().clone()
    }

    /// Receiver woken on every status change.
    #[must_use]
    pub fn subscribe_status(&self) -> watch::Receiver<StatsRecord> {
        self.status.subscribe()
    }

    /// Receiver woken on every speed change.
    #[must_use]
    pub fn subscribe_speed(&self) -> watch::Receiver<AggregatedSpeed> {
        self.speed.subscribe()
    }

    #[must_use]
    pub fn locale(&self) -> NumberLocale {
        self.locale
    }

    /// Clears the status back to unknown, e.g. after losing the daemon.
    pub fn reset_status(&self) {
        warn!("resetting published status");
        self.status.send_replace(StatsRecord::default());
    }
}

impl Default for StatusMonitor {
    fn default() -> Self {
        Self::new(NumberLocale::default())
    }
}
