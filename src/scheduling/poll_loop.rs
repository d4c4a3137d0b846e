use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;
use tracing::{error, info, warn};

use crate::error::UnexpectedError;
use crate::market::market_clock::{Clock, MarketClock};
use crate::market::quote_fetcher::QuoteFetcher;
use crate::notify::notifier::DynamicNotifier;
use crate::scheduling::sleeper::{DynamicSleeper, Wake};
use crate::types::alert_event::AlertEvent;
use crate::types::watch_entry::WatchEntry;
use crate::watchlist::watchlist_loader::DynamicWatchlist;

/// Pause between two sweeps of the watchlist while the market is open.
pub const POLL_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketPhase {
    Open,
    Closed,
}

pub struct PollLoop {
    clock: Box<dyn Clock>,
    market_clock: MarketClock,
    watchlist: DynamicWatchlist,
    quotes: QuoteFetcher,
    notifier: DynamicNotifier,
    sleeper: DynamicSleeper,
}

impl PollLoop {
    pub fn new(
        clock: Box<dyn Clock>,
        market_clock: MarketClock,
        watchlist: DynamicWatchlist,
        quotes: QuoteFetcher,
        notifier: DynamicNotifier,
        sleeper: DynamicSleeper,
    ) -> Self {
        Self {
            clock,
            market_clock,
            watchlist,
            quotes,
            notifier,
            sleeper,
        }
    }

    /// Runs until the sleeper reports cancellation.
    pub async fn run(&self) {
        info!(
            open = ?self.market_clock.hours().opens_at(),
            close = ?self.market_clock.hours().closes_at(),
            "polling started"
        );

        while self.step().await == Wake::Elapsed {}

        info!("polling stopped");
    }

    /// One pass of the gate: a sweep plus the fixed pause when open, a sleep
    /// towards the next opening bell when closed.
    pub async fn step(&self) -> Wake {
        let now = self.clock.now();

        match self.phase_at(&now) {
            MarketPhase::Open => {
                self.run_cycle().await;

                info!(secs = POLL_INTERVAL.as_secs(), "sleeping until next sweep");
                self.sleeper.sleep(POLL_INTERVAL).await
            }
            MarketPhase::Closed => {
                let wait = self.market_clock.sleep_duration_until_open(&now);
                info!(%now, wait_secs = wait.num_seconds(), "Market has closed");

                self.sleeper
                    .sleep(wait.to_std().unwrap_or(Duration::ZERO))
                    .await
            }
        }
    }

    pub fn phase_at(&self, now: &chrono::DateTime<chrono::FixedOffset>) -> MarketPhase {
        if self.market_clock.is_market_open(now) {
            MarketPhase::Open
        } else {
            MarketPhase::Closed
        }
    }

    /// One sweep of the watchlist. Returns the alerts that were sent.
    pub async fn run_cycle(&self) -> Vec<AlertEvent> {
        let mut sent = Vec::new();

        let entries = match self.watchlist.load() {
            Ok(entries) => {
                info!(
                    count = entries.len(),
                    symbols = ?entries.iter().map(|entry| entry.symbol.as_str()).collect::<Vec<_>>(),
                    "watchlist loaded"
                );
                entries
            }
            Err(error) => {
                error!(%error, "there is a problem with the watchlist");

                let alert = AlertEvent::watchlist_problem(&error);
                self.notifier.notify(&alert).await;
                sent.push(alert);

                Vec::new()
            }
        };

        for entry in &entries {
            match AssertUnwindSafe(self.check_entry(entry))
                .catch_unwind()
                .await
            {
                Ok(Some(alert)) => sent.push(alert),
                Ok(None) => {}
                Err(payload) => {
                    let error = UnexpectedError::from_panic(&entry.symbol, payload);
                    error!(symbol = %entry.symbol, %error, "cannot get stock info");
                }
            }
        }

        sent
    }

    async fn check_entry(&self, entry: &WatchEntry) -> Option<AlertEvent> {
        let quote = self.quotes.fetch(&entry.symbol).await;

        let alert = match quote.price {
            None => {
                warn!(symbol = %quote.symbol, "price not found");

                AlertEvent::price_not_found(&quote.symbol)
            }
            Some(price) => {
                info!(symbol = %quote.symbol, %price, threshold = %entry.threshold, "price checked");

                if !entry.is_breached_by(price) {
                    return None;
                }

                AlertEvent::below_threshold(&entry.symbol, entry.threshold)
            }
        };

        self.notifier.notify(&alert).await;

        Some(alert)
    }
}
