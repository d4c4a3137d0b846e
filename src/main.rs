mod config;
mod error;
mod market;
mod notify;
mod nse;
mod scenario;
mod scheduling;
mod stockprices;
mod stooq;
mod types;
mod watchlist;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::settings::Settings;
use crate::market::market_clock::{MarketClock, SystemClock};
use crate::market::quote_fetcher::QuoteFetcher;
use crate::scenario::notifiers::NotifierKind;
use crate::scenario::providers::ProviderKind;
use crate::scenario::scenario::Scenario;
use crate::scheduling::poll_loop::PollLoop;
use crate::scheduling::sleeper::TokioSleeper;
use crate::watchlist::watchlist_loader::JsonWatchlist;

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Desktop alerts when a watched stock falls to its alert price")]
struct Args {
    /// JSON object of stock symbol to alert price, re-read every sweep.
    #[arg(long, env = "STOCKS_WATCHLIST", default_value = "stocks.json")]
    pub watchlist: PathBuf,

    #[arg(long, env = "STOCKS_SETTINGS", default_value = "notifier.yml")]
    pub settings: PathBuf,

    #[arg(long, value_enum, default_value = "nse")]
    pub provider: ProviderKind,

    /// Let the stockprices provider fall back to delayed stooq.com quotes,
    /// and serve exchange-suffixed symbols such as INFY.NS from them.
    #[arg(long, env = "STOCKS_NOTIFIER_ALLOW_DELAYED")]
    pub allow_delayed: bool,

    #[arg(long, value_enum, default_value = "desktop")]
    pub notifier: NotifierKind,

    /// Sweep the watchlist once, ignoring market hours, and exit.
    #[arg(long)]
    pub once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stock_notifier=info")),
        )
        .with_target(true)
        .init();

    let args = Args::parse();
    let settings = Settings::load(&args.settings)?;

    let offset = settings.utc_offset()?;
    if offset.is_none() {
        info!("no utc_offset_minutes configured, market hours follow the host timezone");
    }

    let (shutdown_sender, shutdown_receiver) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested");
                let _ = shutdown_sender.send(true);
            }
            Err(error) => {
                error!(?error, "cannot listen for ctrl-c; stop the process externally");
                std::future::pending::<()>().await;
            }
        }
    });

    let poll_loop = PollLoop::new(
        Box::new(SystemClock::new(offset)),
        MarketClock::new(settings.market_hours),
        Box::new(JsonWatchlist::new(&args.watchlist)),
        QuoteFetcher::new(Scenario::quote_source(args.provider, args.allow_delayed, &settings)?),
        Scenario::notifier(args.notifier, &settings),
        Box::new(TokioSleeper::new(shutdown_receiver)),
    );

    info!(watchlist = %args.watchlist.display(), provider = %args.provider, "stock notifier ready");

    if args.once {
        let sent = poll_loop.run_cycle().await;
        info!(alerts = sent.len(), "single sweep finished");

        return Ok(());
    }

    poll_loop.run().await;

    Ok(())
}
