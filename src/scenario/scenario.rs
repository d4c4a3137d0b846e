use anyhow::Result;
use tracing::warn;

use crate::{
    config::settings::Settings,
    market::quote_source::DynamicQuoteSource,
    notify::{
        desktop_notifier::{DesktopNotifier, Platform},
        log_notifier::LogNotifier,
        notifier::DynamicNotifier,
    },
    nse::nse_market::{self, NseMarket},
    scenario::{notifiers::NotifierKind, providers::ProviderKind},
    stockprices::stockprices_market::{self, StockpricesMarket},
    stooq::stooq_market::{self, StooqMarket},
};

pub struct Scenario;

impl Scenario {
    pub fn quote_source(
        kind: ProviderKind,
        allow_delayed: bool,
        settings: &Settings,
    ) -> Result<DynamicQuoteSource> {
        tracing::info!(provider = %kind, allow_delayed, "creating quote source");

        let timeout = settings.request_timeout();

        let source: DynamicQuoteSource = match kind {
            ProviderKind::Nse => {
                let url = settings
                    .quote_base_url
                    .as_deref()
                    .unwrap_or(nse_market::DEFAULT_QUOTE_URL);

                Box::new(NseMarket::new(url, timeout)?)
            }
            ProviderKind::Stockprices => {
                let url = settings
                    .quote_base_url
                    .as_deref()
                    .unwrap_or(stockprices_market::DEFAULT_BASE_URL);

                let market = StockpricesMarket::new(url, timeout)?;

                if allow_delayed {
                    let delayed = StooqMarket::new(stooq_market::DEFAULT_QUOTE_URL, timeout)?;
                    Box::new(market.with_delayed(Box::new(delayed)))
                } else {
                    Box::new(market)
                }
            }
            ProviderKind::Stooq => {
                let url = settings
                    .quote_base_url
                    .as_deref()
                    .unwrap_or(stooq_market::DEFAULT_QUOTE_URL);

                Box::new(StooqMarket::new(url, timeout)?)
            }
        };

        if allow_delayed && kind != ProviderKind::Stockprices {
            warn!(provider = %kind, "--allow-delayed only applies to the stockprices provider");
        }

        Ok(source)
    }

    pub fn notifier(kind: NotifierKind, settings: &Settings) -> DynamicNotifier {
        tracing::info!(notifier = %kind, "creating notifier");

        match (kind, Platform::host()) {
            (NotifierKind::Desktop, Some(platform)) => {
                Box::new(DesktopNotifier::new(platform, settings.sound_file.clone()))
            }
            (NotifierKind::Desktop, None) => {
                warn!("desktop notifications are not supported on this platform, logging alerts instead");

                Box::new(LogNotifier)
            }
            (NotifierKind::Log, _) => Box::new(LogNotifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_provider_builds_with_default_settings() {
        let settings = Settings::default();

        for kind in [ProviderKind::Nse, ProviderKind::Stockprices, ProviderKind::Stooq] {
            for allow_delayed in [false, true] {
                assert!(
                    Scenario::quote_source(kind, allow_delayed, &settings).is_ok(),
                    "{kind} allow_delayed={allow_delayed}"
                );
            }
        }
    }

    #[test]
    fn test_invalid_base_url_is_a_startup_error() {
        let settings = Settings {
            quote_base_url: Some("not a url".to_string()),
            ..Settings::default()
        };

        assert!(Scenario::quote_source(ProviderKind::Stooq, false, &settings).is_err());
        assert!(Scenario::quote_source(ProviderKind::Nse, false, &settings).is_err());
    }
}
