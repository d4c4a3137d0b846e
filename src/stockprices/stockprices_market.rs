use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use crate::error::QuoteFetchError;
use crate::market::quote_source::{DynamicQuoteSource, QuoteSource, build_http_client};
use crate::types::price::Price;

pub const DEFAULT_BASE_URL: &str = "https://stockprices.dev/api";

#[derive(Debug, Deserialize)]
struct StockpricesResponse {
    #[serde(rename = "Price")]
    price: Option<f64>,
}

/// Real-time US quotes from stockprices.dev. Symbols that are not stocks
/// are retried against the ETF endpoint.
///
/// With a delayed source attached, exchange-suffixed symbols (`INFY.NS`)
/// are served by it, and plain tickers fall back to it when the real-time
/// lookup fails.
pub struct StockpricesMarket {
    http: reqwest::Client,
    base_url: String,
    delayed: Option<DynamicQuoteSource>,
}

impl StockpricesMarket {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            delayed: None,
        })
    }

    pub fn with_delayed(mut self, delayed: DynamicQuoteSource) -> Self {
        self.delayed = Some(delayed);
        self
    }

    async fn fetch(&self, symbol: &str, instrument: &str) -> Result<Price, QuoteFetchError> {
        let url = format!("{}/{instrument}/{symbol}", self.base_url);

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| QuoteFetchError::unavailable(symbol, error))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| QuoteFetchError::unavailable(symbol, error))?;

        if !status.is_success() {
            let message = text.trim();
            let message = if message.is_empty() {
                status.to_string()
            } else {
                message.chars().take(512).collect()
            };

            return Err(QuoteFetchError::unavailable(
                symbol,
                format!("unexpected status {}: {message}", status.as_u16()),
            ));
        }

        Self::parse_price(symbol, &text)
    }

    fn parse_price(symbol: &str, text: &str) -> Result<Price, QuoteFetchError> {
        let payload: StockpricesResponse = serde_json::from_str(text)
            .map_err(|error| QuoteFetchError::malformed(symbol, error))?;

        payload
            .price
            .and_then(Price::new)
            .ok_or_else(|| QuoteFetchError::malformed(symbol, "missing price"))
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Malformed only when both lookups saw bad data; any transport failure
/// makes the combined error retryable.
fn combine_errors(
    symbol: &str,
    first: (&str, QuoteFetchError),
    second: (&str, QuoteFetchError),
) -> QuoteFetchError {
    let (first_label, first_error) = first;
    let (second_label, second_error) = second;
    let reason = format!("{first_label} lookup: {first_error}; {second_label} lookup: {second_error}");

    if first_error.is_malformed() && second_error.is_malformed() {
        QuoteFetchError::malformed(symbol, reason)
    } else {
        QuoteFetchError::unavailable(symbol, reason)
    }
}

impl StockpricesMarket {
    async fn real_time(&self, symbol: &str) -> Result<Price, QuoteFetchError> {
        let ticker = normalize_symbol(symbol);

        let stock_error = match self.fetch(&ticker, "stocks").await {
            Ok(price) => return Ok(price),
            Err(error) => error,
        };

        debug!(%ticker, %stock_error, "stock lookup failed, trying etfs");

        self.fetch(&ticker, "etfs")
            .await
            .map_err(|etf_error| combine_errors(symbol, ("stocks", stock_error), ("etfs", etf_error)))
    }
}

#[async_trait]
impl QuoteSource for StockpricesMarket {
    async fn last_price(&self, symbol: &str) -> Result<Price, QuoteFetchError> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(QuoteFetchError::malformed(symbol, "symbol cannot be empty"));
        }

        if trimmed.contains('.') {
            return match &self.delayed {
                Some(delayed) => delayed.last_price(symbol).await,
                None => Err(QuoteFetchError::unavailable(
                    symbol,
                    "exchange-suffixed symbols need delayed quotes, enable --allow-delayed",
                )),
            };
        }

        let real_time_error = match self.real_time(symbol).await {
            Ok(price) => return Ok(price),
            Err(error) => error,
        };

        let Some(delayed) = &self.delayed else {
            return Err(real_time_error);
        };

        debug!(%symbol, %real_time_error, "real-time lookup failed, trying delayed quotes");

        delayed
            .last_price(symbol)
            .await
            .map_err(|delayed_error| {
                combine_errors(symbol, ("real-time", real_time_error), ("delayed", delayed_error))
            })
    }
}
