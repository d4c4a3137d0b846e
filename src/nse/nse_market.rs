use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::QuoteFetchError;
use crate::market::quote_source::{QuoteSource, http_client_builder};
use crate::types::price::Price;

pub const DEFAULT_QUOTE_URL: &str = "https://www.nseindia.com/api/quote-equity";

/// Equity quotes from the National Stock Exchange of India.
///
/// The quote API only answers clients holding the session cookies handed
/// out by the site's home page, so the client keeps a cookie jar and visits
/// the home page before the first quote and again after a 401/403.
#[derive(Debug)]
pub struct NseMarket {
    http: reqwest::Client,
    quote_url: Url,
    home_url: Url,
    warmed_up: AtomicBool,
}

impl NseMarket {
    pub fn new(quote_url: &str, timeout: Duration) -> Result<Self> {
        let quote_url =
            Url::parse(quote_url).with_context(|| format!("invalid NSE quote url {quote_url}"))?;
        let home_url = quote_url
            .join("/")
            .with_context(|| format!("cannot derive NSE home page from {quote_url}"))?;

        let http = http_client_builder(timeout)
            .cookie_store(true)
            .build()
            .context("failed to build NSE http client")?;

        Ok(Self {
            http,
            quote_url,
            home_url,
            warmed_up: AtomicBool::new(false),
        })
    }

    async fn warm_up(&self) {
        if self.warmed_up.load(Ordering::Acquire) {
            return;
        }

        match self.http.get(self.home_url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(url = %self.home_url, "nse session cookies refreshed");
                self.warmed_up.store(true, Ordering::Release);
            }
            Ok(response) => {
                warn!(url = %self.home_url, status = %response.status(), "nse home page refused the session");
            }
            Err(error) => warn!(url = %self.home_url, %error, "nse home page unreachable"),
        }
    }

    fn url_for(&self, symbol: &str) -> Url {
        let mut url = self.quote_url.clone();
        url.query_pairs_mut().append_pair("symbol", symbol);
        url
    }

    /* { "data": [ { "lastPrice": "1,234.50", ... } ] } */
    fn parse_last_price(symbol: &str, text: &str) -> Result<Price, QuoteFetchError> {
        let parsed: Value = serde_json::from_str(text)
            .map_err(|error| QuoteFetchError::malformed(symbol, error))?;

        let records = parsed
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| QuoteFetchError::malformed(symbol, "missing `data` array"))?;

        let first = records
            .first()
            .ok_or_else(|| QuoteFetchError::malformed(symbol, "empty `data` array"))?;

        let last_price = first
            .get("lastPrice")
            .ok_or_else(|| QuoteFetchError::malformed(symbol, "missing `lastPrice`"))?;

        let price = match last_price {
            Value::String(text) => Price::parse_grouped(text),
            Value::Number(number) => number.as_f64().and_then(Price::new),
            _ => None,
        };

        price.ok_or_else(|| {
            QuoteFetchError::malformed(symbol, format!("non-numeric lastPrice {last_price}"))
        })
    }
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

fn session_rejected(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

#[async_trait]
impl QuoteSource for NseMarket {
    async fn last_price(&self, symbol: &str) -> Result<Price, QuoteFetchError> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(QuoteFetchError::malformed(&symbol, "symbol cannot be empty"));
        }

        self.warm_up().await;

        let response = self
            .http
            .get(self.url_for(&symbol))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| QuoteFetchError::unavailable(&symbol, error))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| QuoteFetchError::unavailable(&symbol, error))?;

        if session_rejected(status) {
            self.warmed_up.store(false, Ordering::Release);

            return Err(QuoteFetchError::unavailable(
                &symbol,
                format!("http status {status}, session cookies will be refreshed"),
            ));
        }

        if !status.is_success() {
            return Err(QuoteFetchError::unavailable(
                &symbol,
                format!("http status {status}"),
            ));
        }

        debug!(%symbol, bytes = text.len(), "nse quote received");

        Self::parse_last_price(&symbol, &text)
    }
}
