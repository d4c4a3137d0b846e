use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;
use url::Url;

use crate::error::QuoteFetchError;
use crate::market::quote_source::{QuoteSource, build_http_client};
use crate::types::price::Price;

pub const DEFAULT_QUOTE_URL: &str = "https://stooq.com/q/l/";

/* headerless rows are Symbol,Date,Time,Open,High,Low,Close,Volume */
const HEADERLESS_CLOSE_INDEX: usize = 6;

/// Delayed end-of-day style quotes from stooq.com, served as CSV.
#[derive(Debug, Clone)]
pub struct StooqMarket {
    http: reqwest::Client,
    quote_url: Url,
}

impl StooqMarket {
    pub fn new(quote_url: &str, timeout: Duration) -> Result<Self> {
        let quote_url =
            Url::parse(quote_url).with_context(|| format!("invalid stooq quote url {quote_url}"))?;

        Ok(Self {
            http: build_http_client(timeout)?,
            quote_url,
        })
    }

    fn url_for(&self, symbol: &str) -> Url {
        let mut url = self.quote_url.clone();
        url.query_pairs_mut()
            .append_pair("s", symbol)
            .append_pair("i", "d");
        url
    }

    fn parse_close(symbol: &str, text: &str) -> Result<Price, QuoteFetchError> {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes())
            .records()
            .collect::<Result<Vec<StringRecord>, _>>()
            .map_err(|error| QuoteFetchError::malformed(symbol, error))?;

        let first = records
            .first()
            .ok_or_else(|| QuoteFetchError::malformed(symbol, "empty quote response"))?;

        let has_header = records.len() > 1
            && first
                .get(0)
                .is_some_and(|name| name.eq_ignore_ascii_case("Symbol"));

        let (row, close_index) = if has_header {
            let index = first
                .iter()
                .position(|name| name.eq_ignore_ascii_case("Close"));

            (&records[1], index)
        } else if first.len() > HEADERLESS_CLOSE_INDEX {
            (first, Some(HEADERLESS_CLOSE_INDEX))
        } else {
            (first, None)
        };

        let close = close_index
            .and_then(|index| row.get(index))
            .ok_or_else(|| QuoteFetchError::malformed(symbol, "close price not found"))?;

        if close.is_empty() || close.eq_ignore_ascii_case("N/D") {
            return Err(QuoteFetchError::malformed(symbol, "close price unavailable"));
        }

        close
            .parse::<f64>()
            .ok()
            .and_then(Price::new)
            .ok_or_else(|| QuoteFetchError::malformed(symbol, format!("invalid close price {close:?}")))
    }
}

/// Plain tickers are taken as US listings: `"TSLA"` becomes `"tsla.us"`.
pub fn normalize_symbol(symbol: &str) -> String {
    let symbol = symbol.trim().to_lowercase();

    if symbol.is_empty() || symbol.contains('.') {
        symbol
    } else {
        format!("{symbol}.us")
    }
}

#[async_trait]
impl QuoteSource for StooqMarket {
    async fn last_price(&self, symbol: &str) -> Result<Price, QuoteFetchError> {
        let stooq_symbol = normalize_symbol(symbol);
        if stooq_symbol.is_empty() {
            return Err(QuoteFetchError::malformed(symbol, "symbol cannot be empty"));
        }

        let response = self
            .http
            .get(self.url_for(&stooq_symbol))
            .send()
            .await
            .map_err(|error| QuoteFetchError::unavailable(symbol, error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteFetchError::unavailable(
                symbol,
                format!("unexpected status {}", status.as_u16()),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|error| QuoteFetchError::unavailable(symbol, error))?;

        debug!(%symbol, %stooq_symbol, "stooq quote received");

        Self::parse_close(symbol, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        let cases = [
            ("", ""),
            ("TSLA", "tsla.us"),
            ("INFY.NS", "infy.ns"),
            ("  BRK.B ", "brk.b"),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize_symbol(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_parse_close_shapes() {
        let cases = [
            (
                "with header",
                "Symbol,Date,Time,Open,High,Low,Close,Volume\r\nAAPL.US,2024-01-03,22:00:09,184.22,185.88,183.43,184.25,58414460\r\n",
                184.25,
            ),
            (
                "without header",
                "AAPL.US,20240103,220009,184.22,185.88,183.43,184.25,58414460\n",
                184.25,
            ),
            ("reordered header", "Symbol,Close\nINFY.NS, 1512.4 \n", 1512.4),
        ];

        for (name, body, expected) in cases {
            let price = StooqMarket::parse_close("AAPL", body)
                .unwrap_or_else(|error| panic!("{name}: {error}"));
            assert_eq!(price.as_f64(), expected, "{name}");
        }
    }

    #[test]
    fn test_parse_close_failures_are_malformed() {
        let cases = [
            ("empty", ""),
            ("no data", "INFY.NS,N/D,N/D,N/D,N/D,N/D,N/D,N/D\n"),
            ("short row", "INFY.NS,N/D\n"),
            ("header without close", "Symbol,Date\nINFY.NS,2024-01-03\n"),
            ("blank close", "Symbol,Close\nINFY.NS,\n"),
            ("text close", "Symbol,Close\nINFY.NS,closed\n"),
            ("lone header", "Symbol,Date,Time,Open,High,Low,Close,Volume\n"),
        ];

        for (name, body) in cases {
            let error = StooqMarket::parse_close("INFY.NS", body).unwrap_err();
            assert!(error.is_malformed(), "{name}: {error}");
        }
    }

    #[test]
    fn test_url_for_adds_daily_interval() {
        let market = StooqMarket::new(DEFAULT_QUOTE_URL, Duration::from_secs(1)).unwrap();

        assert_eq!(
            market.url_for("tsla.us").as_str(),
            "https://stooq.com/q/l/?s=tsla.us&i=d"
        );
    }
}
