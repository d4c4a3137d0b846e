use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::error::QuoteFetchError;
use crate::types::price::Price;

pub type DynamicQuoteSource = Box<dyn QuoteSource + Send + Sync>;

const USER_AGENT: &str = concat!("stock-notifier/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Last traded price for `symbol`.
    async fn last_price(&self, symbol: &str) -> Result<Price, QuoteFetchError>;
}

pub fn http_client_builder(timeout: Duration) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
}

pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    http_client_builder(timeout)
        .build()
        .context("failed to build quote http client")
}
