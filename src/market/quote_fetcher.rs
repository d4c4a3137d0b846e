use tracing::error;

use crate::market::quote_source::DynamicQuoteSource;
use crate::types::quote::Quote;

/// Turns quote source failures into missing prices so one bad symbol
/// cannot stop a sweep.
pub struct QuoteFetcher {
    source: DynamicQuoteSource,
}

impl QuoteFetcher {
    pub fn new(source: DynamicQuoteSource) -> Self {
        Self { source }
    }

    pub async fn fetch(&self, symbol: &str) -> Quote {
        match self.source.last_price(symbol).await {
            Ok(price) if price.is_zero() => {
                error!(%symbol, "quote source returned a zero price");

                Quote::missing(symbol)
            }
            Ok(price) => Quote::found(symbol, price),
            Err(error) => {
                if error.is_malformed() {
                    error!(%symbol, %error, "invalid stock name or data format");
                } else {
                    error!(%symbol, %error, "cannot get stock info");
                }

                Quote::missing(symbol)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::QuoteFetchError;
    use crate::market::quote_source::QuoteSource;
    use crate::types::price::Price;

    struct FixedSource(Result<f64, QuoteFetchError>);

    #[async_trait]
    impl QuoteSource for FixedSource {
        async fn last_price(&self, _symbol: &str) -> Result<Price, QuoteFetchError> {
            self.0.clone().map(|value| Price::new(value).unwrap())
        }
    }

    fn fetcher(result: Result<f64, QuoteFetchError>) -> QuoteFetcher {
        QuoteFetcher::new(Box::new(FixedSource(result)))
    }

    #[tokio::test]
    async fn test_fetch_returns_price() {
        let quote = fetcher(Ok(880.5)).fetch("ICICIBANK").await;

        assert_eq!(quote.symbol, "ICICIBANK");
        assert_eq!(quote.price, Price::new(880.5));
    }

    #[tokio::test]
    async fn test_zero_price_is_treated_as_failure() {
        let quote = fetcher(Ok(0.0)).fetch("ICICIBANK").await;
        assert_eq!(quote.price, None);
    }

    #[tokio::test]
    async fn test_errors_map_to_missing_price() {
        let unavailable = fetcher(Err(QuoteFetchError::unavailable("HDFCBANK", "timeout")));
        assert_eq!(unavailable.fetch("HDFCBANK").await.price, None);

        let malformed = fetcher(Err(QuoteFetchError::malformed("HDFCBANK", "empty data")));
        assert_eq!(malformed.fetch("HDFCBANK").await.price, None);
    }
}
