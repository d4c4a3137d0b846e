pub mod market_clock;
pub mod quote_fetcher;
pub mod quote_source;
