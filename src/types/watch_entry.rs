use crate::types::price::Price;

#[derive(Debug, Clone, PartialEq)]
pub struct WatchEntry {
    pub symbol: String,

    /// Alert when the price falls to or below this value.
    pub threshold: Price,
}

impl WatchEntry {
    pub fn new(symbol: impl Into<String>, threshold: Price) -> Self {
        Self {
            symbol: symbol.into(),
            threshold,
        }
    }

    pub fn is_breached_by(&self, price: Price) -> bool {
        price <= self.threshold
    }
}
