use crate::types::price::Price;

/// Result of one price lookup. A missing price means the lookup failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: Option<Price>,
}

impl Quote {
    /// A zero price is never a traded price, so it is stored as missing.
    pub fn found(symbol: impl Into<String>, price: Price) -> Self {
        Self {
            symbol: symbol.into(),
            price: (!price.is_zero()).then_some(price),
        }
    }

    pub fn missing(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: None,
        }
    }
}
