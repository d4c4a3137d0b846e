use std::fmt;

use crate::types::price::Price;

pub const ALERT_TITLE: &str = "Stock price alert";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEvent {
    pub title: String,
    pub message: String,
}

impl AlertEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            message: message.into(),
        }
    }

    pub fn watchlist_problem(error: &impl fmt::Display) -> Self {
        Self::new(format!(
            "There is problem with your watchlist, error: {error}"
        ))
    }

    pub fn price_not_found(symbol: &str) -> Self {
        Self::new(format!("Error, couldn't find price of stock: {symbol}"))
    }

    pub fn below_threshold(symbol: &str, threshold: Price) -> Self {
        Self::new(format!("{symbol} stock price is less than {threshold}"))
    }
}

impl fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}
