use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// Returns `None` for negative or non-finite values.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 {
            Some(Price(value))
        } else {
            None
        }
    }

    /// Parses exchange-formatted prices, e.g. `"1,234.50"`.
    pub fn parse_grouped(text: &str) -> Option<Self> {
        let digits: String = text.trim().chars().filter(|c| *c != ',').collect();

        digits.parse::<f64>().ok().and_then(Price::new)
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grouped_strips_thousands_separators() {
        assert_eq!(Price::parse_grouped("1,234.50").unwrap().as_f64(), 1234.5);
        assert_eq!(Price::parse_grouped(" 12,00,000 ").unwrap().as_f64(), 1_200_000.0);
        assert_eq!(Price::parse_grouped("880").unwrap().as_f64(), 880.0);
    }

    #[test]
    fn test_parse_grouped_rejects_garbage() {
        assert!(Price::parse_grouped("").is_none());
        assert!(Price::parse_grouped("-").is_none());
        assert!(Price::parse_grouped("N/A").is_none());
        assert!(Price::parse_grouped("-5.00").is_none());
        assert!(Price::parse_grouped("NaN").is_none());
        assert!(Price::parse_grouped("inf").is_none());
    }

    #[test]
    fn test_display_uses_two_decimals() {
        assert_eq!(Price::new(100.0).unwrap().to_string(), "100.00");
        assert_eq!(Price::new(1599.456).unwrap().to_string(), "1599.46");
    }
}
