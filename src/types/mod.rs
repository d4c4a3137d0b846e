pub mod alert_event;
pub mod market_hours;
pub mod price;
pub mod quote;
pub mod watch_entry;
