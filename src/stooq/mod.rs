pub mod stooq_market;
