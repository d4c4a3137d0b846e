pub mod nse_market;
