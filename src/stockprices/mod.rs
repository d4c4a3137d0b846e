pub mod stockprices_market;
