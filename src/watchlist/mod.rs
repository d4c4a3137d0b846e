pub mod watchlist_loader;
