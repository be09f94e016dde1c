//! Alpaca market data v2 REST adapter (`/v2/stocks/bars`, daily bars).

pub mod params;
pub mod provider;
pub mod response;

pub use provider::AlpacaProvider;
