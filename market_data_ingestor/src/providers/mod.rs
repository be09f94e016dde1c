//! Provider abstraction for market data sources.
//!
//! [`DataProvider`] is the single interface used to download daily bars from a
//! market data vendor. Each vendor adapter (currently only Alpaca's REST API)
//! implements it and owns its own request/response mapping and validation.
//!
//! The trait is async and object safe, so callers can pick a provider at
//! runtime behind `Box<dyn DataProvider>`.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{TimeSeries, request_params::BarsRequestParams};
//! use market_data_ingestor::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_bars(
//!         &self,
//!         params: BarsRequestParams,
//!     ) -> Result<TimeSeries, ProviderError> {
//!         Ok(TimeSeries::new(params.symbol, vec![]).expect("empty series is valid"))
//!     }
//! }
//! ```

pub mod alpaca_rest;
pub mod errors;

use async_trait::async_trait;

pub use errors::{ProviderError, ProviderInitError};

use crate::models::{TimeSeries, request_params::BarsRequestParams};

/// Fetches daily bar data from a market data vendor.
#[async_trait]
pub trait DataProvider {
    /// Download the bars described by `params`.
    ///
    /// An empty [`TimeSeries`] means the vendor had no data for the range; it
    /// is not an error.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<TimeSeries, ProviderError>;
}
