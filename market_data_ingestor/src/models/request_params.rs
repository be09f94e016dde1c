use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::providers::alpaca_rest::params::AlpacaBarsParams;

/// Vendor-agnostic parameters for requesting daily bars for one symbol.
///
/// This is the standard input for every
/// [`DataProvider`](crate::providers::DataProvider) implementation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// The symbol to request (e.g. `"AAPL"`).
    pub symbol: String,

    /// First calendar date of the range (inclusive).
    pub start: NaiveDate,

    /// Last calendar date of the range (exclusive).
    ///
    /// Providers should only return bars dated strictly before this day.
    pub end: NaiveDate,

    /// Optional, provider-specific parameters.
    #[serde(default)]
    pub provider_specific: ProviderParams,
}

/// Provider-specific request options, kept out of [`BarsRequestParams`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum ProviderParams {
    #[default]
    None,
    Alpaca(AlpacaBarsParams),
}
