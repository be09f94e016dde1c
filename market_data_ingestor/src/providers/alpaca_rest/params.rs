use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::models::request_params::{BarsRequestParams, ProviderParams};
use crate::providers::{ProviderError, errors::ValidationSnafu};

/// The only bar interval this adapter requests.
pub const DAILY_TIMEFRAME: &str = "1Day";

/// Page size requested from the API (its documented maximum).
pub const MAX_PAGE_LIMIT: u32 = 10_000;

/// Specifies the corporate action adjustment for stock data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    #[default]
    Raw,
    Split,
    Dividend,
    All,
}

impl Adjustment {
    pub fn as_str(self) -> &'static str {
        match self {
            Adjustment::Raw => "raw",
            Adjustment::Split => "split",
            Adjustment::Dividend => "dividend",
            Adjustment::All => "all",
        }
    }
}

/// Specifies the source feed for stock data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    #[default]
    Sip,
    Iex,
    Otc,
}

impl Feed {
    pub fn as_str(self) -> &'static str {
        match self {
            Feed::Sip => "sip",
            Feed::Iex => "iex",
            Feed::Otc => "otc",
        }
    }
}

/// Alpaca-specific parameters for a bars request.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AlpacaBarsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Adjustment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Reject ranges the API would answer with an empty or confusing result.
pub fn validate_range(params: &BarsRequestParams) -> Result<(), ProviderError> {
    ensure!(
        !params.symbol.trim().is_empty(),
        ValidationSnafu {
            message: "symbol must not be empty"
        }
    );
    ensure!(
        params.start < params.end,
        ValidationSnafu {
            message: format!(
                "start ({}) must be before end ({})",
                params.start, params.end
            )
        }
    );
    Ok(())
}

/// Build the query string for one page of the request.
pub fn construct_params(params: &BarsRequestParams) -> Vec<(String, String)> {
    let mut query = vec![
        ("symbols".to_string(), params.symbol.trim().to_uppercase()),
        ("timeframe".to_string(), DAILY_TIMEFRAME.to_string()),
        ("start".to_string(), params.start.format("%Y-%m-%d").to_string()),
        ("end".to_string(), params.end.format("%Y-%m-%d").to_string()),
        ("limit".to_string(), MAX_PAGE_LIMIT.to_string()),
        ("sort".to_string(), "asc".to_string()),
    ];

    if let ProviderParams::Alpaca(extra) = &params.provider_specific {
        if let Some(adjustment) = extra.adjustment {
            query.push(("adjustment".to_string(), adjustment.as_str().to_string()));
        }
        if let Some(feed) = extra.feed {
            query.push(("feed".to_string(), feed.as_str().to_string()));
        }
        if let Some(currency) = &extra.currency {
            query.push(("currency".to_string(), currency.clone()));
        }
    }
    query
}
