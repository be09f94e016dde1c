use market_data_ingestor::models::SeriesError;
use thiserror::Error;

/// Errors raised by indicator computation, simulation and analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A caller-supplied parameter is outside its valid domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// The input series has no bars.
    #[error("series is empty")]
    EmptySeries,

    /// A lookback window is longer than the data available.
    #[error("insufficient history: {required} bars required, {available} available")]
    InsufficientHistory { required: usize, available: usize },

    /// A statistic has no defined value for this input (e.g. zero volatility).
    #[error("{0} is undefined for this input")]
    UndefinedStatistic(&'static str),

    /// Derived bars or columns failed series validation.
    #[error(transparent)]
    Series(#[from] SeriesError),
}

impl EngineError {
    pub(crate) fn invalid(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
