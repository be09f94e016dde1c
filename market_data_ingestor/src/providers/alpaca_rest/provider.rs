use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;
use tracing::{debug, info};

use crate::{
    models::{Bar, TimeSeries, request_params::BarsRequestParams},
    providers::{
        DataProvider, ProviderError, ProviderInitError,
        alpaca_rest::{
            params::{construct_params, validate_range},
            response::AlpacaResponse,
        },
        errors::{
            ApiSnafu, ClientBuildSnafu, InvalidApiKeySnafu, InvalidSeriesSnafu,
            MissingEnvVarSnafu, ReqwestSnafu,
        },
    },
};

const BASE_URL: &str = "https://data.alpaca.markets/v2/stocks/bars";

pub const API_KEY_ENV: &str = "APCA_API_KEY_ID";
pub const API_SECRET_ENV: &str = "APCA_API_SECRET_KEY";

pub struct AlpacaProvider {
    client: Client,
    base_url: String,
    // Alpaca allows 200 requests per minute on the free plan.
    limiter: DefaultDirectRateLimiter,
    _api_key: SecretString,
    _secret_key: SecretString,
}

impl AlpacaProvider {
    /// Creates a new Alpaca provider.
    ///
    /// Reads API keys from the `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY`
    /// environment variables.
    pub fn new() -> Result<Self, ProviderInitError> {
        let api_key = SecretString::new(get_env_var(API_KEY_ENV).context(MissingEnvVarSnafu)?.into());
        let secret_key =
            SecretString::new(get_env_var(API_SECRET_ENV).context(MissingEnvVarSnafu)?.into());

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(api_key.expose_secret()).context(InvalidApiKeySnafu)?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(secret_key.expose_secret())
                .context(InvalidApiKeySnafu)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            limiter: RateLimiter::direct(Quota::per_minute(nonzero!(200u32))),
            _api_key: api_key,
            _secret_key: secret_key,
        })
    }

    /// Point the provider at a different endpoint (e.g. a local proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl DataProvider for AlpacaProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<TimeSeries, ProviderError> {
        validate_range(&params)?;

        let mut bars: Vec<Bar> = Vec::new();
        let mut next_page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut query_params = construct_params(&params);
            if let Some(token) = &next_page_token {
                query_params.push(("page_token".to_string(), token.clone()));
            }

            self.limiter.until_ready().await;
            let response = self
                .client
                .get(&self.base_url)
                .query(&query_params)
                .send()
                .await
                .context(ReqwestSnafu)?;

            let status = response.status();
            if !status.is_success() {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown API error".to_string());
                return ApiSnafu {
                    status: status.as_u16(),
                    message,
                }
                .fail();
            }

            let page = response
                .json::<AlpacaResponse>()
                .await
                .context(ReqwestSnafu)?;
            pages += 1;

            // Single-symbol requests, so every page holds at most one entry.
            for (_symbol, page_bars) in page.bars.unwrap_or_default() {
                bars.extend(page_bars.into_iter().map(Bar::from));
            }
            debug!(page = pages, total_bars = bars.len(), "received Alpaca page");

            match page.next_page_token {
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }

        info!(symbol = %params.symbol, bars = bars.len(), pages, "fetched daily bars");
        TimeSeries::new(params.symbol.trim().to_uppercase(), bars).context(InvalidSeriesSnafu)
    }
}
