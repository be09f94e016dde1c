use chrono::{Duration, Utc};
use market_data_ingestor::{
    models::request_params::{BarsRequestParams, ProviderParams},
    providers::{
        DataProvider, ProviderError, ProviderInitError,
        alpaca_rest::{
            params::{AlpacaBarsParams, Feed},
            provider::{API_KEY_ENV, API_SECRET_ENV, AlpacaProvider},
        },
    },
};
use serial_test::serial;

#[test]
#[serial]
fn missing_credentials_fail_construction() {
    let saved = std::env::var(API_KEY_ENV).ok();
    unsafe { std::env::remove_var(API_KEY_ENV) };

    let result = AlpacaProvider::new();
    assert!(matches!(
        result,
        Err(ProviderInitError::MissingEnvVar { .. })
    ));

    if let Some(value) = saved {
        unsafe { std::env::set_var(API_KEY_ENV, value) };
    }
}

#[tokio::test]
#[serial]
async fn inverted_range_is_rejected_before_any_request() {
    unsafe {
        std::env::set_var(API_KEY_ENV, "test-key");
        std::env::set_var(API_SECRET_ENV, "test-secret");
    }
    // Unroutable base URL: the request must never be attempted.
    let provider = AlpacaProvider::new()
        .unwrap()
        .with_base_url("http://127.0.0.1:9/never");

    let today = Utc::now().date_naive();
    let result = provider
        .fetch_bars(BarsRequestParams {
            symbol: "AAPL".into(),
            start: today,
            end: today - Duration::days(3),
            provider_specific: ProviderParams::None,
        })
        .await;

    assert!(matches!(result, Err(ProviderError::Validation { .. })));
    unsafe {
        std::env::remove_var(API_KEY_ENV);
        std::env::remove_var(API_SECRET_ENV);
    }
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_alpaca_provider_fetch_bars() {
    // Requires real APCA_API_KEY_ID and APCA_API_SECRET_KEY credentials.
    if std::env::var(API_KEY_ENV).is_err() || std::env::var(API_SECRET_ENV).is_err() {
        println!("Skipping test_alpaca_provider_fetch_bars: API keys not set.");
        return;
    }

    let provider = AlpacaProvider::new().expect("Failed to create AlpacaProvider");

    let end = Utc::now().date_naive() - Duration::days(1);
    let params = BarsRequestParams {
        symbol: "aapl".to_string(),
        start: end - Duration::days(30),
        end,
        provider_specific: ProviderParams::Alpaca(AlpacaBarsParams {
            feed: Some(Feed::Iex),
            ..Default::default()
        }),
    };

    let series = provider
        .fetch_bars(params)
        .await
        .expect("fetch_bars returned an error");

    assert_eq!(series.symbol(), "AAPL");
    assert!(!series.is_empty(), "Expected at least one bar for AAPL");
    assert!(series.last().unwrap().date < end);
}
