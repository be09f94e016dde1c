use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::models::Bar;

#[derive(Deserialize, Debug)]
pub struct AlpacaBar {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
}

impl From<AlpacaBar> for Bar {
    // Daily bars are stamped at the session start in UTC, so the UTC date is the trading day.
    fn from(ab: AlpacaBar) -> Self {
        Bar::new(
            ab.timestamp.date_naive(),
            ab.open,
            ab.high,
            ab.low,
            ab.close,
            ab.volume,
        )
    }
}

#[derive(Deserialize, Debug)]
pub struct AlpacaResponse {
    /// Bars keyed by symbol. `null` when the range holds no data.
    #[serde(default)]
    pub bars: Option<IndexMap<String, Vec<AlpacaBar>>>,
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn parses_page_and_maps_dates() {
        let body = r#"{
            "bars": {
                "AAPL": [
                    {"t": "2021-01-04T05:00:00Z", "o": 133.52, "h": 133.61, "l": 126.76, "c": 129.41, "v": 143301887, "n": 1310228, "vw": 129.73},
                    {"t": "2021-01-05T05:00:00Z", "o": 128.89, "h": 131.74, "l": 128.43, "c": 131.01, "v": 97664898, "n": 707583, "vw": 130.72}
                ]
            },
            "next_page_token": "QUFQTHxEfDIwMjEtMDEtMDVUMDU6MDA6MDAuMDAwMDAwMDAwWg=="
        }"#;
        let page: AlpacaResponse = serde_json::from_str(body).unwrap();
        assert!(page.next_page_token.is_some());

        let mut bars = page.bars.unwrap();
        let aapl: Vec<Bar> = bars
            .swap_remove("AAPL")
            .unwrap()
            .into_iter()
            .map(Bar::from)
            .collect();
        assert_eq!(aapl.len(), 2);
        assert_eq!(aapl[0].date, NaiveDate::from_ymd_opt(2021, 1, 4).unwrap());
        assert_eq!(aapl[1].close, 131.01);
    }

    #[test]
    fn empty_range_has_null_bars() {
        let page: AlpacaResponse =
            serde_json::from_str(r#"{"bars": null, "next_page_token": null}"#).unwrap();
        assert!(page.bars.is_none());
        assert!(page.next_page_token.is_none());
    }
}
