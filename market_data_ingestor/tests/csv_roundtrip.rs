use std::fs::File;

use chrono::NaiveDate;
use indexmap::IndexMap;
use market_data_ingestor::{
    io::{CsvSink, CsvSource, DataSink, DataSource},
    models::{AnnotatedSeries, Bar, TimeSeries},
};

#[test]
fn written_table_reads_back_as_the_same_series() {
    let d = |day| NaiveDate::from_ymd_opt(2023, 3, day).unwrap();
    let series = TimeSeries::new(
        "MSFT",
        vec![
            Bar::new(d(1), 250.1, 252.0, 249.0, 251.5, 2_000_000.0),
            Bar::new(d(2), 251.5, 255.25, 250.0, 254.0, 2_100_000.0),
            Bar::new(d(3), 254.0, 254.5, 248.75, 249.9, 1_900_000.0),
        ],
    )
    .unwrap();

    let mut columns = IndexMap::new();
    columns.insert("SMA".to_string(), vec![251.5, 252.75, 251.8]);
    let annotated = AnnotatedSeries::new(series.clone(), columns).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("MSFT_SMA.csv");
    let rows = CsvSink::new(File::create(&path).unwrap())
        .write(&annotated)
        .unwrap();
    assert_eq!(rows, 3);

    // The extra SMA column is ignored on the way back in.
    let read = CsvSource::new(File::open(&path).unwrap())
        .read_series("MSFT")
        .unwrap();
    assert_eq!(read, series);
}
