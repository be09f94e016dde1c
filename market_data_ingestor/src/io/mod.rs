pub mod sink;
pub mod source;

pub use sink::{CsvSink, DataSink, SinkError};
pub use source::{CsvSource, DataSource, SourceError};
