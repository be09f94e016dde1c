pub mod annotated;
pub mod bar;
pub mod bar_series;
pub mod request_params;

pub use annotated::AnnotatedSeries;
pub use bar::Bar;
pub use bar_series::{SeriesError, TimeSeries};
