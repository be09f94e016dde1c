pub mod commands;
pub mod params;

pub use commands::run;
pub use params::Cli;
