pub mod config;
pub mod error;
pub mod journal;
pub mod telemetry;
