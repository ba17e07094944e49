pub mod cache;
pub mod charts;
pub mod conditions;
pub mod config;
pub mod error;
pub mod soil;
pub mod synthetic;
pub mod test;
pub mod time;
pub mod utils;
