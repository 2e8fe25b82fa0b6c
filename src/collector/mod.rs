//! Interface selection and scrape orchestration.

pub mod config;
pub mod filter;
pub mod scrape;

pub use config::CollectorConfig;
pub use filter::{split_name_list, FilterConfig};
pub use scrape::{ScrapeHandle, ScrapeReport, TransceiverCollector};
