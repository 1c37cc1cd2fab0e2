pub mod config;
pub mod extraction;
pub mod fetcher;
pub mod models;
pub mod store;
pub mod tracker;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use extraction::{PriceExtractor, RawDocument, normalize};
pub use models::{ExtractionOutcome, PriceValue, Provenance};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
