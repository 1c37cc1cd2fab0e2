pub mod price;
pub mod tracked_item;

// Re-exports for convenience
pub use price::*;
pub use tracked_item::*;
