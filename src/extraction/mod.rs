// Price detection over an already-fetched page
pub mod body_text;
pub mod document;
pub mod markup;
pub mod normalizer;
pub mod pipeline;
pub mod structured_data;

pub use body_text::BodyTextExtractor;
pub use document::RawDocument;
pub use markup::MarkupExtractor;
pub use normalizer::normalize;
pub use pipeline::{PipelineState, PriceExtractor};
pub use structured_data::extract_from_structured_blocks;
