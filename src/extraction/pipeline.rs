use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use super::body_text::BodyTextExtractor;
use super::document::RawDocument;
use super::markup::MarkupExtractor;
use super::structured_data::extract_from_structured_blocks;
use crate::config::ExtractorConfig;
use crate::models::{ExtractionOutcome, PriceValue, Provenance};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    TryingStructuredData,
    TryingMarkup,
    TryingBodyText,
    Resolved {
        price: PriceValue,
        provenance: Provenance,
    },
    Exhausted,
}

impl PipelineState {
    /// State that follows when the current one produced no price.
    fn on_miss(self) -> Self {
        match self {
            PipelineState::NotStarted => PipelineState::TryingStructuredData,
            PipelineState::TryingStructuredData => PipelineState::TryingMarkup,
            PipelineState::TryingMarkup => PipelineState::TryingBodyText,
            PipelineState::TryingBodyText => PipelineState::Exhausted,
            terminal => terminal,
        }
    }
}

/// Detects the canonical price of a page.
///
/// Signal sources are tried strictly one after another: embedded structured data,
/// then metadata tags and price selectors, then a scan of the visible text. The
/// first source that yields a price decides the outcome. Holds only compiled
/// selectors and patterns, so one instance can serve any number of documents.
#[derive(Debug)]
pub struct PriceExtractor {
    markup: MarkupExtractor,
    body_text: BodyTextExtractor,
}

impl PriceExtractor {
    pub fn new() -> Self {
        Self {
            markup: MarkupExtractor::default(),
            body_text: BodyTextExtractor::default(),
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            markup: MarkupExtractor::new(
                config.meta_selectors.as_slice(),
                config.price_selectors.as_slice(),
            )?,
            body_text: BodyTextExtractor::new(config.currency_symbols.as_slice())?,
        })
    }

    pub fn extract_from_html(&self, body: &str) -> ExtractionOutcome {
        let doc = RawDocument::parse(body);
        self.extract(&doc)
    }

    pub fn extract(&self, doc: &RawDocument) -> ExtractionOutcome {
        let mut state = PipelineState::NotStarted;

        loop {
            let found = match state {
                PipelineState::NotStarted => None,
                PipelineState::TryingStructuredData => run_stage("structured data", || {
                    extract_from_structured_blocks(&doc.structured_data_blocks())
                        .map(|price| (price, Provenance::StructuredData))
                }),
                PipelineState::TryingMarkup => run_stage("markup", || self.markup.extract(doc)),
                PipelineState::TryingBodyText => run_stage("body text", || {
                    self.body_text
                        .extract(&doc.body_text())
                        .map(|price| (price, Provenance::BodyText))
                }),
                PipelineState::Resolved { price, provenance } => {
                    debug!("Price {} resolved from {}", price, provenance);
                    return ExtractionOutcome::Resolved { price, provenance };
                }
                PipelineState::Exhausted => {
                    debug!("Every price signal exhausted");
                    return ExtractionOutcome::Exhausted;
                }
            };

            state = match found {
                Some((price, provenance)) => PipelineState::Resolved { price, provenance },
                None => state.on_miss(),
            };
        }
    }
}

impl Default for PriceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one stage; a panic inside it counts as that stage finding nothing.
fn run_stage<F>(stage: &str, f: F) -> Option<(PriceValue, Provenance)>
where
    F: FnOnce() -> Option<(PriceValue, Provenance)>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(found) => found,
        Err(_) => {
            warn!("Price extraction stage '{}' failed unexpectedly, skipping it", stage);
            None
        }
    }
}
