//! Scanned-text to passage corpus pipeline: page cleaning, chapter
//! segmentation, OCR repair and keyword-based topic labelling.

pub mod classify;
pub mod corpus;
pub mod db;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod overrides;
pub mod pipeline;
pub mod settings;
pub mod source;
pub mod stats;
pub mod taxonomy;

pub use classify::{Classifier, ClassifierConfig, TopicScore};
pub use corpus::{Corpus, Passage};
pub use error::{CorpusError, Result};
pub use settings::{BookRange, Settings};
pub use taxonomy::{Taxonomy, Topic};
