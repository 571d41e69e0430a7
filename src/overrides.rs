//! Hand-verified replacement texts keyed by `(book, chapter)`.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::classify::Classifier;
use crate::corpus::Corpus;
use crate::error::{CorpusError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Override {
    pub book: u32,
    pub chapter: u32,
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverrideTable {
    #[serde(default)]
    pub overrides: Vec<Override>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideReport {
    pub applied: usize,
    /// `(book, chapter)` keys with no passage in the corpus.
    pub unmatched: Vec<(u32, u32)>,
}

impl OverrideTable {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Replaces passage text and re-runs classification on it. `id`, `book`
    /// and `chapter` are left untouched.
    pub fn apply(&self, corpus: &mut Corpus, classifier: &Classifier) -> OverrideReport {
        let mut report = OverrideReport::default();
        for entry in &self.overrides {
            let Some(passage) = corpus.find_mut(entry.book, entry.chapter) else {
                warn!(book = entry.book, chapter = entry.chapter, "override has no matching passage");
                report.unmatched.push((entry.book, entry.chapter));
                continue;
            };
            let text = entry.text.split_whitespace().collect::<Vec<_>>().join(" ");
            info!(
                book = entry.book,
                chapter = entry.chapter,
                old_len = passage.text.chars().count(),
                new_len = text.chars().count(),
                "override applied"
            );
            passage.themes = classifier.assign(&text);
            passage.text = text;
            report.applied += 1;
        }
        report
    }
}
