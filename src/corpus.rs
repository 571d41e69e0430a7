use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classify::Classifier;
use crate::error::{CorpusError, Result};
use crate::settings::Settings;
use crate::taxonomy::Taxonomy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub id: u32,
    pub book: u32,
    pub chapter: u32,
    pub text: String,
    pub themes: Vec<String>,
}

/// Topic as listed in the corpus file: no keywords, just what a reader displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub author: String,
    pub title: String,
    pub description: String,
    pub themes: Vec<TopicSummary>,
    #[serde(rename = "meditations")]
    pub passages: Vec<Passage>,
}

impl Corpus {
    pub fn new(settings: &Settings, taxonomy: &Taxonomy, passages: Vec<Passage>) -> Self {
        Corpus {
            author: settings.author.clone(),
            title: settings.title.clone(),
            description: settings.description.clone(),
            themes: taxonomy
                .topics()
                .iter()
                .map(|t| TopicSummary {
                    id: t.id.clone(),
                    name: t.name.clone(),
                    icon: t.icon.clone(),
                })
                .collect(),
            passages,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Overwrites `path` with the whole corpus.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        std::fs::write(path, json).map_err(|e| CorpusError::io(path, e))?;
        info!(path = ?path, passages = self.passages.len(), "corpus written");
        Ok(())
    }

    /// Recomputes the themes of every passage from its current text.
    pub fn reclassify(&mut self, classifier: &Classifier) -> usize {
        let mut changed = 0;
        for passage in &mut self.passages {
            let themes = classifier.assign(&passage.text);
            if themes != passage.themes {
                passage.themes = themes;
                changed += 1;
            }
        }
        changed
    }

    pub fn find_mut(&mut self, book: u32, chapter: u32) -> Option<&mut Passage> {
        self.passages
            .iter_mut()
            .find(|p| p.book == book && p.chapter == chapter)
    }

    /// Display name for a theme id; unknown ids fall back to the raw id.
    pub fn theme_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.themes
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
            .unwrap_or(id)
    }
}
