//! Keyword scoring of passages against the topic taxonomy.
//!
//! A topic scores `2 * distinct + total` where `distinct` is the number of
//! different keywords found and `total` the number of occurrences. Topics
//! without any hit are left out entirely.

use std::collections::HashSet;

use regex::Regex;

use crate::error::{CorpusError, Result};
use crate::settings::Settings;
use crate::taxonomy::Taxonomy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub max_themes: usize,
    pub min_score: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            max_themes: 3,
            min_score: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicScore {
    pub topic: String,
    pub distinct: usize,
    pub total: usize,
    pub score: u32,
}

#[derive(Debug)]
struct TopicMatcher {
    id: String,
    pattern: Regex,
}

#[derive(Debug)]
pub struct Classifier {
    matchers: Vec<TopicMatcher>,
    fallback: String,
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(taxonomy: &Taxonomy, fallback: &str, config: ClassifierConfig) -> Result<Self> {
        if config.max_themes == 0 {
            return Err(CorpusError::Taxonomy("max_themes must be at least 1".to_string()));
        }
        if !taxonomy.contains(fallback) {
            return Err(CorpusError::Taxonomy(format!(
                "fallback topic {:?} is not declared",
                fallback
            )));
        }
        let matchers = taxonomy
            .topics()
            .iter()
            .map(|topic| {
                let alternatives: Vec<String> = topic
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .map(|k| regex::escape(&k))
                    .collect();
                let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
                Regex::new(&pattern)
                    .map(|pattern| TopicMatcher {
                        id: topic.id.clone(),
                        pattern,
                    })
                    .map_err(|e| CorpusError::Taxonomy(format!("topic {:?}: {}", topic.id, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Classifier {
            matchers,
            fallback: fallback.to_string(),
            config,
        })
    }

    pub fn from_settings(taxonomy: &Taxonomy, settings: &Settings) -> Result<Self> {
        Self::new(
            taxonomy,
            &settings.fallback_theme,
            ClassifierConfig {
                max_themes: settings.max_themes,
                min_score: settings.min_score,
            },
        )
    }

    /// Scores of every topic with at least one hit, best first. Equal scores
    /// keep taxonomy declaration order.
    pub fn score(&self, text: &str) -> Vec<TopicScore> {
        let lower = text.to_lowercase();
        let mut scores: Vec<TopicScore> = self
            .matchers
            .iter()
            .filter_map(|m| {
                let hits: Vec<&str> = m.pattern.find_iter(&lower).map(|h| h.as_str()).collect();
                if hits.is_empty() {
                    return None;
                }
                let distinct = hits.iter().collect::<HashSet<_>>().len();
                let total = hits.len();
                Some(TopicScore {
                    topic: m.id.clone(),
                    distinct,
                    total,
                    score: (2 * distinct + total) as u32,
                })
            })
            .collect();
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores
    }

    /// Between one and `max_themes` topic ids, most relevant first.
    pub fn assign(&self, text: &str) -> Vec<String> {
        let scores = self.score(text);
        let mut themes: Vec<String> = scores
            .iter()
            .filter(|s| s.score >= self.config.min_score)
            .take(self.config.max_themes)
            .map(|s| s.topic.clone())
            .collect();
        if themes.is_empty() {
            themes = match scores.first() {
                Some(best) => vec![best.topic.clone()],
                None => vec![self.fallback.clone()],
            };
        }
        themes
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}
