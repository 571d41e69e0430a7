use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};

const REFERENCE_JSON: &str = include_str!("../data/taxonomy.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Fixed, ordered set of topics. Declaration order is the classifier's tie-break.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    topics: Vec<Topic>,
}

impl Taxonomy {
    pub fn new(topics: Vec<Topic>) -> Result<Self> {
        let taxonomy = Taxonomy { topics };
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// The ten-topic taxonomy shipped with the crate.
    pub fn reference() -> Result<Self> {
        Self::from_json(REFERENCE_JSON)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let taxonomy: Taxonomy = serde_json::from_str(raw)?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
        Self::from_json(&raw)
    }

    fn validate(&self) -> Result<()> {
        if self.topics.is_empty() {
            return Err(CorpusError::Taxonomy("no topics declared".to_string()));
        }
        let mut seen = HashSet::new();
        for topic in &self.topics {
            if !seen.insert(topic.id.as_str()) {
                return Err(CorpusError::Taxonomy(format!(
                    "duplicate topic id {:?}",
                    topic.id
                )));
            }
            if topic.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(CorpusError::Taxonomy(format!(
                    "topic {:?} has no keywords",
                    topic.id
                )));
            }
        }
        Ok(())
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Display name for a stored topic id; unknown ids are shown raw.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|t| t.name.as_str()).unwrap_or(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(id: &str, keywords: &[&str]) -> Topic {
        Topic {
            id: id.to_string(),
            name: id.to_uppercase(),
            icon: String::new(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn reference_taxonomy_has_ten_topics_in_order() {
        let t = Taxonomy::reference().unwrap();
        let ids: Vec<&str> = t.topics().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "virtue",
                "death",
                "nature",
                "duty",
                "mind",
                "time",
                "adversity",
                "relationships",
                "simplicity",
                "wisdom"
            ]
        );
        assert!(t.topics().iter().all(|t| !t.keywords.is_empty()));
    }

    #[test]
    fn display_name_falls_back_to_raw_id() {
        let t = Taxonomy::reference().unwrap();
        assert_eq!(t.display_name("duty"), "Deber y Responsabilidad");
        assert_eq!(t.display_name("retired-topic"), "retired-topic");
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        assert!(matches!(Taxonomy::new(vec![]), Err(CorpusError::Taxonomy(_))));
        let dup = vec![topic("a", &["x"]), topic("a", &["y"])];
        assert!(matches!(Taxonomy::new(dup), Err(CorpusError::Taxonomy(_))));
        let bare = vec![topic("a", &[])];
        assert!(matches!(Taxonomy::new(bare), Err(CorpusError::Taxonomy(_))));
    }
}
