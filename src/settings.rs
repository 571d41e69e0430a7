use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_FILE: &str = "stoic_corpus.toml";

/// Half-open, 0-based page range `[start_page, end_page)` belonging to one book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BookRange {
    pub book: u32,
    pub start_page: usize,
    pub end_page: usize,
}

impl BookRange {
    pub const fn new(book: u32, start_page: usize, end_page: usize) -> Self {
        BookRange {
            book,
            start_page,
            end_page,
        }
    }
}

/// Page layout of the reference scan, books I..XII (the index starts at page 210).
const REFERENCE_BOOKS: [BookRange; 12] = [
    BookRange::new(1, 44, 56),
    BookRange::new(2, 56, 65),
    BookRange::new(3, 65, 76),
    BookRange::new(4, 76, 92),
    BookRange::new(5, 92, 107),
    BookRange::new(6, 107, 123),
    BookRange::new(7, 123, 139),
    BookRange::new(8, 139, 155),
    BookRange::new(9, 155, 170),
    BookRange::new(10, 170, 185),
    BookRange::new(11, 185, 198),
    BookRange::new(12, 198, 210),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_themes: usize,
    pub min_score: u32,
    pub fallback_theme: String,
    /// Passages must be strictly longer than this many characters.
    pub min_passage_chars: usize,
    /// Footnote cut markers only truncate past this character offset.
    pub cut_min_offset: usize,
    pub author: String,
    pub title: String,
    pub description: String,
    pub taxonomy_path: Option<PathBuf>,
    pub books: Vec<BookRange>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_themes: 3,
            min_score: 2,
            fallback_theme: "wisdom".to_string(),
            min_passage_chars: 10,
            cut_min_offset: 50,
            author: "Marco Aurelio".to_string(),
            title: "Meditaciones".to_string(),
            description: "Reflexiones del emperador filósofo romano Marco Aurelio (121-180 d.C.)"
                .to_string(),
            taxonomy_path: None,
            books: REFERENCE_BOOKS.to_vec(),
        }
    }
}

impl Settings {
    /// Defaults, then the optional TOML file, then `STOIC_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file_source = match file {
            Some(path) => File::from(path.to_path_buf()).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };
        let settings = Config::builder()
            .add_source(file_source)
            .add_source(Environment::with_prefix("STOIC").try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}
