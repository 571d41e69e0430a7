//! Page text providers. A document reader only has to answer "how many pages"
//! and "text of page i"; anything past the end reads as an empty page.

use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{CorpusError, Result};

pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Text of the 0-based page `index`, or `None` when the page does not exist.
    fn page_text(&self, index: usize) -> Option<String>;
}

impl PageSource for Vec<String> {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_text(&self, index: usize) -> Option<String> {
        self.get(index).cloned()
    }
}

/// Plain-text dump with pages separated by form feeds, as written by `pdftotext`.
#[derive(Debug, Clone)]
pub struct PagedTextFile {
    pages: Vec<String>,
}

impl PagedTextFile {
    pub fn open(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
        Ok(Self::parse(&raw))
    }

    pub fn parse(raw: &str) -> Self {
        let raw = raw.replace("\r\n", "\n");
        let mut pages: Vec<String> = raw.split('\x0C').map(str::to_string).collect();
        // pdftotext terminates the last page with a form feed too
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        PagedTextFile { pages }
    }
}

impl PageSource for PagedTextFile {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Option<String> {
        self.pages.get(index).cloned()
    }
}

/// One text file per page, ordered by file name (`page-0001.txt`, ...).
#[derive(Debug, Clone)]
pub struct PageDirectory {
    files: Vec<PathBuf>,
}

impl PageDirectory {
    pub fn open(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| CorpusError::io(dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| CorpusError::io(dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
                files.push(path);
            }
        }
        files.sort();
        Ok(PageDirectory { files })
    }
}

impl PageSource for PageDirectory {
    fn page_count(&self) -> usize {
        self.files.len()
    }

    fn page_text(&self, index: usize) -> Option<String> {
        let path = self.files.get(index)?;
        match std::fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(path = ?path, error = %e, "unreadable page treated as empty");
                None
            }
        }
    }
}

/// Opens a directory as [`PageDirectory`] and anything else as [`PagedTextFile`].
pub fn open(path: &Path) -> Result<Box<dyn PageSource + Send + Sync>> {
    if path.is_dir() {
        Ok(Box::new(PageDirectory::open(path)?))
    } else {
        Ok(Box::new(PagedTextFile::open(path)?))
    }
}

/// Concatenates pages in order, each followed by a line break. Indices past
/// the end of the source are skipped.
pub fn assemble_pages<S: PageSource + ?Sized>(source: &S, pages: Range<usize>) -> String {
    let end = pages.end.min(source.page_count());
    let mut text = String::new();
    for index in pages.start..end {
        if let Some(page) = source.page_text(index) {
            text.push_str(&page);
        }
        text.push('\n');
    }
    text
}
