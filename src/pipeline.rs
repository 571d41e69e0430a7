//! Book ranges -> extracted chapters -> numbered, classified passages.
//!
//! Books are extracted independently (in parallel with the `rayon` feature).
//! Ids are handed out afterwards in one sequential pass, book ranges in the
//! order given and chapters in the order found.

use indicatif::ProgressBar;
use tracing::info;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::classify::Classifier;
use crate::corpus::Passage;
use crate::extract::{extract_book, BookExtraction, ExtractOptions};
use crate::metrics::PassTracker;
use crate::settings::BookRange;
use crate::source::{assemble_pages, PageSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookReport {
    pub book: u32,
    pub kept: usize,
    pub malformed: usize,
    pub degenerate: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub books: Vec<BookReport>,
}

impl ExtractionReport {
    pub fn kept(&self) -> usize {
        self.books.iter().map(|b| b.kept).sum()
    }

    pub fn dropped(&self) -> usize {
        self.books.iter().map(|b| b.malformed + b.degenerate).sum()
    }
}

pub struct Pipeline<'a> {
    classifier: &'a Classifier,
    options: ExtractOptions,
    progress: ProgressBar,
}

impl<'a> Pipeline<'a> {
    pub fn new(classifier: &'a Classifier, options: ExtractOptions) -> Self {
        Pipeline {
            classifier,
            options,
            progress: ProgressBar::hidden(),
        }
    }

    /// Ticks `progress` once per finished book.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn run<S>(
        &self,
        source: &S,
        books: &[BookRange],
        tracker: &mut PassTracker,
    ) -> (Vec<Passage>, ExtractionReport)
    where
        S: PageSource + Sync + ?Sized,
    {
        self.progress.set_length(books.len() as u64);
        let extractions = self.extract_all(source, books);
        self.progress.finish_and_clear();

        let mut passages = Vec::new();
        let mut report = ExtractionReport::default();
        let mut next_id = 1;
        for extraction in extractions {
            report.books.push(BookReport {
                book: extraction.book,
                kept: extraction.chapters.len(),
                malformed: extraction.malformed,
                degenerate: extraction.degenerate,
            });
            tracker.absorb(extraction.passes);
            for chapter in extraction.chapters {
                let themes = self.classifier.assign(&chapter.text);
                passages.push(Passage {
                    id: next_id,
                    book: extraction.book,
                    chapter: chapter.number,
                    text: chapter.text,
                    themes,
                });
                next_id += 1;
            }
        }

        info!(
            passages = passages.len(),
            dropped = report.dropped(),
            "pipeline finished"
        );
        (passages, report)
    }

    #[cfg(feature = "rayon")]
    fn extract_all<S>(&self, source: &S, books: &[BookRange]) -> Vec<BookExtraction>
    where
        S: PageSource + Sync + ?Sized,
    {
        books
            .par_iter()
            .map(|range| self.extract_range(source, range))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    fn extract_all<S>(&self, source: &S, books: &[BookRange]) -> Vec<BookExtraction>
    where
        S: PageSource + Sync + ?Sized,
    {
        books
            .iter()
            .map(|range| self.extract_range(source, range))
            .collect()
    }

    fn extract_range<S>(&self, source: &S, range: &BookRange) -> BookExtraction
    where
        S: PageSource + ?Sized,
    {
        let raw = assemble_pages(source, range.start_page..range.end_page);
        let extraction = extract_book(range.book, &raw, &self.options);
        self.progress.inc(1);
        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierConfig;
    use crate::source::PagedTextFile;
    use crate::taxonomy::Taxonomy;

    fn classifier() -> Classifier {
        let taxonomy = Taxonomy::reference().unwrap();
        Classifier::new(&taxonomy, "wisdom", ClassifierConfig::default()).unwrap()
    }

    fn fixture() -> PagedTextFile {
        let raw = std::fs::read_to_string("tests/fixtures/libro_iv_pages.txt").unwrap();
        PagedTextFile::parse(&raw)
    }

    fn run(source: &PagedTextFile, books: &[BookRange]) -> (Vec<Passage>, ExtractionReport) {
        let c = classifier();
        let pipeline = Pipeline::new(&c, ExtractOptions::default());
        let mut tracker = PassTracker::new("run-test".to_string());
        pipeline.run(source, books, &mut tracker)
    }

    #[test]
    fn fixture_book_extracts_expected_chapters() {
        let (passages, report) = run(&fixture(), &[BookRange::new(4, 0, 3)]);
        let chapters: Vec<u32> = passages.iter().map(|p| p.chapter).collect();
        assert_eq!(chapters, [1, 2, 3, 4, 5, 7]);
        assert_eq!(report.books[0].degenerate, 1);
        assert_eq!(report.books[0].malformed, 0);

        let text_of = |n: u32| passages.iter().find(|p| p.chapter == n).unwrap().text.as_str();
        assert_eq!(
            text_of(1),
            "Lo que domina dentro de nosotros, cuando está de acuerdo con la naturaleza, se comporta ante los acontecimientos de modo que siempre se adapta con facilidad a lo posible. No tiene predilección por una materia determinada."
        );
        assert_eq!(
            text_of(2),
            "Que ninguna acción se realice al azar ni de otro modo que según el principio que completa el arte."
        );
        assert_eq!(
            text_of(3),
            "Buscan retiros en el campo, en la costa y en el monte; también tú sueles desear ardientemente tales retiros. Pero todo eso es de lo más vulgar, porque puedes, en el momento que quieras, retirarte en ti mismo."
        );
        assert_eq!(
            text_of(4),
            "Si la inteligencia nos es común, también la razón por la que somos racionales nos es común."
        );
        assert_eq!(
            text_of(7),
            "Todo lo que sucede, sucede justamente; lo comprobarás si observas con atención."
        );
    }

    #[test]
    fn ids_are_sequential_across_books() {
        let source = fixture();
        let books = [BookRange::new(1, 0, 1), BookRange::new(2, 1, 3)];
        let (passages, _) = run(&source, &books);
        let ids: Vec<u32> = passages.iter().map(|p| p.id).collect();
        let expected: Vec<u32> = (1..=passages.len() as u32).collect();
        assert_eq!(ids, expected);
        for pair in passages.windows(2) {
            assert!((pair[0].book, pair[0].chapter) <= (pair[1].book, pair[1].chapter));
        }
        assert_eq!(passages.first().map(|p| p.book), Some(1));
        assert_eq!(passages.last().map(|p| p.book), Some(2));
    }

    #[test]
    fn every_passage_has_bounded_themes() {
        let (passages, _) = run(&fixture(), &[BookRange::new(4, 0, 3)]);
        for p in &passages {
            assert!(!p.themes.is_empty() && p.themes.len() <= 3, "{:?}", p);
        }
    }

    #[test]
    fn runs_are_deterministic() {
        let source = fixture();
        let books = [BookRange::new(4, 0, 3)];
        assert_eq!(run(&source, &books).0, run(&source, &books).0);
    }

    #[test]
    fn missing_pages_yield_empty_book() {
        let (passages, report) = run(&fixture(), &[BookRange::new(9, 40, 50)]);
        assert!(passages.is_empty());
        assert_eq!(report.books[0].kept, 0);
    }
}
