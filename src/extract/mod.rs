//! Raw page text -> ordered `(chapter, text)` pairs for one book.
//!
//! Stages, in order:
//!   1. line cleaning (headers, page numbers, footnote blocks)
//!   2. hyphen joins, wrapped-line merge, newline collapse
//!   3. split on chapter markers and parse the chapter number
//!   4. per-body repair steps
//!   5. length filter

pub mod lines;
pub mod patterns;
pub mod repair;
pub mod segment;

use tracing::info;

use crate::metrics::{char_len, BookPasses, PassMetric};
use crate::settings::Settings;
use repair::{RepairOptions, RepairStep};
use segment::RawChapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub repair: RepairOptions,
    /// Bodies of this many characters or fewer are noise.
    pub min_passage_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            repair: RepairOptions::default(),
            min_passage_chars: 10,
        }
    }
}

impl ExtractOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        ExtractOptions {
            repair: RepairOptions {
                cut_min_offset: settings.cut_min_offset,
            },
            min_passage_chars: settings.min_passage_chars,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub number: u32,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct BookExtraction {
    pub book: u32,
    pub chapters: Vec<Chapter>,
    /// Fragments whose chapter marker did not parse as an integer.
    pub malformed: usize,
    /// Fragments left with too little text after repair.
    pub degenerate: usize,
    pub passes: Vec<PassMetric>,
}

pub fn extract_book(book: u32, raw: &str, opts: &ExtractOptions) -> BookExtraction {
    let mut passes = BookPasses::new(book);

    let cleaned = run_pass(&mut passes, "line_cleaning", raw, lines::clean_lines);
    let joined = run_pass(&mut passes, "join_hyphenated", &cleaned, segment::join_hyphenated);
    let merged = run_pass(&mut passes, "merge_wrapped_lines", &joined, segment::merge_wrapped_lines);
    let text = run_pass(&mut passes, "collapse_newlines", &merged, segment::collapse_newlines);

    let (parsed, malformed) = parse_fragments(&segment::split_chapters(&text));
    let mut fragments: Vec<(u32, String)> = parsed
        .into_iter()
        .map(|(number, body)| (number, body.to_string()))
        .collect();

    for step in RepairStep::ORDER {
        let before: usize = fragments.iter().map(|(_, b)| char_len(b)).sum();
        for (_, body) in fragments.iter_mut() {
            *body = step.apply(body, &opts.repair);
        }
        let after: usize = fragments.iter().map(|(_, b)| char_len(b)).sum();
        passes.record(step.name(), fragments.len(), before, after);
    }

    let total = fragments.len();
    let chapters: Vec<Chapter> = fragments
        .into_iter()
        .filter(|(_, body)| char_len(body) > opts.min_passage_chars)
        .map(|(number, text)| Chapter { number, text })
        .collect();
    let degenerate = total - chapters.len();

    info!(
        book,
        chapters = chapters.len(),
        malformed,
        degenerate,
        "book extracted"
    );

    BookExtraction {
        book,
        chapters,
        malformed,
        degenerate,
        passes: passes.into_metrics(),
    }
}

/// Parses chapter numbers. Fragments whose number is not an integer are
/// dropped and counted.
pub fn parse_fragments<'a>(fragments: &[RawChapter<'a>]) -> (Vec<(u32, &'a str)>, usize) {
    let mut malformed = 0;
    let mut parsed = Vec::with_capacity(fragments.len());
    for raw in fragments {
        match raw.number.parse::<u32>() {
            Ok(number) => parsed.push((number, raw.body)),
            Err(_) => malformed += 1,
        }
    }
    (parsed, malformed)
}

fn run_pass(passes: &mut BookPasses, name: &str, input: &str, pass: fn(&str) -> String) -> String {
    let output = pass(input);
    passes.record(name, 1, char_len(input), char_len(&output));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(raw: &str) -> BookExtraction {
        extract_book(2, raw, &ExtractOptions::default())
    }

    #[test]
    fn header_and_page_number_removed() {
        let raw = "LIBRO II\n1. Al despuntar la aurora...\n23\n2. Otra reflexión sobre la virtud y la justicia.";
        let out = extract(raw);
        assert_eq!(
            out.chapters,
            vec![
                Chapter {
                    number: 1,
                    text: "Al despuntar la aurora...".to_string()
                },
                Chapter {
                    number: 2,
                    text: "Otra reflexión sobre la virtud y la justicia.".to_string()
                },
            ]
        );
        assert_eq!((out.malformed, out.degenerate), (0, 0));
    }

    #[test]
    fn non_numeric_chapter_is_dropped() {
        let fragments = [
            RawChapter {
                number: "IV",
                body: "Retírate dentro de ti mismo cuando quieras.",
            },
            RawChapter {
                number: "5",
                body: "Considera que todo cambia sin cesar.",
            },
        ];
        let (parsed, malformed) = parse_fragments(&fragments);
        assert_eq!(malformed, 1);
        assert_eq!(parsed, vec![(5, "Considera que todo cambia sin cesar.")]);
    }

    #[test]
    fn overflowing_chapter_number_counts_as_malformed() {
        let raw = "99999999999999999999. Un número imposible de capítulo aquí.\n3. Un capítulo normal y correcto.";
        let out = extract(raw);
        assert_eq!(out.malformed, 1);
        assert_eq!(out.chapters.len(), 1);
        assert_eq!(out.chapters[0].number, 3);
    }

    #[test]
    fn short_fragments_are_degenerate() {
        let out = extract("1. Breve.\n2. Un pasaje suficientemente largo.");
        assert_eq!(out.degenerate, 1);
        assert_eq!(out.chapters.len(), 1);
        assert_eq!(out.chapters[0].number, 2);
    }

    #[test]
    fn wrapped_lines_and_hyphens_rejoin() {
        let raw = "MEDITACIONES\n4. Si la inteligencia nos es co-\nmún, también la razón\npor la que somos racionales.\n87";
        let out = extract(raw);
        assert_eq!(
            out.chapters[0].text,
            "Si la inteligencia nos es común, también la razón por la que somos racionales."
        );
    }

    #[test]
    fn footnote_block_between_pages_is_removed() {
        let raw = "6. Observa siempre que todo nace por transformación.\n\
                   Cf. EPICTETO, Disertaciones, II 5.\n\
                   texto de la nota que continúa\n\
                   MEDITACIONES\n\
                   7. El alma se ultraja a sí misma cuando se convierte en absceso.";
        let out = extract(raw);
        let texts: Vec<&str> = out.chapters.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(
            texts,
            [
                "Observa siempre que todo nace por transformación.",
                "El alma se ultraja a sí misma cuando se convierte en absceso."
            ]
        );
    }

    #[test]
    fn passages_carry_no_newlines_or_markers() {
        let raw = std::fs::read_to_string("tests/fixtures/libro_iv_pages.txt").unwrap();
        let out = extract(&raw.replace('\x0C', "\n"));
        assert!(!out.chapters.is_empty());
        for ch in &out.chapters {
            assert!(!ch.text.contains('\n'), "{:?}", ch);
            assert_eq!(ch.text, ch.text.trim());
            assert!(!ch.text.contains(['¹', '²', '³', '^']), "{:?}", ch);
            assert!(ch.text.chars().count() > 10);
        }
    }

    #[test]
    fn records_every_pass() {
        let out = extract("1. Un pasaje suficientemente largo.");
        let names: Vec<&str> = out.passes.iter().map(|p| p.pass_name.as_str()).collect();
        assert_eq!(names.len(), 4 + RepairStep::ORDER.len());
        assert_eq!(names[0], "line_cleaning");
        assert!(out.passes.iter().all(|p| p.book == 2));
    }
}
