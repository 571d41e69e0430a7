//! Patterns and correction tables tuned against the reference scan.

use std::sync::LazyLock;

use regex::Regex;

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| Regex::new(p).unwrap()).collect()
}

pub static PAGE_NUMBER_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\s*$").unwrap());

/// Running title as it comes out of OCR: "MEDITACIONES", "MlDITACIONES", "MEDITACIONLS"...
pub static RUNNING_TITLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^M[LlIiEe]?[DdIi]?[IiEe]?T[Aa][Cc][Ii][OoÓó][Nn][EeLlIi][IiLlEeSs]?S?\s*$").unwrap()
});

/// "LIBRO IV", "L I B R O IV", "LIBR IV".
pub static BOOK_HEADING_LINES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[r"^L\s*I?\s*B?\s*R?\s*O?\s+[IVX]+\s*$", r"^LIBRO\s+[IVX]+\s*$"])
});

/// Lines that open a footnote block.
pub static FOOTNOTE_OPENERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"(?i)^\s*[\^¹²³⁴⁵⁶⁷⁸⁹]\s*[A-Z]",
        r"(?i)^Cf\.",
        r"(?i)^Según\s+[A-Z]",
        r"(?i)^Texto\s+(?:difícil|corrupto|con\s+lagunas)",
        r"(?i)^Existe\s+en\s+el\s+texto",
        r"(?i)^La\s+traducción",
        r"(?i)^Seguimos\s+a",
        r"(?i)^Aceptamos",
        r"(?i)^FARQUHARSON",
        r"(?i)^TRANNOY",
        r"(?i)^A\.\s*I\.\s*TRANNOY",
        r"(?i)^En\s+la\s+edición",
        r"(?i)^Sobre\s+la\s+respuesta",
        r"(?i)^\([^)]*conjetura[^)]*\)",
        r"(?i)^Esta\s+línea\s+se\s+refiere",
        r"(?i)^Los\s+cuados",
        r"(?i)^El\s+río\s+Gran",
    ])
});

/// "12. Texto" with an uppercase or opening-punctuation first character.
pub static CHAPTER_START_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+[A-Z¿¡«]").unwrap());

pub static CHAPTER_NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());

/// "Antonino fue un...", "Rústico era el..." : biography notes that slipped past the openers.
pub static BIOGRAPHY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-záéíóú]+(?:io|o|a|as|os|e|es)?,?\s+(?:fue|era|es|son)\s+(?:un|una|el|la|uno)")
        .unwrap()
});

/// Chapter boundary: a line-start integer, a period and whitespace.
pub static CHAPTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\n)(\d+)\.\s+").unwrap());

pub static NOTE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\^¹²³⁴⁵⁶⁷⁸⁹]+\d*").unwrap());

/// Running title fragments left inside a body, with and without a page number in front.
pub static RUNNING_TITLE_FRAGMENTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"\d+\s*M[LlIiEe:\)\(]+[IiDd]*TAC[Ii][\(\)OoÓó]+N[EeLlIi:\)\(]+S?\s*",
        r"(?i)\bM[LlIiEe:\)\(]+[IiDd]*TAC[Ii][\(\)OoÓó]+N[EeLlIi:\)\(]+S?\s*",
    ])
});

/// Page numbers that OCR split into single digits ("1 1 4").
pub static TRAILING_SPACED_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d\s+\d\s*\d?\s*$").unwrap());
pub static INNER_SPACED_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+\d\s+\d\s+\d\s+").unwrap());

pub static TRAILING_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*Referencia a [A-Z][a-záéíóú]+\.?\s*$").unwrap());

pub static TRAILING_LOWER_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+[a-z]+\s*$").unwrap());

/// Known footnote tails that bleed into the end of a body.
pub static TRAILING_FOOTNOTE_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"\s+Es algo así como si el\s*e\s*s\s*t\s*r\s*a\s*t\s*e\s*g\s*o.*$",
        r"\s+Es algo así como si.*$",
    ])
});

/// Runs of single characters separated by spaces ("m e d i t a r").
pub static SPACED_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w(?:\s+\w){6,}\b").unwrap());

/// Collapsed runs must stay under this many characters.
pub const SPACED_LETTERS_MAX: usize = 15;

/// Footnote openers that may appear mid-body; the body is cut at the first one
/// found past the minimum offset.
pub static FOOTNOTE_CUTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_all(&[
        r"\s+[A-Z][a-záéíóú]+,?\s+(?:fue|era)\s+(?:un|una|el|la)",
        r"\s+Cf\.\s+",
        r"\s+Según\s+[A-Z]",
        r"\s+Texto\s+(?:difícil|corrupto)",
        r"\s+FARQUHARSON",
        r"\s+TRANNOY",
    ])
});

/// Literal OCR misreadings and their corrections.
pub const OCR_FIXES: &[(&str, &str)] = &[
    ("cueφo", "cuerpo"),
    ("soφrendido", "sorprendido"),
    ("soφrender", "sorprender"),
    ("soφresa", "sorpresa"),
    ("Esteφanía", "Estefanía"),
    ("ténnino", "término"),
    ("pennanezca", "permanezca"),
];

pub static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
