//! Content repair applied to each chapter body after segmentation.
//!
//! Each step is a pure `&str -> String` transform and a no-op when nothing
//! matches. Later steps assume the earlier ones already ran, so the order in
//! [`RepairStep::ORDER`] is part of the contract.

use super::patterns::{
    FOOTNOTE_CUTS, INNER_SPACED_PAGE, NOTE_MARKER, OCR_FIXES, RUNNING_TITLE_FRAGMENTS,
    SPACED_LETTERS, SPACED_LETTERS_MAX, TRAILING_FOOTNOTE_PHRASES, TRAILING_LOWER_WORD,
    TRAILING_REFERENCE, TRAILING_SPACED_PAGE, WHITESPACE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairOptions {
    pub cut_min_offset: usize,
}

impl Default for RepairOptions {
    fn default() -> Self {
        RepairOptions { cut_min_offset: 50 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStep {
    CollapseWhitespace,
    StripNoteMarkers,
    FixOcrMisreads,
    StripRunningTitles,
    StripPageNumbers,
    StripTrailingReference,
    StripFootnoteTail,
    JoinSpacedLetters,
    CutFootnotes,
    FinalCollapse,
}

impl RepairStep {
    pub const ORDER: [RepairStep; 10] = [
        RepairStep::CollapseWhitespace,
        RepairStep::StripNoteMarkers,
        RepairStep::FixOcrMisreads,
        RepairStep::StripRunningTitles,
        RepairStep::StripPageNumbers,
        RepairStep::StripTrailingReference,
        RepairStep::StripFootnoteTail,
        RepairStep::JoinSpacedLetters,
        RepairStep::CutFootnotes,
        RepairStep::FinalCollapse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RepairStep::CollapseWhitespace => "collapse_whitespace",
            RepairStep::StripNoteMarkers => "strip_note_markers",
            RepairStep::FixOcrMisreads => "fix_ocr_misreads",
            RepairStep::StripRunningTitles => "strip_running_titles",
            RepairStep::StripPageNumbers => "strip_page_numbers",
            RepairStep::StripTrailingReference => "strip_trailing_reference",
            RepairStep::StripFootnoteTail => "strip_footnote_tail",
            RepairStep::JoinSpacedLetters => "join_spaced_letters",
            RepairStep::CutFootnotes => "cut_footnotes",
            RepairStep::FinalCollapse => "final_collapse",
        }
    }

    pub fn apply(self, text: &str, opts: &RepairOptions) -> String {
        match self {
            RepairStep::CollapseWhitespace | RepairStep::FinalCollapse => collapse_whitespace(text),
            RepairStep::StripNoteMarkers => strip_note_markers(text),
            RepairStep::FixOcrMisreads => fix_ocr_misreads(text),
            RepairStep::StripRunningTitles => strip_running_titles(text),
            RepairStep::StripPageNumbers => strip_page_numbers(text),
            RepairStep::StripTrailingReference => strip_trailing_reference(text),
            RepairStep::StripFootnoteTail => strip_footnote_tail(text),
            RepairStep::JoinSpacedLetters => join_spaced_letters(text),
            RepairStep::CutFootnotes => cut_footnotes(text, opts.cut_min_offset),
        }
    }
}

/// Runs every step in order.
pub fn repair(text: &str, opts: &RepairOptions) -> String {
    RepairStep::ORDER
        .iter()
        .fold(text.to_string(), |acc, step| step.apply(&acc, opts))
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

pub fn strip_note_markers(text: &str) -> String {
    NOTE_MARKER.replace_all(text, "").into_owned()
}

pub fn fix_ocr_misreads(text: &str) -> String {
    OCR_FIXES
        .iter()
        .fold(text.to_string(), |acc, (bad, good)| acc.replace(bad, good))
}

pub fn strip_running_titles(text: &str) -> String {
    RUNNING_TITLE_FRAGMENTS
        .iter()
        .fold(text.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
}

pub fn strip_page_numbers(text: &str) -> String {
    let text = TRAILING_SPACED_PAGE.replace(text, "");
    INNER_SPACED_PAGE.replace_all(&text, " ").into_owned()
}

pub fn strip_trailing_reference(text: &str) -> String {
    TRAILING_REFERENCE.replace(text, "").into_owned()
}

/// Drops a dangling lowercase word at the very end, then any known footnote tail.
pub fn strip_footnote_tail(text: &str) -> String {
    let text = TRAILING_LOWER_WORD.replace(text, "").into_owned();
    TRAILING_FOOTNOTE_PHRASES
        .iter()
        .fold(text, |acc, re| re.replace(&acc, "").into_owned())
}

pub fn join_spaced_letters(text: &str) -> String {
    SPACED_LETTERS
        .replace_all(text, |caps: &regex::Captures| {
            let run = &caps[0];
            let joined: String = run.split_whitespace().collect();
            if joined.chars().count() < SPACED_LETTERS_MAX {
                joined
            } else {
                run.to_string()
            }
        })
        .into_owned()
}

/// Truncates at a footnote opener found strictly past `min_offset` characters.
pub fn cut_footnotes(text: &str, min_offset: usize) -> String {
    let mut content = text.to_string();
    for re in FOOTNOTE_CUTS.iter() {
        let Some(start) = re.find(&content).map(|m| m.start()) else {
            continue;
        };
        if content[..start].chars().count() > min_offset {
            content = content[..start].trim().to_string();
        }
    }
    content
}
