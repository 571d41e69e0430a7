//! Line-level cleaning: drops running headers, page numbers and footnote blocks.

use super::patterns::{
    BIOGRAPHY_LINE, BOOK_HEADING_LINES, CHAPTER_NUMBER_PREFIX, CHAPTER_START_LINE,
    FOOTNOTE_OPENERS, PAGE_NUMBER_LINE, RUNNING_TITLE_LINE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineState {
    #[default]
    Normal,
    InFootnote,
}

/// Why a line was kept or dropped. Rules are checked in declaration order and
/// the first one that applies wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVerdict {
    Blank,
    PageNumber,
    RunningTitle,
    BookHeading,
    FootnoteOpener,
    FootnoteBody,
    ChapterAfterFootnote,
    Biography,
    Content,
}

impl LineVerdict {
    pub fn keeps(self) -> bool {
        matches!(self, LineVerdict::Content | LineVerdict::ChapterAfterFootnote)
    }
}

/// Pure transition: `(state, line) -> (state, verdict)`. `line` must already be trimmed.
pub fn step(state: LineState, line: &str) -> (LineState, LineVerdict) {
    if line.is_empty() {
        return (state, LineVerdict::Blank);
    }
    if PAGE_NUMBER_LINE.is_match(line) {
        return (state, LineVerdict::PageNumber);
    }
    if RUNNING_TITLE_LINE.is_match(line) {
        return (state, LineVerdict::RunningTitle);
    }
    if BOOK_HEADING_LINES.iter().any(|re| re.is_match(line)) {
        return (state, LineVerdict::BookHeading);
    }
    if FOOTNOTE_OPENERS.iter().any(|re| re.is_match(line)) {
        return (LineState::InFootnote, LineVerdict::FootnoteOpener);
    }
    if state == LineState::InFootnote {
        return if CHAPTER_START_LINE.is_match(line) {
            (LineState::Normal, LineVerdict::ChapterAfterFootnote)
        } else {
            (LineState::InFootnote, LineVerdict::FootnoteBody)
        };
    }
    if BIOGRAPHY_LINE.is_match(line) && !CHAPTER_NUMBER_PREFIX.is_match(line) {
        return (LineState::InFootnote, LineVerdict::Biography);
    }
    (state, LineVerdict::Content)
}

/// Single left-to-right pass; surviving lines are trimmed and joined with `\n`.
pub fn clean_lines(text: &str) -> String {
    let mut state = LineState::Normal;
    let mut kept: Vec<&str> = Vec::new();
    for raw in text.split('\n') {
        let line = raw.trim();
        let (next, verdict) = step(state, line);
        state = next;
        if verdict.keeps() {
            kept.push(line);
        }
    }
    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_headers_and_page_numbers() {
        let raw = "LIBRO II\n1. Al despuntar la aurora...\n23\n2. Otra reflexión sobre la virtud y la justicia.";
        assert_eq!(
            clean_lines(raw),
            "1. Al despuntar la aurora...\n2. Otra reflexión sobre la virtud y la justicia."
        );
    }

    #[test]
    fn running_title_tolerates_ocr_damage() {
        for header in ["MEDITACIONES", "MlDITACIONES", "MEDITACIONLS", "meditaciones  "] {
            assert_eq!(
                step(LineState::Normal, header.trim()).1,
                LineVerdict::RunningTitle,
                "{header}"
            );
        }
    }

    #[test]
    fn spaced_book_heading() {
        assert_eq!(step(LineState::Normal, "L I B R O IV").1, LineVerdict::BookHeading);
        assert_eq!(step(LineState::Normal, "LIBRO XII").1, LineVerdict::BookHeading);
    }

    #[test]
    fn footnote_block_runs_until_next_chapter() {
        let raw = "3. Buscan retiros en el campo.\n\
                   Cf. SÉNECA, Cartas, 28.\n\
                   continúa la nota al pie\n\
                   y sigue todavía\n\
                   4. Recuerda esto.";
        assert_eq!(clean_lines(raw), "3. Buscan retiros en el campo.\n4. Recuerda esto.");
    }

    #[test]
    fn footnote_state_only_exits_on_chapter_start() {
        let (state, verdict) = step(LineState::InFootnote, "4. lowercase start");
        assert_eq!((state, verdict), (LineState::InFootnote, LineVerdict::FootnoteBody));
        let (state, verdict) = step(LineState::InFootnote, "5. ¿Qué es esto?");
        assert_eq!((state, verdict), (LineState::Normal, LineVerdict::ChapterAfterFootnote));
    }

    #[test]
    fn noise_lines_do_not_change_state() {
        assert_eq!(step(LineState::InFootnote, "112").0, LineState::InFootnote);
        assert_eq!(step(LineState::InFootnote, "").0, LineState::InFootnote);
    }

    #[test]
    fn biography_line_opens_footnote() {
        let raw = "7. Sé como el promontorio.\nRústico fue un filósofo estoico amigo del emperador.\nmaestro de Marco.\n8. Todo es efímero.";
        assert_eq!(clean_lines(raw), "7. Sé como el promontorio.\n8. Todo es efímero.");
    }

    #[test]
    fn superscript_marker_opens_footnote() {
        let (state, verdict) = step(LineState::Normal, "¹ Epicuro, fr. 191.");
        assert_eq!((state, verdict), (LineState::InFootnote, LineVerdict::FootnoteOpener));
    }

    #[test]
    fn cleaning_is_a_fixed_point() {
        let raw = "MEDITACIONES\n1. Primera línea\ncontinúa aquí.\n45\n2. Segunda.";
        let once = clean_lines(raw);
        assert_eq!(clean_lines(&once), once);
    }
}
