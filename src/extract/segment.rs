//! Undoes PDF line wrapping and splits a book into chapter fragments.

use std::sync::LazyLock;

use regex::Regex;

use super::patterns::CHAPTER_MARKER;

static HYPHEN_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-\n").unwrap());
static NEWLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());

/// A chapter marker and the text up to the next marker, before any repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChapter<'a> {
    pub number: &'a str,
    pub body: &'a str,
}

/// "pala-\nbra" -> "palabra"
pub fn join_hyphenated(text: &str) -> String {
    HYPHEN_BREAK.replace_all(text, "").into_owned()
}

/// Replaces a line break with a space when it sits between a lowercase letter
/// (or `,`/`;`) and a lowercase letter. Chapter openings start with a digit
/// and are never merged.
pub fn merge_wrapped_lines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let wrapped = c == '\n'
                && i > 0
                && is_wrap_tail(chars[i - 1])
                && chars.get(i + 1).is_some_and(|&next| is_lowercase_letter(next));
            if wrapped {
                ' '
            } else {
                c
            }
        })
        .collect()
}

fn is_lowercase_letter(c: char) -> bool {
    matches!(c, 'a'..='z' | 'á' | 'é' | 'í' | 'ó' | 'ú')
}

fn is_wrap_tail(c: char) -> bool {
    is_lowercase_letter(c) || c == ',' || c == ';'
}

pub fn collapse_newlines(text: &str) -> String {
    NEWLINE_RUNS.replace_all(text, "\n").into_owned()
}

/// Splits on line-start `<digits>. ` markers. Text before the first marker is
/// not part of any chapter and is dropped.
pub fn split_chapters(text: &str) -> Vec<RawChapter<'_>> {
    let markers: Vec<(&str, usize, usize)> = CHAPTER_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?.as_str();
            Some((number, whole.start(), whole.end()))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, &(number, _, body_start))| {
            let body_end = markers.get(i + 1).map(|m| m.1).unwrap_or(text.len());
            RawChapter {
                number,
                body: &text[body_start..body_end],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphen_break_joins_word() {
        assert_eq!(join_hyphenated("la provi-\ndencia"), "la providencia");
    }

    #[test]
    fn wrapped_sentence_is_merged() {
        assert_eq!(
            merge_wrapped_lines("no te dejes\narrastrar,\ncomo\nsi fueras"),
            "no te dejes arrastrar, como si fueras"
        );
    }

    #[test]
    fn chapter_boundary_is_not_merged() {
        let text = "y así termina\n5. Y luego empieza";
        assert_eq!(merge_wrapped_lines(text), text);
        let text = "termina.\nnueva línea";
        assert_eq!(merge_wrapped_lines(text), text);
    }

    #[test]
    fn chapter_marker_survives_lowercase_opening() {
        // OCR sometimes loses the capital of a chapter opening.
        let text = merge_wrapped_lines("cierra la frase\n12. y continúa otra");
        let chapters = split_chapters(&text);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number, "12");
        assert_eq!(chapters[0].body, "y continúa otra");
    }

    #[test]
    fn newline_runs_collapse() {
        assert_eq!(collapse_newlines("a\n\n\nb\nc"), "a\nb\nc");
    }

    #[test]
    fn split_captures_number_and_body() {
        let text = "preámbulo\n1. Al despuntar la aurora...\n2. Otra reflexión.";
        let chapters = split_chapters(text);
        assert_eq!(
            chapters,
            vec![
                RawChapter {
                    number: "1",
                    body: "Al despuntar la aurora..."
                },
                RawChapter {
                    number: "2",
                    body: "Otra reflexión."
                },
            ]
        );
    }

    #[test]
    fn split_at_text_start() {
        let chapters = split_chapters("3. Primera\n4. Segunda");
        assert_eq!(chapters[0].number, "3");
        assert_eq!(chapters[0].body, "Primera");
    }

    #[test]
    fn mid_line_numbers_do_not_split() {
        let chapters = split_chapters("1. Vivió 60. Años después");
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].body, "Vivió 60. Años después");
    }
}
