use std::fmt::Write;

use itertools::Itertools;

use crate::corpus::Corpus;

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeCount {
    pub id: String,
    pub name: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    pub total: usize,
    pub per_book: Vec<(u32, usize)>,
    pub themes: Vec<ThemeCount>,
    /// `(number of themes, passages with that many)`, ascending.
    pub theme_counts: Vec<(usize, usize)>,
}

pub fn compute(corpus: &Corpus) -> CorpusStats {
    let total = corpus.passages.len();

    let per_book = corpus
        .passages
        .iter()
        .map(|p| p.book)
        .counts()
        .into_iter()
        .sorted()
        .collect();

    let themes = corpus
        .passages
        .iter()
        .flat_map(|p| p.themes.iter().map(String::as_str))
        .counts()
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .map(|(id, count)| ThemeCount {
            id: id.to_string(),
            name: corpus.theme_name(id).to_string(),
            count,
            percent: percent(count, total),
        })
        .collect();

    let theme_counts = corpus
        .passages
        .iter()
        .map(|p| p.themes.len())
        .counts()
        .into_iter()
        .sorted()
        .collect();

    CorpusStats {
        total,
        per_book,
        themes,
        theme_counts,
    }
}

pub fn render(corpus: &Corpus, stats: &CorpusStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} ({})\n", corpus.title, corpus.author);
    let _ = writeln!(out, "Total passages: {}\n", stats.total);

    let _ = writeln!(out, "## Passages per book\n");
    let _ = writeln!(out, "| Book | Passages |");
    let _ = writeln!(out, "|---:|---:|");
    for (book, count) in &stats.per_book {
        let _ = writeln!(out, "| {} | {} |", book, count);
    }

    let _ = writeln!(out, "\n## Themes\n");
    let _ = writeln!(out, "| Theme | Passages | % |");
    let _ = writeln!(out, "|---|---:|---:|");
    for t in &stats.themes {
        let _ = writeln!(out, "| {} | {} | {:.1} |", t.name, t.count, t.percent);
    }

    let _ = writeln!(out, "\n## Themes per passage\n");
    for (n, count) in &stats.theme_counts {
        let _ = writeln!(out, "- {} theme(s): {} passages", n, count);
    }

    let _ = writeln!(out, "\n## First passage of each book\n");
    for (_, mut group) in &corpus.passages.iter().group_by(|p| p.book) {
        if let Some(p) = group.next() {
            let _ = writeln!(out, "- {}.{}: {}", p.book, p.chapter, preview(&p.text, 120));
        }
    }
    out
}

fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
