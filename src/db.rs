use std::path::Path;

use rusqlite::{params, Connection};

use crate::corpus::Corpus;
use crate::error::Result;
use crate::metrics::PassMetric;

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS topics (
            id    TEXT PRIMARY KEY,
            name  TEXT NOT NULL,
            icon  TEXT
        );

        CREATE TABLE IF NOT EXISTS passages (
            id      INTEGER PRIMARY KEY,
            book    INTEGER NOT NULL,
            chapter INTEGER NOT NULL,
            text    TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_passages_book ON passages(book, chapter);

        -- topic_id is not a foreign key: stored ids may outlive a taxonomy edit
        CREATE TABLE IF NOT EXISTS passage_themes (
            passage_id INTEGER NOT NULL REFERENCES passages(id),
            rank       INTEGER NOT NULL,
            topic_id   TEXT NOT NULL,
            PRIMARY KEY (passage_id, rank)
        );
        CREATE INDEX IF NOT EXISTS idx_passage_themes_topic ON passage_themes(topic_id);

        CREATE TABLE IF NOT EXISTS pass_metrics (
            run_id        TEXT NOT NULL,
            book          INTEGER NOT NULL,
            pass_name     TEXT NOT NULL,
            fragments     INTEGER NOT NULL,
            chars_before  INTEGER NOT NULL,
            chars_after   INTEGER NOT NULL,
            chars_removed INTEGER NOT NULL,
            PRIMARY KEY (run_id, book, pass_name)
        );
        ",
    )?;
    Ok(())
}

/// Replaces every topic, passage and theme row with the contents of `corpus`.
pub fn save_corpus(conn: &mut Connection, corpus: &Corpus) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch("DELETE FROM passage_themes; DELETE FROM passages; DELETE FROM topics;")?;
    {
        let mut stmt = tx.prepare("INSERT INTO topics (id, name, icon) VALUES (?1, ?2, ?3)")?;
        for topic in &corpus.themes {
            stmt.execute(params![topic.id, topic.name, topic.icon])?;
        }

        let mut stmt_passage =
            tx.prepare("INSERT INTO passages (id, book, chapter, text) VALUES (?1, ?2, ?3, ?4)")?;
        let mut stmt_theme = tx.prepare(
            "INSERT INTO passage_themes (passage_id, rank, topic_id) VALUES (?1, ?2, ?3)",
        )?;
        for p in &corpus.passages {
            stmt_passage.execute(params![p.id, p.book, p.chapter, p.text])?;
            for (rank, theme) in p.themes.iter().enumerate() {
                stmt_theme.execute(params![p.id, rank as i64, theme])?;
            }
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn insert_pass_metric(conn: &Connection, run_id: &str, metric: &PassMetric) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO pass_metrics (run_id, book, pass_name, fragments, chars_before, chars_after, chars_removed) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            run_id,
            metric.book,
            metric.pass_name,
            metric.fragments as i64,
            metric.before as i64,
            metric.after as i64,
            metric.removed() as i64
        ],
    )?;
    Ok(())
}
