use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;
use tracing::debug;

use crate::db;
use crate::error::Result;

/// Characters before and after one cleaning pass over one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassMetric {
    pub book: u32,
    pub pass_name: String,
    pub fragments: usize,
    pub before: usize,
    pub after: usize,
}

impl PassMetric {
    pub fn removed(&self) -> usize {
        self.before.saturating_sub(self.after)
    }
}

/// Per-book recorder used while a single book is being extracted.
#[derive(Debug, Default)]
pub struct BookPasses {
    book: u32,
    metrics: Vec<PassMetric>,
}

impl BookPasses {
    pub fn new(book: u32) -> Self {
        BookPasses {
            book,
            metrics: Vec::new(),
        }
    }

    pub fn record(&mut self, pass_name: &str, fragments: usize, before: usize, after: usize) {
        debug!(
            book = self.book,
            pass = pass_name,
            before,
            after,
            removed = before.saturating_sub(after),
            "cleaning pass"
        );
        self.metrics.push(PassMetric {
            book: self.book,
            pass_name: pass_name.to_string(),
            fragments,
            before,
            after,
        });
    }

    pub fn into_metrics(self) -> Vec<PassMetric> {
        self.metrics
    }
}

pub struct PassTracker {
    run_id: String,
    metrics: Vec<PassMetric>,
}

impl PassTracker {
    pub fn new(run_id: String) -> Self {
        PassTracker {
            run_id,
            metrics: Vec::new(),
        }
    }

    pub fn absorb(&mut self, metrics: Vec<PassMetric>) {
        self.metrics.extend(metrics);
    }

    pub fn persist(&self, conn: &Connection) -> Result<()> {
        for metric in &self.metrics {
            db::insert_pass_metric(conn, &self.run_id, metric)?;
        }
        Ok(())
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn metrics(&self) -> &[PassMetric] {
        &self.metrics
    }
}

pub fn new_run_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("run-{}", now)
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
