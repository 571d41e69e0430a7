use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use stoic_corpus::extract::ExtractOptions;
use stoic_corpus::metrics::{new_run_id, PassTracker};
use stoic_corpus::overrides::OverrideTable;
use stoic_corpus::pipeline::Pipeline;
use stoic_corpus::{db, source, stats, Classifier, Corpus, Settings, Taxonomy};

#[derive(Parser)]
#[command(name = "stoic_corpus", about = "Scanned Meditations -> classified passage corpus")]
struct Cli {
    /// Settings file (TOML); defaults to ./stoic_corpus.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, clean and classify passages from page text
    Extract {
        /// Form-feed separated text dump, or a directory of per-page .txt files
        #[arg(long)]
        pages: PathBuf,
        /// Corpus JSON to (over)write
        #[arg(long)]
        out: PathBuf,
        /// Also write the corpus and pass metrics to this SQLite file
        #[arg(long)]
        sqlite: Option<PathBuf>,
        /// Manual corrections applied after extraction
        #[arg(long)]
        overrides: Option<PathBuf>,
    },
    /// Re-assign themes for every passage of an existing corpus
    Classify {
        #[arg(long)]
        corpus: PathBuf,
    },
    /// Apply manual corrections to an existing corpus (themes are recomputed)
    ApplyOverrides {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        overrides: PathBuf,
    },
    /// Print corpus statistics
    Stats {
        #[arg(long)]
        corpus: PathBuf,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn load_taxonomy(settings: &Settings) -> Result<Taxonomy> {
    let taxonomy = match &settings.taxonomy_path {
        Some(path) => Taxonomy::load(path)
            .with_context(|| format!("Failed to load taxonomy {:?}", path))?,
        None => Taxonomy::reference()?,
    };
    Ok(taxonomy)
}

fn main() -> Result<()> {
    init_tracing();
    let t0 = Instant::now();
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    info!(settings = ?settings, "settings loaded");
    let taxonomy = load_taxonomy(&settings)?;
    let classifier = Classifier::from_settings(&taxonomy, &settings)?;

    match cli.command {
        Commands::Extract {
            pages,
            out,
            sqlite,
            overrides,
        } => run_extract(
            &settings,
            &taxonomy,
            &classifier,
            &pages,
            &out,
            sqlite.as_deref(),
            overrides.as_deref(),
        )?,
        Commands::Classify { corpus } => {
            let mut data = Corpus::load(&corpus)
                .with_context(|| format!("Failed to read corpus {:?}", corpus))?;
            let changed = data.reclassify(&classifier);
            data.save(&corpus)?;
            println!(
                "Reclassified {} passages ({} changed).",
                data.passages.len(),
                changed
            );
        }
        Commands::ApplyOverrides { corpus, overrides } => {
            let mut data = Corpus::load(&corpus)
                .with_context(|| format!("Failed to read corpus {:?}", corpus))?;
            let table = OverrideTable::load(&overrides)
                .with_context(|| format!("Failed to read overrides {:?}", overrides))?;
            let report = table.apply(&mut data, &classifier);
            data.save(&corpus)?;
            println!(
                "Applied {} corrections ({} unmatched).",
                report.applied,
                report.unmatched.len()
            );
        }
        Commands::Stats { corpus } => {
            let data = Corpus::load(&corpus)
                .with_context(|| format!("Failed to read corpus {:?}", corpus))?;
            let s = stats::compute(&data);
            println!("{}", stats::render(&data, &s));
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn run_extract(
    settings: &Settings,
    taxonomy: &Taxonomy,
    classifier: &Classifier,
    pages: &Path,
    out: &Path,
    sqlite: Option<&Path>,
    overrides: Option<&Path>,
) -> Result<()> {
    let src = source::open(pages).with_context(|| format!("Failed to open pages {:?}", pages))?;
    println!("Pages: {} ({} total)\n", pages.display(), src.page_count());

    let pb = ProgressBar::new(settings.books.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} books")?
            .progress_chars("#>-"),
    );
    let pipeline =
        Pipeline::new(classifier, ExtractOptions::from_settings(settings)).with_progress(pb);
    let mut tracker = PassTracker::new(new_run_id());
    let (passages, report) = pipeline.run(&*src, &settings.books, &mut tracker);

    for book in &report.books {
        println!(
            "  Book {:2}: {:3} passages ({} malformed, {} too short)",
            book.book, book.kept, book.malformed, book.degenerate
        );
    }
    println!("\nTotal passages: {} ({} fragments dropped)", report.kept(), report.dropped());

    let mut corpus = Corpus::new(settings, taxonomy, passages);
    if let Some(path) = overrides {
        let table = OverrideTable::load(path)
            .with_context(|| format!("Failed to read overrides {:?}", path))?;
        let applied = table.apply(&mut corpus, classifier);
        println!(
            "Applied {} corrections ({} unmatched).",
            applied.applied,
            applied.unmatched.len()
        );
    }

    corpus.save(out)?;
    println!("Corpus: {}", out.display());

    if let Some(path) = sqlite {
        let mut conn = db::connect(path)?;
        db::init_schema(&conn)?;
        db::save_corpus(&mut conn, &corpus)?;
        tracker.persist(&conn)?;
        println!("SQLite: {} (run {})", path.display(), tracker.run_id());
    }
    Ok(())
}
