mod db;
mod parser;
mod pdf;
mod report;
mod sample;
mod tabular;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::warn;

use crate::parser::BuildCounts;

/// Staging source tag for the embedded sample dataset.
const SAMPLE_SOURCE: &str = "ejemplo";

#[derive(Parser)]
#[command(
    name = "oferta_parser",
    about = "Course-offering extractor: PDF/CSV schedule tables → grouped JSON catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract rows from the offering PDF into the staging store
    Extract {
        /// Source PDF
        #[arg(long, default_value = "oferta.pdf")]
        pdf: PathBuf,
    },
    /// Import rows from a delimited (CSV) offering export
    Import {
        /// Source CSV
        #[arg(long, default_value = "oferta.csv")]
        file: PathBuf,
    },
    /// Build the grouped catalog from staged rows
    Build {
        /// Output JSON file
        #[arg(short, long, default_value = "cursos_horarios.json")]
        output: PathBuf,
    },
    /// Extract + build in one pipeline (sample data if the PDF is unreadable)
    Run {
        #[arg(long, default_value = "oferta.pdf")]
        pdf: PathBuf,
        #[arg(short, long, default_value = "cursos_horarios.json")]
        output: PathBuf,
    },
    /// Build from the embedded sample dataset and show the structure
    Demo {
        #[arg(short, long, default_value = "cursos_horarios.json")]
        output: PathBuf,
    },
    /// Aggregate counts for a saved catalog
    Stats {
        #[arg(long, default_value = "cursos_horarios.json")]
        file: PathBuf,
    },
    /// Hierarchical catalog summary
    Show {
        #[arg(long, default_value = "cursos_horarios.json")]
        file: PathBuf,
        /// Filter to one course code
        #[arg(short, long)]
        course: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { pdf } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let (pages, rows) = stage_pdf(&conn, &pdf)?;
            if rows == 0 {
                println!("No rows recognized in {} pages. A table-shaped export may need 'import'.", pages);
            } else {
                println!("Staged {} rows from {} pages of {}.", rows, pages, pdf.display());
            }
            Ok(())
        }
        Commands::Import { file } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let (kept, rejected) = stage_csv(&conn, &file)?;
            println!(
                "Staged {} rows from {} ({} rejected as non-data).",
                kept,
                file.display(),
                rejected
            );
            Ok(())
        }
        Commands::Build { output } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            build_from_staged(&conn, &output)
        }
        Commands::Run { pdf, output } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            match stage_pdf(&conn, &pdf) {
                Ok((pages, rows)) => {
                    println!("Staged {} rows from {} pages of {}.", rows, pages, pdf.display());
                }
                Err(e) => {
                    warn!("PDF extraction failed: {:#}. Falling back to the sample dataset.", e);
                    let rows = sample::rows();
                    db::clear_source(&conn, SAMPLE_SOURCE)?;
                    db::insert_rows(&conn, SAMPLE_SOURCE, None, &rows)?;
                    println!("Staged {} sample rows.", rows.len());
                }
            }
            build_from_staged(&conn, &output)
        }
        Commands::Demo { output } => {
            let (catalogo, counts) = parser::build_catalog(sample::rows());
            catalogo.save(&output)?;
            print_counts(&counts);
            report::stats(&catalogo).print();
            report::print_catalog(&catalogo, None);
            println!("\nCatalog saved to {}", output.display());
            Ok(())
        }
        Commands::Stats { file } => {
            let catalogo = parser::Catalogo::load(&file)?;
            report::stats(&catalogo).print();
            Ok(())
        }
        Commands::Show { file, course } => {
            let catalogo = parser::Catalogo::load(&file)?;
            report::print_catalog(&catalogo, course.as_deref());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Extract per-page text, split it into rows, and stage them. Returns
/// (pages, rows staged). Previously staged rows for the same file are
/// replaced.
fn stage_pdf(conn: &Connection, path: &Path) -> Result<(usize, usize)> {
    let pages = pdf::extract_pages(path)?;
    let source = path.display().to_string();
    db::clear_source(conn, &source)?;

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages")?
            .progress_chars("=> "),
    );

    let mut total = 0usize;
    for (i, page) in pages.iter().enumerate() {
        let rows = parser::rows::rows_from_text(page);
        total += db::insert_rows(conn, &source, Some(i as i64 + 1), &rows)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok((pages.len(), total))
}

/// Classify and stage rows from a delimited export. Returns (kept, rejected).
fn stage_csv(conn: &Connection, path: &Path) -> Result<(usize, usize)> {
    let raw = tabular::read_rows(path)?;
    let total = raw.len();
    let cleaned: Vec<Vec<String>> = raw
        .iter()
        .filter(|r| parser::rows::is_data_row(r))
        .filter_map(|r| parser::rows::clean_row(r))
        .collect();

    let source = path.display().to_string();
    db::clear_source(conn, &source)?;
    let kept = db::insert_rows(conn, &source, None, &cleaned)?;
    Ok((kept, total - kept))
}

fn build_from_staged(conn: &Connection, output: &Path) -> Result<()> {
    let rows = db::fetch_rows(conn)?;
    if rows.is_empty() {
        println!("No staged rows. Run 'extract' or 'import' first.");
        return Ok(());
    }

    let (catalogo, counts) = parser::build_catalog(rows);
    catalogo.save(output)?;
    print_counts(&counts);
    report::stats(&catalogo).print();
    println!("Catalog saved to {}", output.display());
    Ok(())
}

fn print_counts(counts: &BuildCounts) {
    println!("Merged {} rows ({} skipped).", counts.merged, counts.skipped);
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
