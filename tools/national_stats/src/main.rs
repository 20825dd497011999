//! National distribution of every catalog variable: count, range, mean,
//! p5/p95 and the quintile and tertile class breaks used for coloring.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

use tracc_core::{
    record::parse_records, sources::load_first, AtlasConfig, Stats, StatsCache,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "national_stats", about = "Summarize the DRIAS table per variable")]
struct Args {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Climate table candidate; repeat for fallbacks.
    #[arg(short, long)]
    data: Vec<String>,

    /// Also write the statistics as JSON.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct VariableStats<'a> {
    key: &'a str,
    label: &'a str,
    unit: &'a str,
    stats: Option<&'a Stats>,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    // Contours are not needed here; only the climate table is loaded.
    let config = AtlasConfig::load(args.config.as_deref())
        .context("reading atlas config")?
        .with_sources(args.data, Vec::new());
    let catalog = config.catalog()?;
    let records = load_first("climate data", &config.data_sources, parse_records)?;
    let cache = StatsCache::build(&records, &catalog);

    eprintln!("{} communes, {} variables", records.len(), catalog.len());
    eprintln!(
        "\n{:<12} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9}  {}",
        "Variable", "N", "Min", "P5", "Mean", "P95", "Max", "Quintile breaks"
    );
    eprintln!("{}", "-".repeat(100));

    let mut rows = Vec::with_capacity(catalog.len());
    for var in &catalog {
        let stats = cache.get(&var.key);
        match stats {
            Some(s) => eprintln!(
                "{:<12} {:>6} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2}  {:?}",
                var.key, s.count, s.min, s.p5, s.mean, s.p95, s.max, s.breaks5
            ),
            None => eprintln!("{:<12} {:>6}  (no data)", var.key, 0),
        }
        rows.push(VariableStats { key: &var.key, label: &var.label, unit: &var.unit, stats });
    }

    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(&rows)?)
            .with_context(|| format!("writing {}", path.display()))?;
        eprintln!("\nWrote {}", path.display());
    }
    Ok(())
}
