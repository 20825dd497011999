//! Look up communes by name fragment or INSEE prefix, then print the info
//! panel and zoom target of a selected hit.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tracc_core::{load_atlas, zoom_target, AtlasConfig, LoadedAtlas, ViewController};

#[derive(Parser, Debug)]
#[command(name = "commune_search", about = "Search communes and show their climate card")]
struct Args {
    /// Name fragment (case-insensitive) or INSEE code prefix, at least 2 characters.
    query: String,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    data: Vec<String>,

    #[arg(short, long)]
    geometry: Vec<String>,

    /// Show the info panel and zoom target of the Nth hit (0-based).
    #[arg(short, long)]
    select: Option<usize>,

    /// Highlight the bivariate axes in the info panel.
    #[arg(short, long)]
    bivariate: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = AtlasConfig::load(args.config.as_deref())
        .context("reading atlas config")?
        .with_sources(args.data, args.geometry);
    let LoadedAtlas { atlas, features, .. } = load_atlas(&config).context("loading datasets")?;

    let hits = atlas.search(&args.query);
    if hits.is_empty() {
        eprintln!("No commune matches {:?}", args.query);
        return Ok(());
    }
    println!("{:<4} {:<8} {:<5} {}", "#", "INSEE", "Dép.", "Commune");
    println!("{}", "-".repeat(40));
    for (i, h) in hits.iter().enumerate() {
        println!("{:<4} {:<8} {:<5} {}", i, h.code_insee, h.departement, h.name);
    }

    let Some(n) = args.select else { return Ok(()) };
    let Some(hit) = hits.get(n) else {
        bail!("--select {n} out of range ({} hits)", hits.len());
    };

    let mut view = ViewController::new(atlas.catalog().clone());
    if args.bivariate {
        view.select_bivariate();
    }
    if let Some(panel) = atlas.info_panel(view.state(), hit.code_insee) {
        println!("\n{}\n{}", panel.name, panel.subtitle);
        for row in &panel.rows {
            let mark = if row.highlight { "*" } else { " " };
            println!("{mark} {:<42} {}", row.label, row.value);
        }
    }
    match zoom_target(&features, hit.code_insee) {
        Some(z) => println!(
            "\nZoom: [{:.4}, {:.4}] – [{:.4}, {:.4}] (max zoom {}, padding {} px)",
            z.bounds.min_lon, z.bounds.min_lat, z.bounds.max_lon, z.bounds.max_lat, z.max_zoom, z.padding_px
        ),
        None => println!("\nZoom: no contour for {}", hit.code_insee),
    }
    Ok(())
}
