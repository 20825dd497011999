//! Render one map state to data: the fill of every commune contour, plus the
//! legend, stats panel and join report that go with it.
//! Output: JSON on stdout or `--output`, summary table on stderr.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::{collections::BTreeMap, fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

use tracc_core::{
    load_atlas, AtlasConfig, FillLayer, JoinReport, Legend, LoadedAtlas, StatsPanel, ViewController,
    ViewState,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "choropleth", about = "Classify every commune contour for one variable or the bivariate map")]
struct Args {
    /// Atlas config JSON (sources, variable catalog). Built-in defaults when absent.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Climate table candidate; repeat for fallbacks. Replaces the configured list.
    #[arg(short, long)]
    data: Vec<String>,

    /// Contour GeoJSON candidate (path or URL); repeat for fallbacks.
    #[arg(short, long)]
    geometry: Vec<String>,

    /// Variable key to map (e.g. drias_Cumu). Defaults to the first in the catalog.
    #[arg(short, long, conflicts_with = "bivariate")]
    variable: Option<String>,

    /// Map intensity × frequency instead of a single variable.
    #[arg(short, long)]
    bivariate: bool,

    /// Write the JSON here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

// ── Output types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct FeatureFill<'a> {
    code: &'a str,
    fill: &'a str,
}

#[derive(Serialize)]
struct MapOutput<'a> {
    state: ViewState,
    join: JoinReport,
    legend: Option<Legend>,
    stats: Option<StatsPanel>,
    fills: Vec<FeatureFill<'a>>,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = AtlasConfig::load(args.config.as_deref())
        .context("reading atlas config")?
        .with_sources(args.data, args.geometry);
    let LoadedAtlas { atlas, features, join } = load_atlas(&config).context("loading datasets")?;

    let mut view = ViewController::new(atlas.catalog().clone());
    view.subscribe(|s| eprintln!("View: {} ({:?})", s.variable, s.mode));
    if let Some(key) = &args.variable {
        view.select_variable(key)?;
    } else if args.bivariate {
        view.select_bivariate();
    } else {
        view.refresh();
    }
    let state = view.state().clone();

    let mut layer = FillLayer::new(&features);
    layer.recolor(&atlas, &state);

    let legend = atlas.legend(&state);

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for fill in layer.fills() {
        *counts.entry(*fill).or_default() += 1;
    }
    eprintln!("\nJoined {} / {} contours ({} unjoined)", join.joined, join.joined + join.unjoined, join.unjoined);
    eprintln!("\n{:<10} {:>8}", "Fill", "N");
    eprintln!("{}", "-".repeat(19));
    for (fill, n) in &counts {
        eprintln!("{:<10} {:>8}", fill, n);
    }

    let out = MapOutput {
        stats: atlas.stats_panel(&state),
        state,
        join,
        legend,
        fills: layer
            .keys()
            .iter()
            .zip(layer.fills())
            .map(|(code, fill)| FeatureFill { code: code.as_str(), fill: *fill })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&out)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
