//! trueno-subplots - plan a subplot layout and show how it would be drawn.
//!
//! Reads a YAML layout request, resolves it, draws it into a recording
//! surface and prints the panels, sharing groups and draw calls.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trueno_subplots::prelude::*;
use trueno_subplots::surface::{RegionKind, SurfaceEvent};

/// Plan a subplot layout and print the result
#[derive(Parser, Debug)]
#[command(name = "trueno-subplots")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Subplot grid layout and axis-sharing planner", long_about = None)]
struct Cli {
    /// Layout request (YAML)
    layout: PathBuf,

    /// Config file path (defaults to the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the plan as YAML instead of a table
    #[arg(long)]
    yaml: bool,

    /// Log grouping and drawing decisions (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => LayoutConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LayoutConfig::default_path()
            .map(LayoutConfig::load_or_default)
            .unwrap_or_default(),
    };

    let request = LayoutFile::load(&cli.layout)
        .with_context(|| format!("reading layout {}", cli.layout.display()))?;
    let plan = request.to_subplots(config)?.plan().context("planning layout")?;

    if cli.yaml {
        print!("{}", serde_yaml_ng::to_string(&plan.summary())?);
    } else {
        print_plan(&plan);
    }

    let figure = plan.draw(RecordingSurface::new()).context("drawing layout")?;
    print_events(figure.surface());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "trueno_subplots=debug",
        _ => "trueno_subplots=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_plan(plan: &LayoutPlan) {
    let outer = plan.outer();
    println!(
        "grid {}x{} (main {}x{})",
        outer.nrows(),
        outer.ncols(),
        outer.main_rows,
        outer.main_cols
    );
    if let Some(aspect) = plan.aspect() {
        println!("aspect {aspect}");
    }

    println!("\n{:>5}  {:<10}  {:<8}  {:<8}  inner", "panel", "projection", "rows", "cols");
    for panel in plan.panels() {
        let inner = panel.inner.as_ref().map(|i| i.sides.to_string()).unwrap_or_default();
        println!(
            "{:>5}  {:<10}  {:<8}  {:<8}  {inner}",
            panel.number,
            panel.projection.to_string(),
            panel.rect.rows.to_string(),
            panel.rect.cols.to_string(),
        );
    }

    let summary = plan.summary();
    for (axis, groups) in [("x", &summary.share_x), ("y", &summary.share_y)] {
        for group in groups {
            println!("share {axis}: {:?} base {}", group.members, group.base);
        }
    }
}

fn print_events(surface: &RecordingSurface) {
    println!();
    for event in surface.events() {
        match *event {
            SurfaceEvent::Prepared { nrows, ncols } => println!("prepare {nrows}x{ncols}"),
            SurfaceEvent::Created { region, panel } => {
                let (share_x, share_y) =
                    surface.region(region).map(|r| (r.share_x, r.share_y)).unwrap_or_default();
                println!(
                    "create panel {panel}{}{}",
                    share_x.map(|s| format!(" sharex={}", label(surface, s))).unwrap_or_default(),
                    share_y.map(|s| format!(" sharey={}", label(surface, s))).unwrap_or_default(),
                );
            }
            SurfaceEvent::CreatedStrip { region, edge } => {
                let rect = surface.region(region).map(|r| r.rect.to_string()).unwrap_or_default();
                println!("create {edge} strip at {rect}");
            }
            SurfaceEvent::AdoptedX { region, base } => {
                println!("adopt x: {} <- {}", label(surface, region), label(surface, base));
            }
            SurfaceEvent::AdoptedY { region, base } => {
                println!("adopt y: {} <- {}", label(surface, region), label(surface, base));
            }
        }
    }
}

fn label(surface: &RecordingSurface, id: RegionId) -> String {
    match surface.region(id).map(|r| r.kind) {
        Some(RegionKind::Panel { number }) => format!("panel {number}"),
        Some(RegionKind::Strip { edge }) => format!("{edge} strip"),
        None => format!("region {}", id.0),
    }
}
