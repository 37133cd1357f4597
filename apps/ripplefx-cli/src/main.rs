use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use ripplefx_common::{CanvasSize, DistortMode, GridDims};
use ripplefx_kernel::{DEFAULT_STEP, MAX_VERTICES, RIPPLE_LENGTH, SurfaceConfig, SurfaceEvent};
use ripplefx_render::{DistortionEngine, HeadlessAdapter};
use ripplefx_tools::{SurfaceInspector, SurfaceSummary};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ripplefx-cli", about = "Headless ripple surface tool")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and default constants
    Info,
    /// Run the surface headlessly and report on it
    Simulate(SimulateArgs),
    /// Print the default surface configuration as JSON
    Config,
}

#[derive(Args)]
struct SimulateArgs {
    /// Number of ticks to run
    #[arg(short, long, default_value = "100")]
    ticks: u64,
    /// Ripple origin as x,y in canvas coordinates (repeatable); defaults to the centre
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    at: Vec<Vec2>,
    /// Ripple speed
    #[arg(short, long, default_value_t = DEFAULT_STEP)]
    step: i32,
    /// Grid columns
    #[arg(long, default_value = "32")]
    cols: u32,
    /// Grid rows
    #[arg(long, default_value = "32")]
    rows: u32,
    /// Canvas width
    #[arg(long, default_value = "512")]
    width: f32,
    /// Canvas height
    #[arg(long, default_value = "512")]
    height: f32,
    /// Distort mode (vertices or texcoords)
    #[arg(long, default_value = "texcoords")]
    mode: DistortMode,
    /// Cap on simultaneous ripples; the oldest is evicted
    #[arg(long)]
    max_ripples: Option<usize>,
    /// Print a summary every N ticks
    #[arg(long)]
    report_every: Option<u64>,
    /// Print summaries as JSON
    #[arg(long)]
    json: bool,
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got {s:?}"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn report(summary: &SurfaceSummary, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = SurfaceConfig {
        grid: GridDims::new(args.cols, args.rows),
        canvas: CanvasSize::new(args.width, args.height),
        initial_mode: args.mode,
        max_ripples: args.max_ripples,
    };
    let mut engine =
        DistortionEngine::with_config("ripple".to_string(), HeadlessAdapter::new(), config)?;

    let origins = if args.at.is_empty() {
        vec![Vec2::ZERO]
    } else {
        args.at
    };
    for p in &origins {
        if let Err(e) = engine.add_ripple(p.x, p.y, args.step) {
            tracing::error!("cannot start ripple at ({}, {}): {e}", p.x, p.y);
            return Err(e.into());
        }
    }
    tracing::info!(
        ripples = origins.len(),
        ticks = args.ticks,
        mode = %args.mode,
        "simulation starting"
    );

    let mut expired = 0usize;
    for _ in 0..args.ticks {
        engine.tick();
        engine.draw(&());
        expired += engine
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::RippleExpired { .. }))
            .count();

        let tick = engine.surface().tick_count();
        if let Some(every) = args.report_every.filter(|n| *n > 0) {
            if tick % every == 0 {
                report(&SurfaceInspector::summary(engine.surface()), args.json)?;
            }
        }
    }

    let summary = SurfaceInspector::summary(engine.surface());
    report(&summary, args.json)?;
    if !args.json {
        for info in SurfaceInspector::ripples(engine.surface()) {
            println!("  {info}");
        }
        println!("expired: {expired}");
        println!("{}", engine.adapter().describe());
    }
    tracing::info!(
        tick = summary.tick,
        active = summary.active_ripples,
        expired,
        "simulation finished"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("ripplefx-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", ripplefx_kernel::crate_info());
            println!("render: {}", ripplefx_render::crate_info());
            println!("tools: {}", ripplefx_tools::crate_info());
            println!("ripple length: {RIPPLE_LENGTH}");
            println!("max vertices: {MAX_VERTICES}");
            println!("default step: {DEFAULT_STEP}");
        }
        Commands::Simulate(args) => simulate(args)?,
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&SurfaceConfig::default())?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_point_accepts_pairs() {
        assert_eq!(parse_point("10,-20").unwrap(), Vec2::new(10.0, -20.0));
        assert_eq!(parse_point(" 1.5 , 2 ").unwrap(), Vec2::new(1.5, 2.0));
    }

    #[test]
    fn parse_point_rejects_garbage() {
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "ripplefx-cli",
            "simulate",
            "--ticks",
            "5",
            "--at",
            "0,0",
            "--at",
            "-100,50",
            "--mode",
            "vertices",
        ])
        .unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.ticks, 5);
        assert_eq!(args.at.len(), 2);
        assert_eq!(args.mode, DistortMode::Vertices);
        assert_eq!(args.step, DEFAULT_STEP);
    }
}
