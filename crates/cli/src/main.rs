use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quadrilateral::api::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod script;

#[derive(Parser)]
#[command(name = "quad")]
#[command(about = "Quadrilateral constraint and classification runner")]
struct Cmd {
    /// Log solver and session decisions at DEBUG
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Validate and classify one figure
    Classify {
        /// Four points "x,y x,y x,y x,y" in A, B, C, D order
        #[arg(long)]
        points: String,
        /// Use the looser tolerances meant for physical-device input
        #[arg(long)]
        device: bool,
    },
    /// Replay a JSON script tick by tick and write the trace
    Replay {
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Draw seeded random figures and print the category histogram
    Sample {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1000)]
        count: u64,
        #[arg(long, default_value_t = 0.3)]
        angle_jitter: f64,
        #[arg(long, default_value_t = 0.4)]
        radial_jitter: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Classify { points, device } => classify_cmd(&points, device),
        Action::Replay { script, out } => replay(&script, &out),
        Action::Sample {
            seed,
            count,
            angle_jitter,
            radial_jitter,
        } => sample(seed, count, angle_jitter, radial_jitter),
        Action::Report => report(),
    }
}

fn classify_cmd(points: &str, device: bool) -> Result<()> {
    let pts = script::parse_points(points)?;
    let tol = if device {
        Tolerances::device()
    } else {
        Tolerances::default()
    };
    let shape = Shape::from_slice(&pts, Bounds::default(), tol).context("invalid figure")?;
    let snapshot = shape.snapshot();
    let obj = serde_json::json!({
        "category": shape.category(),
        "angles_deg": snapshot.angles.map(|a| a.map(f64::to_degrees)),
        "lengths": snapshot.lengths,
        "area": snapshot.area,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn replay(script_path: &Path, out: &Path) -> Result<()> {
    tracing::info!(script = %script_path.display(), out = %out.display(), "replay");
    let script = script::Script::load(script_path)?;
    let trace = script.replay()?;
    tracing::info!(
        ticks = trace.ticks.len(),
        changes = trace.changes.len(),
        "replay finished"
    );

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(&trace)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let prov = provenance::ReplaySidecar::describe(script_path, out, &trace).write()?;
    tracing::info!(provenance = %prov.display(), "wrote sidecar");
    Ok(())
}

fn sample(seed: u64, count: u64, angle_jitter: f64, radial_jitter: f64) -> Result<()> {
    let cfg = RadialCfg {
        angle_jitter_frac: angle_jitter,
        radial_jitter,
        ..RadialCfg::default()
    };
    let mut histogram: BTreeMap<NamedQuadrilateralCategory, u64> = BTreeMap::new();
    let mut rejected = 0u64;
    for index in 0..count {
        let tok = ReplayToken::new(seed, index);
        match draw_shape(cfg, tok, Bounds::default(), Tolerances::default()) {
            Some(shape) => *histogram.entry(shape.category()).or_default() += 1,
            None => rejected += 1,
        }
    }
    tracing::info!(seed, count, rejected, "sampled");
    let counts: BTreeMap<&str, u64> = histogram.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    let obj = serde_json::json!({
        "seed": seed,
        "count": count,
        "rejected": rejected,
        "categories": counts,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::code_rev(),
        "library_version": quadrilateral::VERSION,
        "tolerances": Tolerances::default(),
        "device_tolerances": Tolerances::device(),
        "move_cfg": MoveCfg::default(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
