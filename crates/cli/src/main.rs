use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use polyvol::api::{
    birkhoff, compute_inner_ball, cross_polytope, cube, enclosing_radius, estimate_volume,
    product_simplex, simplex, skinny_cube, HPolytope, RandomSource, RunConfig, RunFlags,
    VolumeEstimate, WalkKind,
};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod ine;
mod provenance;

#[derive(Parser)]
#[command(name = "polyvol", version)]
#[command(about = "Randomized volume estimation for H-polytopes")]
struct Cmd {
    /// Log phase progress (debug level)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Estimate the volume of an `.ine` polytope
    Estimate(EstimateArgs),
    /// Print the largest inscribed ball as JSON
    Ball {
        #[arg(long)]
        input: PathBuf,
    },
    /// Write a reference polytope as `.ine`
    Generate {
        #[arg(value_enum)]
        family: Family,
        /// Dimension; matrix size k for `birkhoff`, first factor for `prod-simplex`
        #[arg(long)]
        dim: usize,
        /// Second factor of `prod-simplex` (defaults to `--dim`)
        #[arg(long)]
        second: Option<usize>,
        /// Long half-width of `skinny-cube`
        #[arg(long, default_value_t = 100.0)]
        long_side: f64,
        /// Output path; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args)]
struct EstimateArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Walk steps per sample (default 10 + n/10)
    #[arg(long)]
    walk_length: Option<usize>,
    /// Samples per phase (default 400 n ln n / e²)
    #[arg(long)]
    samples: Option<usize>,
    /// Error parameter e of the sample rule
    #[arg(long, default_value_t = 1.0)]
    error: f64,
    /// Target relative error; raises the per-phase sample floor
    #[arg(long, default_value_t = 0.0)]
    relative_error: f64,
    #[arg(long, default_value_t = 1)]
    repetitions: usize,
    #[arg(long, value_enum, default_value_t = WalkArg::Coordinate)]
    walk: WalkArg,
    /// Precondition the body by its sample covariance
    #[arg(long)]
    rounding: bool,
    /// RNG seed; drawn from OS entropy when omitted (and recorded)
    #[arg(long)]
    seed: Option<u64>,
    /// JSON report path; stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum WalkArg {
    Coordinate,
    HitAndRun,
}

impl From<WalkArg> for WalkKind {
    fn from(w: WalkArg) -> Self {
        match w {
            WalkArg::Coordinate => WalkKind::CoordinateHitAndRun,
            WalkArg::HitAndRun => WalkKind::HitAndRun,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Family {
    Cube,
    SkinnyCube,
    Cross,
    Simplex,
    ProdSimplex,
    Birkhoff,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(if cmd.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Estimate(args) => estimate(args, cmd.verbose),
        Action::Ball { input } => ball(&input),
        Action::Generate {
            family,
            dim,
            second,
            long_side,
            out,
        } => generate(family, dim, second, long_side, out),
        Action::Report => report(),
    }
}

#[derive(Serialize)]
struct PhaseJson {
    index: usize,
    radius: f64,
    outer_radius: f64,
    samples: usize,
    hits: usize,
    ratio: f64,
    retries: usize,
}

#[derive(Serialize)]
struct EstimateReport {
    input: String,
    dim: usize,
    constraints: usize,
    volume: f64,
    log_volume: f64,
    repetition_log_volumes: Vec<f64>,
    inner_radius: f64,
    enclosing_radius: f64,
    rounding_log_det: f64,
    total_samples: usize,
    seed: u64,
    warnings: Vec<String>,
    phases: Vec<PhaseJson>,
}

impl EstimateReport {
    fn new(input: &Path, p: &HPolytope<f64>, est: &VolumeEstimate<f64>, seed: u64) -> Self {
        let phases = est
            .runs
            .first()
            .map(|run| {
                run.phases
                    .iter()
                    .map(|ph| PhaseJson {
                        index: ph.index,
                        radius: ph.radius,
                        outer_radius: ph.outer_radius,
                        samples: ph.samples,
                        hits: ph.hits,
                        ratio: ph.ratio,
                        retries: ph.retries,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            input: input.display().to_string(),
            dim: p.dim(),
            constraints: p.num_constraints(),
            volume: est.volume(),
            log_volume: est.log_volume,
            repetition_log_volumes: est.runs.iter().map(|r| r.log_volume).collect(),
            inner_radius: est.inner_ball.radius,
            enclosing_radius: est.enclosing_radius,
            rounding_log_det: est.rounding_log_det,
            total_samples: est.total_samples(),
            seed,
            warnings: est.warnings.iter().map(|w| w.to_string()).collect(),
            phases,
        }
    }
}

fn estimate(args: EstimateArgs, verbose: bool) -> Result<()> {
    let polytope = ine::read_polytope(&args.input)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = RunConfig {
        samples_per_phase: args.samples,
        walk_length: args.walk_length,
        thread_count: args.threads,
        relative_error: args.relative_error,
        error_parameter: args.error,
        repetitions: args.repetitions,
        walk: args.walk.into(),
        flags: RunFlags {
            use_rounding: args.rounding,
            verbose,
        },
        ..RunConfig::default()
    };
    tracing::info!(
        input = %args.input.display(),
        dim = polytope.dim(),
        constraints = polytope.num_constraints(),
        seed,
        "estimate"
    );
    let est = estimate_volume(&polytope, &config, &mut RandomSource::seeded(seed))
        .with_context(|| format!("estimating volume of {}", args.input.display()))?;
    let report = EstimateReport::new(&args.input, &polytope, &est, seed);
    let body = serde_json::to_string_pretty(&report)?;
    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
            }
            std::fs::write(out, &body).with_context(|| format!("writing {}", out.display()))?;
            let params = json!({
                "input": args.input.display().to_string(),
                "seed": seed,
                "threads": args.threads,
                "walk_length": config.walk_length_for(polytope.dim()),
                "samples_per_phase": args.samples,
                "error": args.error,
                "relative_error": args.relative_error,
                "repetitions": args.repetitions,
                "walk": format!("{:?}", config.walk),
                "rounding": args.rounding,
            });
            provenance::write_sidecar(out, provenance::Payload::new("estimate", params))?;
        }
        None => println!("{body}"),
    }
    Ok(())
}

fn ball(input: &Path) -> Result<()> {
    let polytope = ine::read_polytope(input)?;
    let inner = compute_inner_ball(&polytope)
        .with_context(|| format!("inner ball of {}", input.display()))?;
    let outer = enclosing_radius(&polytope, &inner.center)
        .with_context(|| format!("enclosing radius of {}", input.display()))?;
    let obj = json!({
        "center": inner.center.iter().copied().collect::<Vec<f64>>(),
        "radius": inner.radius,
        "enclosing_radius": outer,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn build_family(
    family: Family,
    dim: usize,
    second: Option<usize>,
    long_side: f64,
) -> Result<(String, HPolytope<f64>)> {
    let (name, p) = match family {
        Family::Cube => (format!("cube{dim}"), cube(dim, 1.0)),
        Family::SkinnyCube => (format!("skinny_cube{dim}"), skinny_cube(dim, long_side)),
        Family::Cross => (format!("cross_{dim}"), cross_polytope(dim)),
        Family::Simplex => (format!("simplex{dim}"), simplex(dim)),
        Family::ProdSimplex => {
            let q = second.unwrap_or(dim);
            (format!("prod_simplex_{dim}_{q}"), product_simplex(dim, q))
        }
        Family::Birkhoff => (format!("birk{dim}"), birkhoff(dim)),
    };
    let p = p.with_context(|| format!("building {family:?} with dim {dim}"))?;
    Ok((name, p))
}

fn generate(
    family: Family,
    dim: usize,
    second: Option<usize>,
    long_side: f64,
    out: Option<PathBuf>,
) -> Result<()> {
    let (name, p) = build_family(family, dim, second, long_side)?;
    match out {
        Some(path) => {
            ine::write_polytope(&path, &name, &p)?;
            tracing::info!(name = %name, out = %path.display(), "generate");
        }
        None => print!("{}", ine::format_ine(&name, &p)),
    }
    Ok(())
}

fn report() -> Result<()> {
    let payload = provenance::Payload::new("report", json!({}));
    let obj = provenance::document(&payload, &[]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn families_build_with_expected_names() {
        let (name, p) = build_family(Family::ProdSimplex, 3, None, 1.0).unwrap();
        assert_eq!(name, "prod_simplex_3_3");
        assert_eq!(p.dim(), 6);
        let (name, p) = build_family(Family::Birkhoff, 4, None, 1.0).unwrap();
        assert_eq!(name, "birk4");
        assert_eq!(p.dim(), 9);
        assert!(build_family(Family::Cross, 40, None, 1.0).is_err());
    }

    #[test]
    fn estimate_writes_report_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("cube3.ine");
        ine::write_polytope(&input, "cube3", &cube(3, 1.0).unwrap()).unwrap();
        let out = dir.path().join("out").join("cube3.json");
        let args = EstimateArgs {
            input: input.clone(),
            threads: 2,
            walk_length: None,
            samples: Some(2000),
            error: 1.0,
            relative_error: 0.0,
            repetitions: 4,
            walk: WalkArg::Coordinate,
            rounding: false,
            seed: Some(5),
            out: Some(out.clone()),
        };
        estimate(args, false).unwrap();
        let report: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        let volume = report["volume"].as_f64().unwrap();
        assert!((volume - 8.0).abs() < 1.0, "volume {volume}");
        assert_eq!(report["seed"], 5);
        assert_eq!(report["repetition_log_volumes"].as_array().unwrap().len(), 4);
        assert!(dir.path().join("out").join("cube3.provenance.json").exists());
    }
}
