use std::{fs, path::Path};

use anyhow::{Context, Result};
use bspline_camera::{
    synthetic::{self, noise::DirectionNoise},
    CentralModel, CentralModelParams, GridResiduals, KnotMethod, ModelConfig, Real, Vec3,
};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

/// Sample B-spline central camera models.
#[derive(Debug, Parser)]
#[command(author, version, about = "B-spline central camera model sampling")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sample the ray direction of one pixel.
    Sample {
        /// Path to JSON file containing CentralModelParams.
        #[arg(long)]
        model: String,
        /// Return a unit-length direction.
        #[arg(long)]
        normalized: bool,
        /// Horizontal pixel coordinate.
        #[arg(allow_negative_numbers = true)]
        u: Real,
        /// Vertical pixel coordinate.
        #[arg(allow_negative_numbers = true)]
        v: Real,
    },
    /// Sample the surface at every control node and compare with the control points.
    Grid {
        /// Path to JSON file containing CentralModelParams.
        #[arg(long)]
        model: String,
    },
    /// Print a synthetic model (pinhole or equidistant fisheye) as JSON.
    Synth {
        /// Control points along the horizontal axis.
        #[arg(long, default_value_t = 9)]
        n: usize,
        /// Control points along the vertical axis.
        #[arg(long, default_value_t = 7)]
        m: usize,
        /// Image width in pixels; also used as grid width.
        #[arg(long)]
        width: u32,
        /// Image height in pixels; also used as grid height.
        #[arg(long)]
        height: u32,
        /// Focal length in pixels.
        #[arg(long)]
        focal: Real,
        /// Use an equidistant fisheye instead of a pinhole.
        #[arg(long)]
        fisheye: bool,
        /// Spline order.
        #[arg(long, default_value_t = 3)]
        order: usize,
        /// Knot construction method (`open_uniform` or `uniform`).
        #[arg(long, default_value = "open_uniform")]
        knots: String,
        /// Rotate each control ray by up to this many degrees.
        #[arg(long, default_value_t = 0.0)]
        noise_deg: Real,
        /// Seed for the control-ray perturbation.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[derive(Debug, Serialize)]
struct SampleReport {
    u: Real,
    v: Real,
    normalized: bool,
    ray: Vec3,
}

#[derive(Debug, Serialize)]
struct GridReport {
    samples: Vec<Vec<Vec3>>,
    residuals: GridResiduals,
}

fn load_model(path: &Path) -> Result<CentralModel> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read model file {}", path.display()))?;
    let params: CentralModelParams = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse model file {}", path.display()))?;
    let model = params.build()?;
    info!(
        "loaded {}x{} control grid from {}",
        model.grid().n(),
        model.grid().m(),
        path.display()
    );
    Ok(model)
}

fn sample_from_file(model_path: &str, u: Real, v: Real, normalized: bool) -> Result<String> {
    let model = load_model(Path::new(model_path))?;
    let ray = if normalized {
        model.sample_normalized(u, v)?
    } else {
        model.sample(u, v)
    };
    let report = SampleReport {
        u,
        v,
        normalized,
        ray,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn grid_from_file(model_path: &str) -> Result<String> {
    let model = load_model(Path::new(model_path))?;
    let report = GridReport {
        samples: model.sample_grid(),
        residuals: model.grid_residuals(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

struct SynthOptions<'a> {
    n: usize,
    m: usize,
    dims: (u32, u32),
    focal: Real,
    fisheye: bool,
    order: usize,
    knots: &'a str,
    noise_deg: Real,
    seed: u64,
}

fn synth_params(opts: &SynthOptions<'_>) -> Result<String> {
    let knot_method: KnotMethod = opts.knots.parse()?;
    let grid = if opts.fisheye {
        synthetic::equidistant_fisheye_grid(opts.n, opts.m, opts.dims, opts.focal)?
    } else {
        synthetic::pinhole_grid(opts.n, opts.m, opts.dims, opts.focal)?
    };
    let grid = if opts.noise_deg != 0.0 {
        info!(
            "perturbing control rays by up to {} deg (seed {})",
            opts.noise_deg, opts.seed
        );
        DirectionNoise::new(opts.seed, opts.noise_deg.to_radians()).apply(&grid)?
    } else {
        grid
    };
    let config = ModelConfig::new(opts.dims, opts.dims, opts.order).with_knot_method(knot_method);
    // Validate before printing so the output always builds.
    let model = CentralModel::new(config, grid)?;
    Ok(serde_json::to_string_pretty(&CentralModelParams::from(&model))?)
}

fn main() {
    env_logger::init();
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let json = match args.command {
        Command::Sample {
            model,
            normalized,
            u,
            v,
        } => sample_from_file(&model, u, v, normalized)?,
        Command::Grid { model } => grid_from_file(&model)?,
        Command::Synth {
            n,
            m,
            width,
            height,
            focal,
            fisheye,
            order,
            knots,
            noise_deg,
            seed,
        } => synth_params(&SynthOptions {
            n,
            m,
            dims: (width, height),
            focal,
            fisheye,
            order,
            knots: &knots,
            noise_deg,
            seed,
        })?,
    };
    println!("{}", json);
    Ok(())
}
