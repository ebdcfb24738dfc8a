//! Fit-free demo: build a B-spline surface over an ideal equidistant fisheye
//! and report how well it reproduces the lens.
//!
//! Run with: `cargo run -p bspline-camera --example fisheye_surface`

use anyhow::Result;
use bspline_camera::{synthetic, CentralModel, KnotMethod, ModelConfig, Real};

fn main() -> Result<()> {
    let dims = (1280, 960);
    let focal = 380.0;
    let grid = synthetic::equidistant_fisheye_grid(33, 25, dims, focal)?;

    for method in [KnotMethod::OpenUniform, KnotMethod::Uniform] {
        for order in [1, 2, 3] {
            let cfg = ModelConfig::new(dims, dims, order).with_knot_method(method);
            let model = CentralModel::new(cfg, grid.clone())?;
            let stats = model.grid_residuals();

            let (cx, cy) = ((dims.0 as Real - 1.0) / 2.0, (dims.1 as Real - 1.0) / 2.0);
            let mut worst_deg: Real = 0.0;
            for k in 0..50 {
                let u = 20.0 + k as Real * 24.0;
                let v = 20.0 + k as Real * 18.0;
                let ray = model.sample_normalized(u, v)?;
                let theta = (u - cx).hypot(v - cy) / focal;
                worst_deg = worst_deg.max((ray.z.clamp(-1.0, 1.0).acos() - theta).abs().to_degrees());
            }

            println!(
                "{:>12} order {}: grid rms {:.4}, max {:.4}, worst diagonal angle error {:.3} deg",
                method, order, stats.rms, stats.max, worst_deg
            );
        }
    }
    Ok(())
}
