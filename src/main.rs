use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use planar_homography::cli::{warped_output_path, Command, Correspondences};
use planar_homography::{
    apply_homography, centroid, estimate_homography, rms_reprojection_error, warp_perspective,
    Cli, Homography, Point2D, SolveMode,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Estimate { pairs, map } => run_estimate(&pairs, &map),
        Command::Warp {
            input,
            pairs,
            output,
        } => {
            let output_path = warped_output_path(&input, output.as_deref());
            run_warp(&input, &output_path, &pairs)
        }
    }
}

fn estimate(pairs: &Correspondences) -> Result<Homography> {
    let h = estimate_homography(&pairs.src, &pairs.dst)
        .context("Failed to estimate homography")?;

    if let Some(mode) = SolveMode::for_points(pairs.src.len()) {
        info!(
            "Solved {:?} from {} correspondences (RMS reprojection error: {:.6})",
            mode,
            pairs.src.len(),
            rms_reprojection_error(&h, &pairs.src, &pairs.dst)
        );
    }

    Ok(h)
}

fn run_estimate(pairs: &Correspondences, map: &[Point2D]) -> Result<()> {
    let h = estimate(pairs)?;

    println!("Homography:");
    for row in 0..3 {
        println!(
            "  [{:12.6}, {:12.6}, {:12.6}]",
            h[(row, 0)],
            h[(row, 1)],
            h[(row, 2)]
        );
    }

    // Without explicit points, follow the source centroid
    let targets: Vec<Point2D> = if map.is_empty() {
        centroid(&pairs.src).into_iter().collect()
    } else {
        map.to_vec()
    };

    if !targets.is_empty() {
        println!();
    }
    for p in &targets {
        let (x, y) = apply_homography(&h, p.x, p.y);
        println!("({:.6}, {:.6}) -> ({:.6}, {:.6})", p.x, p.y, x, y);
    }

    Ok(())
}

fn run_warp(
    input: &std::path::Path,
    output_path: &std::path::Path,
    pairs: &Correspondences,
) -> Result<()> {
    let img = ImageReader::open(input)
        .with_context(|| format!("Failed to open input file: {:?}", input))?
        .decode()
        .with_context(|| format!("Failed to decode image: {:?}", input))?;
    info!("Loaded image: {:?} ({}x{})", input, img.width(), img.height());

    let h = estimate(pairs)?;

    let warped = warp_perspective(&img.to_rgba8(), &h).context("Failed to warp image")?;
    warped
        .save(output_path)
        .with_context(|| format!("Failed to save output: {:?}", output_path))?;

    info!("Saved warped image: {:?}", output_path);
    info!(
        "Dimensions: {}x{} -> {}x{}",
        img.width(),
        img.height(),
        warped.width(),
        warped.height()
    );

    Ok(())
}
