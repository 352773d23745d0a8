use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::geometry::Point2D;

#[derive(Parser, Debug)]
#[command(name = "homography")]
#[command(version, about = "Estimate planar homographies from point correspondences and apply them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show solver details
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Estimate a homography and map points through it
    Estimate {
        #[command(flatten)]
        pairs: Correspondences,

        /// Point to map, as X,Y [default: centroid of the source points]
        #[arg(short, long = "map", value_parser = parse_point, allow_hyphen_values = true)]
        map: Vec<Point2D>,
    },

    /// Estimate a homography and warp an image through it
    Warp {
        /// Input image path
        #[arg(required = true)]
        input: PathBuf,

        #[command(flatten)]
        pairs: Correspondences,

        /// Output path [default: input_warped.png]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Source and destination points, paired by position
#[derive(Args, Debug)]
pub struct Correspondences {
    /// Source point, as X,Y (repeat 4 or more times)
    #[arg(short, long, required = true, value_parser = parse_point, allow_hyphen_values = true)]
    pub src: Vec<Point2D>,

    /// Destination point, as X,Y (repeat once per --src, in the same order)
    #[arg(short, long, required = true, value_parser = parse_point, allow_hyphen_values = true)]
    pub dst: Vec<Point2D>,
}

/// Default location for a warped image: `<stem>_warped.png` beside the input
pub fn warped_output_path(input: &std::path::Path, output: Option<&std::path::Path>) -> PathBuf {
    output.map(PathBuf::from).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        let parent = input.parent().unwrap_or(std::path::Path::new("."));
        parent.join(format!("{}_warped.png", stem))
    })
}

fn parse_point(s: &str) -> Result<Point2D, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid point format '{}', expected X,Y", s));
    }

    let x: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|_| format!("Invalid x value: {}", parts[0]))?;
    let y: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| format!("Invalid y value: {}", parts[1]))?;

    if !x.is_finite() || !y.is_finite() {
        return Err("Point coordinates must be finite".to_string());
    }

    Ok(Point2D::new(x, y))
}
