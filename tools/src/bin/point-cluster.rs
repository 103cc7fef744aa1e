use anyhow::Context as _;
use anyhow::Result;
use grappe::Cluster as _;
use std::path::Path;
use std::path::PathBuf;

const USAGE: &str = "Usage: point-cluster [options] K INPUT";

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optopt(
        "o",
        "output",
        "output file, '-' for stdout (default: derived from INPUT)",
        "FILE",
    );
    options.optopt("t", "trace", "emit a chrome trace", "FILE");
    options.optflag("v", "verbose", "print diagnostic data");

    let matches = grappe_tools::parse_args(options, USAGE, 2)?;

    let verbose = matches.opt_present("v");
    let _chrome_trace_guard = grappe_tools::init_tracing(matches.opt_str("t"), verbose);

    let (cluster_count, input) = match &matches.free[..] {
        [cluster_count, input] => (cluster_count, input),
        _ => anyhow::bail!("missing arguments, see --help\n\n{USAGE}"),
    };

    // Check K before touching any file.
    let cluster_count = grappe_tools::parse_cluster_count(cluster_count)?;

    let mut points = grappe_tools::read_points(Some(input))?;
    tracing::info!(%input, point_count = points.len(), "read points");

    let info = grappe::KMeans {
        cluster_count,
        ..Default::default()
    }
    .cluster(&mut points)
    .context("failed to cluster points")?;

    if verbose {
        eprintln!(
            "stopped after {} iterations: {}",
            info.iterations, info.stop,
        );
        for centroid in info.centroids.iter() {
            eprintln!(
                "Centroid {}: ({}, {})",
                centroid.cluster, centroid.x, centroid.y,
            );
        }
    }

    let output = matches
        .opt_str("o")
        .map(PathBuf::from)
        .unwrap_or_else(|| grappe_tools::output_path(Path::new(input)));
    let w = grappe_tools::writer(Some(&output))?;
    point_io::write(w, points.iter().map(|p| (p.x, p.y, p.cluster)))
        .with_context(|| format!("failed to write {}", output.display()))?;

    Ok(())
}
