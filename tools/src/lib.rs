use anyhow::Context as _;
use anyhow::Result;
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Registry;
use tracing_tree::HierarchicalLayer;

/// Message shown when the number of clusters given on the command line is
/// not usable.
pub const INVALID_CLUSTER_COUNT: &str = "The value of K is wrong, needs to be greater than one.";

/// Parses the command line, handling `-h, --help` and extra arguments.
pub fn parse_args(
    mut options: getopts::Options,
    usage: &str,
    max_free_args: usize,
) -> Result<getopts::Matches> {
    options.optflag("h", "help", "print this help menu");

    let matches = options.parse(env::args().skip(1))?;

    if matches.opt_present("h") {
        println!("{}", options.usage(usage));
        std::process::exit(0);
    }
    if matches.free.len() > max_free_args {
        anyhow::bail!("too many arguments\n\n{}", options.usage(usage));
    }

    Ok(matches)
}

/// Installs the global tracing subscriber.
///
/// The filter is read from the `LOG` environment variable and defaults to
/// warnings, or to debug messages when `verbose` is set.  When `trace_file`
/// is given, a chrome trace is written there; it is complete once the
/// returned guard is dropped.
pub fn init_tracing(
    trace_file: Option<String>,
    verbose: bool,
) -> Option<tracing_chrome::FlushGuard> {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("LOG")
        .from_env_lossy();
    let registry = Registry::default().with(filter).with(
        HierarchicalLayer::new(4)
            .with_targets(true)
            .with_bracketed_fields(true),
    );
    match trace_file {
        Some(filename) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(filename)
                .build();
            registry.with(chrome_layer).init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

/// Parses the number of clusters, which must be at least two.
pub fn parse_cluster_count(arg: &str) -> Result<usize> {
    let cluster_count: i64 = arg
        .trim()
        .parse()
        .with_context(|| format!("invalid value for K: {arg:?}"))?;
    if cluster_count < 2 {
        anyhow::bail!(INVALID_CLUSTER_COUNT);
    }
    usize::try_from(cluster_count).context("K is too large")
}

/// Where to write the clusters of the points read from `input`.
///
/// `input<suffix>.<ext>` maps to `output<suffix>.txt`, any other
/// `<stem>.<ext>` maps to `<stem>.clusters.txt`, in the same directory.
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let file_name = match stem.strip_prefix("input") {
        Some(suffix) => format!("output{suffix}.txt"),
        None => format!("{stem}.clusters.txt"),
    };
    input.with_file_name(file_name)
}

/// Opens the given file, or the standard input if the file is `None` or
/// `-`.
pub fn reader(filename: Option<impl AsRef<Path>>) -> Result<Box<dyn io::BufRead>> {
    Ok(match filename {
        Some(filename) if filename.as_ref() != Path::new("-") => {
            let filename = filename.as_ref();
            let file = fs::File::open(filename)
                .with_context(|| format!("failed to open {}", filename.display()))?;
            Box::new(io::BufReader::new(file))
        }
        _ => Box::new(io::stdin().lock()),
    })
}

/// Creates the given file, or uses the standard output if the file is `None`
/// or `-`.
pub fn writer(filename: Option<impl AsRef<Path>>) -> Result<Box<dyn io::Write>> {
    Ok(match filename {
        Some(filename) if filename.as_ref() != Path::new("-") => {
            let filename = filename.as_ref();
            let file = fs::File::create(filename)
                .with_context(|| format!("failed to create {}", filename.display()))?;
            Box::new(io::BufWriter::new(file))
        }
        _ => Box::new(io::BufWriter::new(io::stdout().lock())),
    })
}

/// Reads a point file.
pub fn read_points(filename: Option<impl AsRef<Path>>) -> Result<Vec<grappe::Point>> {
    let r = reader(filename)?;
    let coordinates = point_io::read(r).context("failed to read point file")?;
    Ok(coordinates.into_iter().map(grappe::Point::from).collect())
}
