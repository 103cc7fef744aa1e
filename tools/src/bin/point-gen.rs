use anyhow::Context as _;
use anyhow::Result;
use rand::Rng;
use rand::SeedableRng as _;

const USAGE: &str = "Usage: point-gen [options] [out-points] >out.txt";

fn parse_center(definition: &str) -> Result<(i32, i32)> {
    let (x, y) = definition
        .split_once(',')
        .context("expected a center of the form X,Y")?;
    let x = x
        .trim()
        .parse()
        .with_context(|| format!("x coordinate {x:?} is not a valid integer"))?;
    let y = y
        .trim()
        .parse()
        .with_context(|| format!("y coordinate {y:?} is not a valid integer"))?;
    Ok((x, y))
}

/// Scatters `count` points uniformly in the squares of half-width `radius`
/// around each center, taking centers in turn.
fn generate<R: Rng>(
    rng: &mut R,
    centers: &[(i32, i32)],
    radius: i32,
    count: usize,
) -> Vec<(i32, i32)> {
    centers
        .iter()
        .cycle()
        .take(count)
        .map(|&(cx, cy)| {
            (
                cx.saturating_add(rng.gen_range(-radius..=radius)),
                cy.saturating_add(rng.gen_range(-radius..=radius)),
            )
        })
        .collect()
}

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optmulti(
        "c",
        "center",
        "center of a group of points (default: 0,0)",
        "X,Y",
    );
    options.optopt("n", "count", "number of points (default: 100)", "COUNT");
    options.optopt(
        "r",
        "radius",
        "half-width of the square around each center (default: 10)",
        "RADIUS",
    );
    options.optopt("s", "seed", "seed of the random number generator", "STRING");

    let matches = grappe_tools::parse_args(options, USAGE, 1)?;

    let centers: Vec<(i32, i32)> = matches
        .opt_strs("c")
        .iter()
        .map(|definition| {
            parse_center(definition).with_context(|| format!("invalid center {definition:?}"))
        })
        .collect::<Result<_>>()?;
    let centers = if centers.is_empty() {
        vec![(0, 0)]
    } else {
        centers
    };

    let count: usize = matches
        .opt_get("n")
        .context("invalid value for option 'count'")?
        .unwrap_or(100);

    let radius: i32 = matches
        .opt_get("r")
        .context("invalid value for option 'radius'")?
        .unwrap_or(10);
    if radius < 0 {
        anyhow::bail!("-r, --radius  must not be negative");
    }

    let seed: [u8; 32] = {
        let mut bytes = matches.opt_str("s").unwrap_or_default().into_bytes();
        bytes.resize(32_usize, 0_u8);
        let mut seed = [0_u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        seed
    };
    let mut rng = rand_pcg::Pcg64::from_seed(seed);

    let points = generate(&mut rng, &centers, radius, count);

    let output = grappe_tools::writer(matches.free.first())?;
    point_io::write_points(output, points).context("failed to write points")
}
