use clap::{Parser, ValueEnum};

use cegar_rs::boxes::IntervalBox;
use cegar_rs::cegar::{cegar, CegarConfig, CegarResult, Verdict};
use cegar_rs::constraint::BoxConstraint;
use cegar_rs::dynamics::{AffineMap, FnDynamics};
use cegar_rs::enclosure::Dynamics;
use cegar_rs::interval::Interval;
use cegar_rs::refinement::RefinementTree;
use cegar_rs::strategy::{AllButLast, Bisection, GridSplit, RegionSplitter};
use cegar_rs::types::Effort;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Map {
    /// `x -> scale * R(angle) x`
    Rotation,
    /// `(x, y) -> (1 - a x^2 + y, b x)`
    Henon,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Split {
    /// Halve the widest side
    Bisect,
    /// Halve both sides at once
    Grid,
}

/// Checks a planar map on the square `[-radius, radius]^2` with the safe set `[-safe, safe]^2`.
#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    #[arg(long, value_enum, default_value = "rotation")]
    map: Map,

    /// Rotation angle, in degrees.
    #[arg(long, value_name = "FLOAT", default_value = "90", allow_negative_numbers = true)]
    angle: f64,

    /// Expansion (> 1) or contraction (< 1) factor of the rotation.
    #[arg(long, value_name = "FLOAT", default_value = "2.0")]
    scale: f64,

    /// Henon parameters `a` and `b`.
    #[arg(long, num_args = 2, value_names = ["A", "B"], default_values_t = [1.4, 0.3], allow_negative_numbers = true)]
    henon: Vec<f64>,

    /// Half-width of the tracked domain.
    #[arg(long, value_name = "FLOAT", default_value = "4.0")]
    radius: f64,

    /// Half-width of the safe set.
    #[arg(long, value_name = "FLOAT", default_value = "3.0")]
    safe: f64,

    /// Initial region `[x0, x1] x [y0, y1]`.
    #[arg(long, num_args = 4, value_names = ["X0", "X1", "Y0", "Y1"], default_values_t = [1.1, 1.3, 1.1, 1.3], allow_negative_numbers = true)]
    initial: Vec<f64>,

    #[arg(long, value_enum, default_value = "grid")]
    split: Split,

    /// Node budget of the partition tree.
    #[arg(long, value_name = "INT", default_value = "2000")]
    max_nodes: usize,

    /// Bisection depth used for image enclosures and safety tests.
    #[arg(long, value_name = "INT", default_value = "0")]
    effort: u32,

    /// Write the final abstraction to this DOT file.
    #[arg(long, value_name = "FILE")]
    dot: Option<std::path::PathBuf>,

    /// Print debug logs.
    #[arg(short, long)]
    verbose: bool,
}

fn square(half: f64) -> IntervalBox {
    IntervalBox::from_bounds(&[(-half, half), (-half, half)])
}

fn run<D, S, const N: usize>(args: &Cli, dynamics: D, splitter: &S) -> color_eyre::Result<CegarResult<IntervalBox>>
where
    D: Dynamics<IntervalBox>,
    S: RegionSplitter<IntervalBox, N>,
{
    let config = CegarConfig {
        max_nodes: args.max_nodes,
        effort: Effort::new(args.effort),
        ..CegarConfig::default()
    };
    let safe = BoxConstraint::new(square(args.safe));
    let mut rtree = RefinementTree::<_, _, _, N>::new(square(args.radius), safe, dynamics, config.effort);

    let initial = IntervalBox::from_bounds(&[(args.initial[0], args.initial[1]), (args.initial[2], args.initial[3])]);
    let result = cegar(&mut rtree, &initial, splitter, &AllButLast, &config);

    println!(
        "tree: {} nodes, {} leaves, height {}; graph: {} edges",
        rtree.tree().size(),
        rtree.tree().leaf_count(),
        rtree.tree().height(),
        rtree.graph().edge_count()
    );
    if let Some(path) = &args.dot {
        let dot = rtree.to_dot(&rtree.image(&initial))?;
        std::fs::write(path, dot)?;
        println!("Wrote abstraction to {}", path.display());
    }
    Ok(result)
}

fn solve<D: Dynamics<IntervalBox>>(args: &Cli, dynamics: D) -> color_eyre::Result<CegarResult<IntervalBox>> {
    match args.split {
        Split::Bisect => run::<_, _, 2>(args, dynamics, &Bisection),
        Split::Grid => run::<_, _, 4>(args, dynamics, &GridSplit::<2>),
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    let time_total = std::time::Instant::now();

    let result = match args.map {
        Map::Rotation => {
            let (sin, cos) = args.angle.to_radians().sin_cos();
            let k = args.scale;
            let map = AffineMap::new(vec![vec![k * cos, -k * sin], vec![k * sin, k * cos]], vec![0.0, 0.0]);
            solve(&args, map)?
        }
        Map::Henon => {
            let (a, b) = (args.henon[0], args.henon[1]);
            let map = FnDynamics::new(move |x: &[Interval]| {
                vec![Interval::point(1.0) - x[0].sqr().scale(a) + x[1], x[0].scale(b)]
            });
            solve(&args, map)?
        }
    };

    println!("verdict = {}", result.verdict);
    println!("stats = {:?}", result.stats);
    if let Verdict::Unsafe(cex) = &result.verdict {
        print!("{}", cex);
    }

    println!("All done in {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
