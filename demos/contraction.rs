use clap::{Parser, ValueEnum};

use cegar_rs::boxes::IntervalBox;
use cegar_rs::cegar::{cegar, CegarConfig, Verdict};
use cegar_rs::constraint::BoxConstraint;
use cegar_rs::dynamics::AffineMap;
use cegar_rs::refinement::RefinementTree;
use cegar_rs::strategy::{AllButLast, Bisection, Everything, First, Locator};
use cegar_rs::types::Effort;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Refine every region of the counterexample except a proven-unsafe last one
    AllButLast,
    /// Refine every region of the counterexample
    Everything,
    /// Refine only the region in the initial image
    First,
}

/// Checks the one-dimensional affine map `x -> rate * x + offset`.
#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Slope of the map.
    #[arg(long, value_name = "FLOAT", default_value = "0.5", allow_negative_numbers = true)]
    rate: f64,

    /// Offset of the map.
    #[arg(long, value_name = "FLOAT", default_value = "1.0", allow_negative_numbers = true)]
    offset: f64,

    /// Tracked domain `[lo, hi]`.
    #[arg(long, num_args = 2, value_names = ["LO", "HI"], default_values_t = [0.0, 8.0], allow_negative_numbers = true)]
    domain: Vec<f64>,

    /// Safe set `[lo, hi]`.
    #[arg(long, num_args = 2, value_names = ["LO", "HI"], default_values_t = [0.0, 6.0], allow_negative_numbers = true)]
    safe: Vec<f64>,

    /// Initial region `[lo, hi]`.
    #[arg(long, num_args = 2, value_names = ["LO", "HI"], default_values_t = [0.0, 1.0], allow_negative_numbers = true)]
    initial: Vec<f64>,

    /// Node budget of the partition tree.
    #[arg(long, value_name = "INT", default_value = "1000")]
    max_nodes: usize,

    /// Iteration budget.
    #[arg(long, value_name = "INT")]
    max_iterations: Option<usize>,

    /// Bisection depth used when testing regions against the safe set.
    #[arg(long, value_name = "INT", default_value = "0")]
    effort: u32,

    /// Refinement strategy.
    #[arg(long, value_enum, default_value = "all-but-last")]
    strategy: Strategy,

    /// Write the final abstraction to this DOT file.
    #[arg(long, value_name = "FILE")]
    dot: Option<std::path::PathBuf>,

    /// Print debug logs.
    #[arg(short, long)]
    verbose: bool,
}

fn bounds(values: &[f64]) -> IntervalBox {
    IntervalBox::from_bounds(&[(values[0], values[1])])
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

    let config = CegarConfig {
        max_nodes: args.max_nodes,
        max_iterations: args.max_iterations,
        effort: Effort::new(args.effort),
    };
    let safe = BoxConstraint::new(bounds(&args.safe));
    let dynamics = AffineMap::scalar(args.rate, args.offset);
    let mut rtree = RefinementTree::<_, _, _, 2>::new(bounds(&args.domain), safe, dynamics, config.effort);

    let initial = bounds(&args.initial);
    let locator: &dyn Locator = match args.strategy {
        Strategy::AllButLast => &AllButLast,
        Strategy::Everything => &Everything,
        Strategy::First => &First,
    };
    let result = cegar(&mut rtree, &initial, &Bisection, locator, &config);

    println!("verdict = {}", result.verdict);
    println!("stats = {:?}", result.stats);
    println!(
        "tree: {} nodes, {} leaves, height {}",
        rtree.tree().size(),
        rtree.tree().leaf_count(),
        rtree.tree().height()
    );
    if let Verdict::Unsafe(cex) = &result.verdict {
        print!("{}", cex);
    }

    if let Some(path) = &args.dot {
        let dot = rtree.to_dot(&rtree.image(&initial))?;
        std::fs::write(path, dot)?;
        println!("Wrote abstraction to {}", path.display());
    }

    println!("All done in {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
