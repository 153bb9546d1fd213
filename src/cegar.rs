//! The abstraction refinement loop.
//!
//! ```text
//! loop:
//!   budget exhausted                        -> Unknown
//!   no path from the initial image to a
//!   region not proven safe                  -> Safe
//!   path realised by a concrete point and
//!   ending in a region proven unsafe        -> Unsafe(path)
//!   otherwise split the regions picked by the locator and repeat
//! ```
//!
//! `Unsafe` is backed by a concrete witness. `Safe` means every region reachable
//! from the initial region in the abstraction is proven safe, and since the
//! graph over-approximates the dynamics, so is every reachable state.
//!
//! # Example
//!
//! ```
//! use cegar_rs::boxes::IntervalBox;
//! use cegar_rs::cegar::{cegar, CegarConfig, Verdict};
//! use cegar_rs::constraint::BoxConstraint;
//! use cegar_rs::dynamics::AffineMap;
//! use cegar_rs::refinement::RefinementTree;
//! use cegar_rs::strategy::{AllButLast, Bisection};
//! use cegar_rs::types::Effort;
//!
//! // x -> x + 3 on [0, 4]: every state in [1, 2] leaves the domain in one step.
//! let domain = IntervalBox::from_bounds(&[(0.0, 4.0)]);
//! let safe = BoxConstraint::new(domain.clone());
//! let mut rtree = RefinementTree::<_, _, _, 2>::new(domain, safe, AffineMap::scalar(1.0, 3.0), Effort::default());
//!
//! let initial = IntervalBox::from_bounds(&[(1.0, 2.0)]);
//! let result = cegar(&mut rtree, &initial, &Bisection, &AllButLast, &CegarConfig::default());
//! assert!(matches!(result.verdict, Verdict::Unsafe(_)));
//! ```

use std::fmt;

use log::{debug, info, warn};

use crate::enclosure::{ConstraintSet, Dynamics, Enclosure};
use crate::logic::possibly;
use crate::refinement::RefinementTree;
use crate::strategy::{Locator, RegionSplitter};
use crate::types::{Effort, VertexId};

/// Limits of a run.
#[derive(Debug, Clone)]
pub struct CegarConfig {
    /// Stop once the partition tree has this many nodes.
    pub max_nodes: usize,
    /// Stop after this many iterations, if set.
    pub max_iterations: Option<usize>,
    /// Effort for building a [`RefinementTree`] from this configuration.
    pub effort: Effort,
}

impl Default for CegarConfig {
    fn default() -> Self {
        Self {
            max_nodes: 1000,
            max_iterations: None,
            effort: Effort::default(),
        }
    }
}

/// A counterexample: the regions a concrete trajectory visits, in order.
#[derive(Debug, Clone)]
pub struct Counterexample<E> {
    /// Graph vertices of the path.
    pub vertices: Vec<VertexId>,
    /// Region of each vertex, `None` for the outside of the domain.
    pub regions: Vec<Option<E>>,
}

impl<E: Enclosure> Counterexample<E> {
    fn new<D, C, const N: usize>(rtree: &RefinementTree<E, D, C, N>, vertices: Vec<VertexId>) -> Self
    where
        D: Dynamics<E>,
        C: ConstraintSet<E>,
    {
        let regions = vertices
            .iter()
            .map(|&v| rtree.node_value(v).map(|value| value.enclosure().clone()))
            .collect();
        Self { vertices, regions }
    }
}

impl<E> Counterexample<E> {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl<E: fmt::Display> fmt::Display for Counterexample<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Counterexample ({} steps):", self.vertices.len())?;
        for (i, (v, region)) in self.vertices.iter().zip(&self.regions).enumerate() {
            match region {
                Some(region) => writeln!(f, "  Step {}: {} {}", i, v, region)?,
                None => writeln!(f, "  Step {}: {} outside of the domain", i, v)?,
            }
        }
        Ok(())
    }
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub enum Verdict<E> {
    /// Every region reachable from the initial region is proven safe.
    Safe,
    /// Some initial point provably reaches an unsafe region along this path.
    Unsafe(Counterexample<E>),
    /// The budget ran out, or refinement could not make progress.
    Unknown,
}

impl<E> Verdict<E> {
    pub fn is_safe(&self) -> bool {
        matches!(self, Verdict::Safe)
    }

    pub fn is_unsafe(&self) -> bool {
        matches!(self, Verdict::Unsafe(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Verdict::Unknown)
    }
}

impl<E> fmt::Display for Verdict<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Safe => write!(f, "safe"),
            Verdict::Unsafe(cex) => write!(f, "unsafe (counterexample of length {})", cex.len()),
            Verdict::Unknown => write!(f, "unknown"),
        }
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CegarStats {
    pub iterations: usize,
    pub refinements: usize,
    /// Paths to a region proven unsafe that no traced point realised.
    pub spurious_counterexamples: usize,
    /// Paths ending in a region neither proven safe nor proven unsafe.
    pub undecided_counterexamples: usize,
}

#[derive(Debug, Clone)]
pub struct CegarResult<E> {
    pub verdict: Verdict<E>,
    pub stats: CegarStats,
}

/// Runs abstraction refinement on `rtree` from the initial region `initial`.
///
/// * `splitter` - how a region is split
/// * `locator` - which vertices of a spurious counterexample are split
/// * `config` - node and iteration budgets
pub fn cegar<E, D, C, S, L, const N: usize>(
    rtree: &mut RefinementTree<E, D, C, N>,
    initial: &E,
    splitter: &S,
    locator: &L,
    config: &CegarConfig,
) -> CegarResult<E>
where
    E: Enclosure,
    D: Dynamics<E>,
    C: ConstraintSet<E>,
    S: RegionSplitter<E, N> + ?Sized,
    L: Locator + ?Sized,
{
    let mut stats = CegarStats::default();
    let mut image: Vec<VertexId> = Vec::new();
    for v in rtree.image(initial) {
        if !image.contains(&v) {
            image.push(v);
        }
    }

    let finish = |verdict: Verdict<E>, stats: CegarStats| {
        info!("verdict: {} after {} iterations, {} refinements", verdict, stats.iterations, stats.refinements);
        CegarResult { verdict, stats }
    };

    loop {
        if rtree.tree().size() >= config.max_nodes {
            info!("node budget of {} exhausted", config.max_nodes);
            return finish(Verdict::Unknown, stats);
        }
        if config.max_iterations.is_some_and(|max| stats.iterations >= max) {
            info!("iteration budget exhausted");
            return finish(Verdict::Unknown, stats);
        }
        stats.iterations += 1;
        info!(
            "iteration {}: {} nodes, {} leaves in the initial image",
            stats.iterations,
            rtree.tree().size(),
            image.len()
        );

        let path = rtree.find_counterexample(&image);
        let Some(&terminal) = path.last() else {
            return finish(Verdict::Safe, stats);
        };

        let unsafe_end = !possibly(rtree.is_safe(terminal));
        if unsafe_end && !possibly(rtree.is_spurious(&path, &image, initial)) {
            let cex = Counterexample::new(rtree, path);
            return finish(Verdict::Unsafe(cex), stats);
        }
        if unsafe_end {
            stats.spurious_counterexamples += 1;
        } else {
            debug!("counterexample ends in undecided region {}", terminal);
            stats.undecided_counterexamples += 1;
        }

        let mut progress = false;
        for v in locator.locate(&path, unsafe_end) {
            if !rtree.graph().contains(v) {
                continue;
            }
            let Some(node) = rtree.tree_node(v) else {
                continue;
            };
            if rtree.tree().size() + N >= config.max_nodes {
                info!("refining {} would exceed the node budget of {}", v, config.max_nodes);
                return finish(Verdict::Unknown, stats);
            }

            rtree.refine(v, splitter);
            stats.refinements += 1;
            progress = true;

            if let Some(pos) = image.iter().position(|&u| u == v) {
                image.remove(pos);
                for u in rtree.image_from(initial, node) {
                    if !image.contains(&u) {
                        image.push(u);
                    }
                }
                debug!("initial image now has {} leaves", image.len());
            }
        }

        if !progress {
            warn!("locator selected nothing to refine in a counterexample of length {}", path.len());
            return finish(Verdict::Unknown, stats);
        }
    }
}
