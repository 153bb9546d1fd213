//! Counterexample search over the transition graph.
//!
//! Depth-first search from the initial image. A branch ends either in a vertex
//! not proven safe (a counterexample) or when it closes a loop back onto the path.
//! Only branches through regions proven safe are extended, so an empty result
//! means every state reachable in the graph is proven safe.
//! The path is kept in one buffer that grows and shrinks with the search, next
//! to an explicit stack of pending successors, so no path is ever copied.

use std::collections::HashSet;

use log::{debug, trace};

use crate::enclosure::{ConstraintSet, Dynamics, Enclosure};
use crate::logic::definitely;
use crate::refinement::RefinementTree;
use crate::types::VertexId;

impl<E, D, C, const N: usize> RefinementTree<E, D, C, N>
where
    E: Enclosure,
    D: Dynamics<E>,
    C: ConstraintSet<E>,
{
    /// Finds a path from one of `seeds` to a vertex not proven safe.
    ///
    /// Returns the vertices of the path in order, that vertex last, or an empty
    /// vector if every vertex reachable in the graph is proven safe.
    pub fn find_counterexample(&self, seeds: &[VertexId]) -> Vec<VertexId> {
        let mut path: Vec<VertexId> = Vec::new();
        // Candidates still to try at each depth: frame `k` holds successors of `path[k - 1]`.
        let mut frames: Vec<(Vec<VertexId>, usize)> = vec![(seeds.to_vec(), 0)];
        // Vertices whose whole exploration ended without a counterexample.
        let mut exhausted: HashSet<VertexId> = HashSet::new();

        while let Some((candidates, cursor)) = frames.last_mut() {
            let next = candidates.get(*cursor).copied();
            *cursor += 1;
            let Some(v) = next else {
                frames.pop();
                if let Some(done) = path.pop() {
                    exhausted.insert(done);
                }
                continue;
            };

            if exhausted.contains(&v) || path.iter().any(|&p| self.same_node(p, v)) {
                trace!("skip {}", v);
                continue;
            }

            path.push(v);
            if !definitely(self.is_safe(v)) {
                debug!("counterexample of length {}", path.len());
                return path;
            }
            trace!("descend into {} at depth {}", v, path.len());
            frames.push((self.postimage(v).to_vec(), 0));
        }

        debug!("no counterexample from {} seeds", seeds.len());
        Vec::new()
    }
}
