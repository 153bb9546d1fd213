//! Validation of abstract counterexamples by tracing a concrete point.
//!
//! A single representative point of the first region is mapped forward step by
//! step. If it provably lands in every region of the path, the counterexample is
//! real. Otherwise nothing is known: other points of the region might still
//! follow the path, so the answer is never "proven spurious".

use log::debug;

use crate::enclosure::{ConstraintSet, Dynamics, Enclosure};
use crate::logic::{definitely, UpperKleenean};
use crate::refinement::RefinementTree;
use crate::types::VertexId;

impl<E, D, C, const N: usize> RefinementTree<E, D, C, N>
where
    E: Enclosure,
    D: Dynamics<E>,
    C: ConstraintSet<E>,
{
    /// Whether the counterexample `path` is spurious.
    ///
    /// * `path` - counterexample as returned by [`find_counterexample`][Self::find_counterexample]
    /// * `image` - the seeds the path was searched from
    /// * `initial` - the initial region the seeds cover
    ///
    /// Proven `False` means some point of `initial` follows `path` exactly.
    pub fn is_spurious(&self, path: &[VertexId], image: &[VertexId], initial: &E) -> UpperKleenean {
        let Some((&first, rest)) = path.split_first() else {
            return UpperKleenean::INDETERMINATE;
        };
        if !image.contains(&first) {
            debug!("counterexample does not start in the initial image");
            return UpperKleenean::INDETERMINATE;
        }

        let start = match self.node_value(first) {
            Some(value) => value.enclosure(),
            // Starting outside: real iff part of the initial region lies outside the domain.
            None => return UpperKleenean::from(self.root_enclosure().includes(initial)),
        };
        if definitely(initial.disjoint(start)) {
            return UpperKleenean::INDETERMINATE;
        }

        let mut point = start.intersection(initial).centre();
        if !definitely(initial.contains(&point)) || !definitely(start.contains(&point)) {
            debug!("representative point is not provably in the initial region");
            return UpperKleenean::INDETERMINATE;
        }

        for (step, &next) in rest.iter().enumerate() {
            let mapped = self.dynamics().evaluate(&point);
            let lands = match self.node_value(next) {
                Some(value) => value.enclosure().contains(&mapped),
                None => !self.root_enclosure().contains(&mapped),
            };
            if !definitely(lands) {
                debug!("traced point leaves the counterexample at step {} ({})", step + 1, lands);
                return UpperKleenean::INDETERMINATE;
            }
            point = mapped;
        }

        debug!("counterexample of length {} is realised", path.len());
        UpperKleenean::FALSE
    }
}
