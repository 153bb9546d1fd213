//! Refinement tree: a partition tree with a transition graph over its leaves.
//!
//! The [`PartitionTree`] records how the state space has been split so far.
//! The [`TransitionGraph`] has one vertex per current leaf, plus one sentinel
//! vertex standing for everything outside the root region, and an edge
//! `u -> v` whenever the image of `u` is not proven disjoint from `v`.
//!
//! All mutation goes through [`RefinementTree::refine`], which splits a leaf
//! and repairs the graph around it, so the leaf/vertex correspondence holds
//! before and after every call.
//!
//! # Example
//!
//! ```
//! use cegar_rs::boxes::IntervalBox;
//! use cegar_rs::constraint::BoxConstraint;
//! use cegar_rs::dynamics::AffineMap;
//! use cegar_rs::refinement::RefinementTree;
//! use cegar_rs::strategy::Bisection;
//! use cegar_rs::types::Effort;
//!
//! let domain = IntervalBox::from_bounds(&[(0.0, 4.0)]);
//! let safe = BoxConstraint::new(IntervalBox::from_bounds(&[(0.0, 3.0)]));
//! let halve = AffineMap::scalar(0.5, 0.0);
//! let mut rtree = RefinementTree::<_, _, _, 2>::new(domain, safe, halve, Effort::default());
//!
//! let root = rtree.vertex(rtree.tree().root());
//! rtree.refine(root, &Bisection);
//! assert_eq!(rtree.tree().size(), 3);
//! assert_eq!(rtree.leaf_vertices().len(), 2);
//! ```

use std::fmt;

use log::{debug, trace};

use crate::enclosure::{ConstraintSet, Dynamics, Enclosure};
use crate::graph::TransitionGraph;
use crate::logic::{definitely, possibly, Kleenean, UpperKleenean};
use crate::strategy::RegionSplitter;
use crate::tree::{PartitionTree, TreeValue};
use crate::types::{Effort, NodeId, VertexId};

/// What a graph vertex stands for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Location {
    /// A leaf of the partition tree.
    Inside(NodeId),
    /// Everything outside the root region. Always unsafe.
    Outside,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Inside(node) => write!(f, "{}", node),
            Location::Outside => write!(f, "outside"),
        }
    }
}

/// How the graph is repaired after a leaf is split.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum EdgeRepair {
    /// Test the new leaves only against the former neighbours of the split leaf
    /// (and against each other).
    ///
    /// This relies on images being monotone under inclusion: a sub-region must not
    /// gain transitions its parent did not have.
    #[default]
    Local,
    /// Test the new leaves against every current leaf.
    Global,
}

pub struct RefinementTree<E, D, C, const N: usize> {
    constraints: C,
    dynamics: D,
    effort: Effort,
    repair: EdgeRepair,
    tree: PartitionTree<E, N>,
    graph: TransitionGraph<Location>,
    /// Graph vertex of each tree node, `None` once the node is refined.
    vertex_of: Vec<Option<VertexId>>,
    outside: VertexId,
}

impl<E, D, C, const N: usize> RefinementTree<E, D, C, N>
where
    E: Enclosure,
    D: Dynamics<E>,
    C: ConstraintSet<E>,
{
    /// Builds the one-leaf abstraction of `initial`.
    ///
    /// * `initial` - the tracked domain; everything outside it is unsafe
    /// * `constraints` - the safe set
    /// * `dynamics` - the evolution function
    /// * `effort` - effort used for every numeric predicate
    pub fn new(initial: E, constraints: C, dynamics: D, effort: Effort) -> Self {
        let tree = PartitionTree::construct(initial, &constraints, effort);
        let mut graph = TransitionGraph::new();
        let outside = graph.add_vertex(Location::Outside);
        let root = graph.add_vertex(Location::Inside(tree.root()));

        let mut rtree = Self {
            constraints,
            dynamics,
            effort,
            repair: EdgeRepair::default(),
            tree,
            graph,
            vertex_of: vec![Some(root)],
            outside,
        };

        let image = rtree.dynamics.image(rtree.root_enclosure(), effort);
        for target in [root, outside] {
            if possibly(rtree.reaches(&image, target)) {
                rtree.graph.add_edge(root, target);
            }
        }
        rtree
    }

    pub fn with_edge_repair(mut self, repair: EdgeRepair) -> Self {
        self.repair = repair;
        self
    }

    pub fn constraints(&self) -> &C {
        &self.constraints
    }

    pub fn dynamics(&self) -> &D {
        &self.dynamics
    }

    pub fn effort(&self) -> Effort {
        self.effort
    }

    pub fn tree(&self) -> &PartitionTree<E, N> {
        &self.tree
    }

    pub fn graph(&self) -> &TransitionGraph<Location> {
        &self.graph
    }

    /// The sentinel vertex for states outside the root region.
    pub fn outside(&self) -> VertexId {
        self.outside
    }

    pub fn root_enclosure(&self) -> &E {
        self.tree.enclosure(self.tree.root())
    }

    pub fn location(&self, v: VertexId) -> Location {
        self.graph.value(v)
    }

    /// Tree node behind `v`, `None` for the sentinel.
    pub fn tree_node(&self, v: VertexId) -> Option<NodeId> {
        match self.location(v) {
            Location::Inside(node) => Some(node),
            Location::Outside => None,
        }
    }

    /// Region and safety of `v`, `None` for the sentinel.
    pub fn node_value(&self, v: VertexId) -> Option<&TreeValue<E>> {
        self.tree_node(v).map(|node| self.tree.value(node))
    }

    /// Safety of `v`. The sentinel is proven unsafe.
    pub fn is_safe(&self, v: VertexId) -> Kleenean {
        match self.node_value(v) {
            Some(value) => value.safety(),
            None => Kleenean::False,
        }
    }

    /// Whether `a` and `b` stand for the same tree node (or both for the sentinel).
    pub fn same_node(&self, a: VertexId, b: VertexId) -> bool {
        self.location(a) == self.location(b)
    }

    /// Graph vertex of the leaf `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` has no vertex, i.e. it is not a current leaf.
    pub fn vertex(&self, node: NodeId) -> VertexId {
        match self.vertex_of.get(node.index()).copied().flatten() {
            Some(v) => v,
            None => panic!("No graph vertex found for tree node {}", node),
        }
    }

    /// Vertices of all current leaves, left to right.
    pub fn leaf_vertices(&self) -> Vec<VertexId> {
        self.leaves_of(self.tree.root())
    }

    /// Vertices of the leaves below tree node `node`.
    pub fn leaves_of(&self, node: NodeId) -> Vec<VertexId> {
        self.tree.leaves(node).into_iter().map(|leaf| self.vertex(leaf)).collect()
    }

    /// Vertices of the leaves covering `v`: `v` itself for a current leaf, the
    /// leaves of its subtree for a vertex whose node has just been expanded.
    pub fn leaves(&self, v: VertexId) -> Vec<VertexId> {
        match self.location(v) {
            Location::Inside(node) => self.leaves_of(node),
            Location::Outside => vec![v],
        }
    }

    /// Current leaves whose region is not proven disjoint from `region`, plus the
    /// sentinel if `region` is not proven to lie inside the root region.
    pub fn image(&self, region: &E) -> Vec<VertexId> {
        let mut parts = self.image_from(region, self.tree.root());
        if !definitely(self.root_enclosure().includes(region)) {
            parts.push(self.outside);
        }
        parts
    }

    /// Like [`image`][Self::image], restricted to the subtree rooted at `node`
    /// and never containing the sentinel.
    pub fn image_from(&self, region: &E, node: NodeId) -> Vec<VertexId> {
        let mut parts = Vec::new();
        self.image_rec(region, node, &mut parts);
        parts
    }

    fn image_rec(&self, region: &E, node: NodeId, parts: &mut Vec<VertexId>) {
        if definitely(region.disjoint(self.tree.enclosure(node))) {
            return;
        }
        if self.tree.is_leaf(node) {
            parts.push(self.vertex(node));
        } else {
            for &child in self.tree.children(node) {
                self.image_rec(region, child, parts);
            }
        }
    }

    /// Leaves that may map into `v`.
    pub fn preimage(&self, v: VertexId) -> &[VertexId] {
        self.graph.in_edges(v)
    }

    /// Leaves `v` may map into.
    pub fn postimage(&self, v: VertexId) -> &[VertexId] {
        self.graph.out_edges(v)
    }

    fn image_of(&self, v: VertexId) -> Option<E> {
        self.node_value(v)
            .map(|value| self.dynamics.image(value.enclosure(), self.effort))
    }

    /// Whether a set whose image is enclosed by `image` may reach `target`.
    fn reaches(&self, image: &E, target: VertexId) -> UpperKleenean {
        match self.node_value(target) {
            Some(value) => UpperKleenean::from(!image.disjoint(value.enclosure())),
            None => UpperKleenean::from(!self.root_enclosure().includes(image)),
        }
    }

    /// Whether some point of `src` may be mapped into `dst`.
    ///
    /// Proven `False` means the transition is impossible. Nothing leaves the sentinel.
    pub fn is_reachable(&self, src: VertexId, dst: VertexId) -> UpperKleenean {
        match self.image_of(src) {
            Some(image) => self.reaches(&image, dst),
            None => UpperKleenean::FALSE,
        }
    }

    /// Splits the leaf `v` with `splitter` and repairs the transition graph.
    ///
    /// Returns the vertices of the new leaves. `v` is removed from the graph.
    ///
    /// # Panics
    ///
    /// Panics if `v` is the sentinel or not a current leaf.
    pub fn refine<S>(&mut self, v: VertexId, splitter: &S) -> [VertexId; N]
    where
        S: RegionSplitter<E, N> + ?Sized,
    {
        let node = match self.tree_node(v) {
            Some(node) => node,
            None => panic!("Cannot refine the outside vertex"),
        };
        assert!(self.tree.is_leaf(node), "Cannot refine {}: not a leaf", node);

        let regions = splitter.split(self.tree.enclosure(node));
        let values = regions.map(|region| TreeValue::evaluate(region, &self.constraints, self.effort));
        let children = self.tree.expand(node, values);

        self.vertex_of.resize(self.tree.size(), None);
        let refined = children.map(|child| {
            let cv = self.graph.add_vertex(Location::Inside(child));
            self.vertex_of[child.index()] = Some(cv);
            cv
        });

        // The split leaf is included on both sides: transitions invisible at the
        // parent's granularity may appear between its children.
        let (preds, succs) = match self.repair {
            EdgeRepair::Local => {
                let mut preds = self.preimage(v).to_vec();
                preds.push(v);
                let mut succs = self.postimage(v).to_vec();
                succs.push(v);
                (self.leaves_all(&preds), self.leaves_all(&succs))
            }
            EdgeRepair::Global => {
                let mut all = self.leaf_vertices();
                let preds = all.clone();
                all.push(self.outside);
                (preds, all)
            }
        };

        let mut added = 0;
        for &pred in &preds {
            let Some(image) = self.image_of(pred) else { continue };
            for &child in &refined {
                if possibly(self.reaches(&image, child)) {
                    trace!("edge {} -> {}", pred, child);
                    self.graph.add_edge(pred, child);
                    added += 1;
                }
            }
        }
        for &child in &refined {
            let Some(image) = self.image_of(child) else { continue };
            for &succ in &succs {
                if possibly(self.reaches(&image, succ)) {
                    trace!("edge {} -> {}", child, succ);
                    self.graph.add_edge(child, succ);
                    added += 1;
                }
            }
        }

        self.graph.remove_vertex(v);
        self.vertex_of[node.index()] = None;
        debug!(
            "refined {} ({}) into {:?}, {} edge tests passed, graph now has {} vertices and {} edges",
            v,
            node,
            refined,
            added,
            self.graph.vertex_count(),
            self.graph.edge_count()
        );
        refined
    }

    /// Leaf vertices covering all of `vs`, without duplicates.
    fn leaves_all(&self, vs: &[VertexId]) -> Vec<VertexId> {
        let mut leaves: Vec<VertexId> = vs.iter().flat_map(|&v| self.leaves(v)).collect();
        leaves.sort_unstable();
        leaves.dedup();
        leaves
    }

    /// Checks that the graph vertices are exactly the current leaves plus the sentinel.
    ///
    /// # Panics
    ///
    /// Panics on the first violation found.
    pub fn check_consistency(&self) {
        let leaves = self.tree.leaves(self.tree.root());
        assert_eq!(
            self.graph.vertex_count(),
            leaves.len() + 1,
            "Graph has {} vertices for {} leaves",
            self.graph.vertex_count(),
            leaves.len()
        );
        for leaf in leaves {
            let v = self.vertex(leaf);
            assert_eq!(self.location(v), Location::Inside(leaf), "Vertex {} points elsewhere", v);
        }
        assert_eq!(self.location(self.outside), Location::Outside);
        assert!(self.postimage(self.outside).is_empty(), "Outside vertex has successors");
    }
}

impl<E, D, C, const N: usize> fmt::Debug for RefinementTree<E, D, C, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefinementTree")
            .field("effort", &self.effort)
            .field("repair", &self.repair)
            .field("tree", &self.tree)
            .field("graph", &self.graph)
            .finish()
    }
}
