//! Append-only partition tree with a fixed branching factor.
//!
//! Each node holds a region and the safety verdict of that region. Expanding a
//! leaf attaches exactly `N` children; nodes are never removed or modified
//! afterwards, so the internal nodes record the refinement history.

use std::fmt;

use log::trace;

use crate::enclosure::{ConstraintSet, Enclosure};
use crate::logic::{definitely, possibly, Kleenean};
use crate::types::{Effort, NodeId};

/// Value stored at a tree node: a region and whether it is safe.
///
/// `False` means the region is proven unsafe (disjoint from the safe set),
/// `True` that it is proven safe (inside the safe set). A region straddling the
/// boundary stays `Indeterminate` however far it is refined.
#[derive(Debug, Clone)]
pub struct TreeValue<E> {
    enclosure: E,
    safety: Kleenean,
}

impl<E: Enclosure> TreeValue<E> {
    pub fn new(enclosure: E, safety: Kleenean) -> Self {
        Self { enclosure, safety }
    }

    /// Evaluates the safety of `enclosure` against `constraints`.
    pub fn evaluate<C>(enclosure: E, constraints: &C, effort: Effort) -> Self
    where
        C: ConstraintSet<E> + ?Sized,
    {
        let safety = if !possibly(constraints.overlaps(&enclosure, effort)) {
            Kleenean::False
        } else if definitely(constraints.covers(&enclosure, effort)) {
            Kleenean::True
        } else {
            Kleenean::Indeterminate
        };
        Self { enclosure, safety }
    }

    pub fn enclosure(&self) -> &E {
        &self.enclosure
    }

    pub fn safety(&self) -> Kleenean {
        self.safety
    }
}

#[derive(Debug, Clone)]
struct TreeNode<E, const N: usize> {
    value: TreeValue<E>,
    parent: Option<NodeId>,
    depth: u32,
    children: Option<[NodeId; N]>,
}

pub struct PartitionTree<E, const N: usize> {
    nodes: Vec<TreeNode<E, N>>,
}

impl<E: Enclosure, const N: usize> PartitionTree<E, N> {
    /// Creates a tree with a single root leaf.
    pub fn new(root: TreeValue<E>) -> Self {
        assert!(N > 0, "Branching factor must be positive");
        Self {
            nodes: vec![TreeNode {
                value: root,
                parent: None,
                depth: 0,
                children: None,
            }],
        }
    }

    /// Creates the root from `region`, evaluating its safety against `constraints`.
    pub fn construct<C>(region: E, constraints: &C, effort: Effort) -> Self
    where
        C: ConstraintSet<E> + ?Sized,
    {
        Self::new(TreeValue::evaluate(region, constraints, effort))
    }

    pub const fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Total number of nodes, internal ones included.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> &TreeNode<E, N> {
        match self.nodes.get(id.index()) {
            Some(node) => node,
            None => panic!("Tree node {} does not exist", id),
        }
    }

    pub fn value(&self, id: NodeId) -> &TreeValue<E> {
        &self.node(id).value
    }

    pub fn enclosure(&self, id: NodeId) -> &E {
        self.value(id).enclosure()
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).children.is_none()
    }

    /// Children of `id`, empty for a leaf.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).children {
            Some(children) => children,
            None => &[],
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn depth(&self, id: NodeId) -> u32 {
        self.node(id).depth
    }

    /// Replaces the leaf `id` by `N` new leaves holding `values`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a leaf.
    pub fn expand(&mut self, id: NodeId, values: [TreeValue<E>; N]) -> [NodeId; N] {
        assert!(self.is_leaf(id), "Cannot expand {}: not a leaf", id);
        assert!(
            self.nodes.len() + N <= u32::MAX as usize,
            "Partition tree is full"
        );

        let depth = self.depth(id) + 1;
        let first = self.nodes.len();
        for value in values {
            self.nodes.push(TreeNode {
                value,
                parent: Some(id),
                depth,
                children: None,
            });
        }
        let children: [NodeId; N] = std::array::from_fn(|i| NodeId::new((first + i) as u32));
        trace!("expand {} into {:?}", id, children);
        self.nodes[id.index()].children = Some(children);
        children
    }

    /// Leaves of the subtree rooted at `id`, left to right.
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            let children = self.children(node);
            if children.is_empty() {
                leaves.push(node);
            } else {
                stack.extend(children.iter().rev());
            }
        }
        leaves
    }

    /// Number of leaves in the whole tree.
    pub fn leaf_count(&self) -> usize {
        // Every expansion turns one leaf into N.
        1 + (self.size() - 1) / N * (N - 1)
    }

    /// Largest depth of any node.
    pub fn height(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

impl<E, const N: usize> fmt::Debug for PartitionTree<E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionTree")
            .field("branching", &N)
            .field("size", &self.nodes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::boxes::IntervalBox;
    use crate::constraint::BoxConstraint;

    fn constraint() -> BoxConstraint {
        BoxConstraint::new(IntervalBox::from_bounds(&[(0.0, 3.0)]))
    }

    fn bisect(tree: &PartitionTree<IntervalBox, 2>, id: NodeId) -> [TreeValue<IntervalBox>; 2] {
        let (l, r) = tree.enclosure(id).bisect(0);
        let c = constraint();
        [
            TreeValue::evaluate(l, &c, Effort::default()),
            TreeValue::evaluate(r, &c, Effort::default()),
        ]
    }

    #[test]
    fn test_construct() {
        let tree = PartitionTree::<_, 2>::construct(
            IntervalBox::from_bounds(&[(0.0, 4.0)]),
            &constraint(),
            Effort::default(),
        );
        assert_eq!(tree.size(), 1);
        assert!(tree.is_leaf(tree.root()));
        assert!(tree.children(tree.root()).is_empty());
        assert_eq!(tree.value(tree.root()).safety(), Kleenean::Indeterminate);
    }

    #[test]
    fn test_expand() {
        let mut tree = PartitionTree::<_, 2>::construct(
            IntervalBox::from_bounds(&[(0.0, 8.0)]),
            &constraint(),
            Effort::default(),
        );
        let root = tree.root();
        let values = bisect(&tree, root);
        let [l, r] = tree.expand(root, values);
        assert_eq!(tree.size(), 3);
        assert!(!tree.is_leaf(root));
        assert_eq!(tree.children(root), &[l, r]);
        assert_eq!(tree.parent(l), Some(root));
        assert_eq!(tree.depth(r), 1);
        // [4, 8] lies outside the safe set [0, 3].
        assert!(!possibly(tree.value(r).safety()));
        assert!(possibly(tree.value(l).safety()));
        assert!(!definitely(tree.value(l).safety()));
    }

    #[test]
    fn test_leaves_and_growth() {
        let mut tree = PartitionTree::<_, 2>::construct(
            IntervalBox::from_bounds(&[(0.0, 8.0)]),
            &constraint(),
            Effort::default(),
        );
        let mut sizes = vec![tree.size()];
        let root = tree.root();
        let values = bisect(&tree, root);
        let [l, _] = tree.expand(root, values);
        sizes.push(tree.size());
        let values = bisect(&tree, l);
        let [ll, lr] = tree.expand(l, values);
        sizes.push(tree.size());

        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
        let leaves = tree.leaves(root);
        assert_eq!(leaves.len(), 3);
        assert_eq!(leaves[0], ll);
        assert_eq!(leaves[1], lr);
        // [0, 2] lies inside the safe set [0, 3], [2, 4] straddles its boundary.
        assert_eq!(tree.value(ll).safety(), Kleenean::True);
        assert_eq!(tree.value(lr).safety(), Kleenean::Indeterminate);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.height(), 2);
        // The root keeps its region after being refined.
        assert_eq!(tree.enclosure(root), &IntervalBox::from_bounds(&[(0.0, 8.0)]));
    }

    #[test]
    #[should_panic(expected = "not a leaf")]
    fn test_expand_non_leaf_panics() {
        let mut tree = PartitionTree::<_, 2>::construct(
            IntervalBox::from_bounds(&[(0.0, 8.0)]),
            &constraint(),
            Effort::default(),
        );
        let root = tree.root();
        let values = bisect(&tree, root);
        tree.expand(root, values);
        let values = bisect(&tree, root);
        tree.expand(root, values);
    }
}
