//! Type-safe handles and parameters shared by the tree, the graph and the loop.
//!
//! Tree nodes and graph vertices live in arenas and are addressed by index.
//! The newtypes below keep the two index spaces apart, so a tree index can
//! never be handed to the graph by mistake.
use std::fmt;

/// Index of a node in the [`PartitionTree`][crate::tree::PartitionTree] arena.
///
/// Nodes are never deleted, so a `NodeId` stays valid for the lifetime of the tree.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Returns the position of the node in the arena.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Index of a vertex in the [`TransitionGraph`][crate::graph::TransitionGraph] arena.
///
/// # Invariants
///
/// - Slots of removed vertices are never reused, so two live handles are equal
///   iff they denote the same vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VertexId(u32);

impl VertexId {
    pub const fn new(index: u32) -> Self {
        VertexId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Amount of work a bounded-precision predicate may spend before giving up
/// with an indeterminate answer.
///
/// The meaning of a level is up to the numeric layer; the concrete enclosures in
/// this crate bisect their input `level` times.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Effort(u32);

impl Effort {
    pub const fn new(level: u32) -> Self {
        Effort(level)
    }

    pub const fn level(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effort {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_node_id() {
        let n = NodeId::new(7);
        assert_eq!(n.index(), 7);
        assert_eq!(n.to_string(), "n7");
        assert!(NodeId::new(1) < NodeId::new(2));
    }

    #[test]
    fn test_vertex_id() {
        let v = VertexId::new(3);
        assert_eq!(v.index(), 3);
        assert_eq!(v.to_string(), "v3");
    }

    #[test]
    fn test_effort() {
        let e = Effort::default();
        assert_eq!(e.level(), 0);
        assert_eq!(Effort::new(3).level(), 3);
        assert_eq!(Effort::new(4).to_string(), "effort 4");
    }
}
