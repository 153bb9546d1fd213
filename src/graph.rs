//! Directed graph over arena-allocated vertices.
//!
//! Vertices carry a small `Copy` value and keep both their successor and their
//! predecessor lists, so pre- and post-images are available without scanning.
//! Removing a vertex frees its slot for good: handles are never reused.

use std::fmt;

use log::trace;

use crate::types::VertexId;

#[derive(Debug, Clone)]
struct VertexData<V> {
    value: V,
    succs: Vec<VertexId>,
    preds: Vec<VertexId>,
}

pub struct TransitionGraph<V> {
    slots: Vec<Option<VertexData<V>>>,
    live: usize,
    edges: usize,
}

impl<V> Default for TransitionGraph<V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
            edges: 0,
        }
    }
}

impl<V: Copy + fmt::Debug> TransitionGraph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self, v: VertexId) -> &VertexData<V> {
        match self.slots.get(v.index()) {
            Some(Some(data)) => data,
            _ => panic!("Vertex {} is not in the graph", v),
        }
    }

    fn data_mut(&mut self, v: VertexId) -> &mut VertexData<V> {
        match self.slots.get_mut(v.index()) {
            Some(Some(data)) => data,
            _ => panic!("Vertex {} is not in the graph", v),
        }
    }

    pub fn add_vertex(&mut self, value: V) -> VertexId {
        assert!(self.slots.len() < u32::MAX as usize, "Transition graph is full");
        let v = VertexId::new(self.slots.len() as u32);
        self.slots.push(Some(VertexData {
            value,
            succs: Vec::new(),
            preds: Vec::new(),
        }));
        self.live += 1;
        v
    }

    /// Removes `v` together with all its incident edges.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not in the graph.
    pub fn remove_vertex(&mut self, v: VertexId) {
        let data = match self.slots.get_mut(v.index()).and_then(Option::take) {
            Some(data) => data,
            None => panic!("Vertex {} is not in the graph", v),
        };
        for &succ in &data.succs {
            if succ != v {
                self.data_mut(succ).preds.retain(|&p| p != v);
            }
        }
        for &pred in &data.preds {
            if pred != v {
                self.data_mut(pred).succs.retain(|&s| s != v);
            }
        }
        // A self-loop appears in both lists but is a single edge.
        let self_loops = data.succs.iter().filter(|&&s| s == v).count();
        self.edges -= data.succs.len() + data.preds.len() - self_loops;
        self.live -= 1;
        trace!("removed vertex {}", v);
    }

    /// Adds the edge `src -> dst`. Adding an existing edge does nothing.
    pub fn add_edge(&mut self, src: VertexId, dst: VertexId) {
        assert!(self.contains(dst), "Vertex {} is not in the graph", dst);
        let succs = &mut self.data_mut(src).succs;
        if succs.contains(&dst) {
            return;
        }
        succs.push(dst);
        self.data_mut(dst).preds.push(src);
        self.edges += 1;
    }

    pub fn has_edge(&self, src: VertexId, dst: VertexId) -> bool {
        self.data(src).succs.contains(&dst)
    }

    pub fn contains(&self, v: VertexId) -> bool {
        matches!(self.slots.get(v.index()), Some(Some(_)))
    }

    pub fn value(&self, v: VertexId) -> V {
        self.data(v).value
    }

    /// Sources of the edges entering `v`.
    pub fn in_edges(&self, v: VertexId) -> &[VertexId] {
        &self.data(v).preds
    }

    /// Targets of the edges leaving `v`.
    pub fn out_edges(&self, v: VertexId) -> &[VertexId] {
        &self.data(v).succs
    }

    /// Live vertices in order of creation.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| VertexId::new(i as u32))
    }

    pub fn vertex_count(&self) -> usize {
        self.live
    }

    pub fn edge_count(&self) -> usize {
        self.edges
    }
}

impl<V> fmt::Debug for TransitionGraph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionGraph")
            .field("vertices", &self.live)
            .field("edges", &self.edges)
            .field("slots", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_add_edges() {
        let mut g = TransitionGraph::new();
        let a = g.add_vertex('a');
        let b = g.add_vertex('b');
        g.add_edge(a, b);
        g.add_edge(a, b);
        g.add_edge(b, b);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.out_edges(a), &[b]);
        assert_eq!(g.in_edges(b), &[a, b]);
        assert!(g.has_edge(b, b));
        assert!(!g.has_edge(b, a));
        assert_eq!(g.value(b), 'b');
    }

    #[test]
    fn test_remove_vertex() {
        let mut g = TransitionGraph::new();
        let a = g.add_vertex(1);
        let b = g.add_vertex(2);
        let c = g.add_vertex(3);
        g.add_edge(a, b);
        g.add_edge(b, c);
        g.add_edge(b, b);
        g.add_edge(c, a);
        assert_eq!(g.edge_count(), 4);

        g.remove_vertex(b);
        assert!(!g.contains(b));
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.out_edges(a).is_empty());
        assert!(g.in_edges(c).is_empty());
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn test_handles_not_reused() {
        let mut g = TransitionGraph::new();
        let a = g.add_vertex(());
        g.remove_vertex(a);
        let b = g.add_vertex(());
        assert_ne!(a, b);
        assert!(!g.contains(a));
    }

    #[test]
    #[should_panic(expected = "is not in the graph")]
    fn test_remove_twice_panics() {
        let mut g = TransitionGraph::new();
        let a = g.add_vertex(());
        g.remove_vertex(a);
        g.remove_vertex(a);
    }
}
