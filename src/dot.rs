//! Abstraction to DOT (Graphviz) conversion.
//!
//! The transition graph is rendered as a directed graph with one node per
//! current leaf and one for the outside of the domain:
//! - **Leaves** are labelled with their region and filled by safety verdict
//! - **Outside** is a separate shape on the sink rank
//! - **Initial image** leaves (if given) get a thicker border and sit on the source rank
//!
//! # Examples
//!
//! ```
//! use cegar_rs::boxes::IntervalBox;
//! use cegar_rs::constraint::BoxConstraint;
//! use cegar_rs::dynamics::AffineMap;
//! use cegar_rs::refinement::RefinementTree;
//! use cegar_rs::types::Effort;
//!
//! let domain = IntervalBox::from_bounds(&[(0.0, 4.0)]);
//! let safe = BoxConstraint::new(IntervalBox::from_bounds(&[(0.0, 3.0)]));
//! let rtree = RefinementTree::<_, _, _, 2>::new(domain, safe, AffineMap::scalar(0.5, 0.0), Effort::default());
//!
//! let dot = rtree.to_dot(&[]).unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! assert!(dot.starts_with("digraph {"));
//! ```

use std::fmt::{Display, Write as _};

use crate::enclosure::{ConstraintSet, Dynamics, Enclosure};
use crate::logic::Kleenean;
use crate::refinement::{Location, RefinementTree};
use crate::types::VertexId;

/// Configuration options for DOT output generation.
///
/// ```
/// use cegar_rs::dot::DotConfig;
///
/// let config = DotConfig {
///     show_regions: false,
///     ..DotConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for leaf vertices (default: "box")
    pub leaf_shape: &'static str,
    /// Shape for the outside vertex (default: "doubleoctagon")
    pub outside_shape: &'static str,
    /// Fill colour of leaves proven safe (default: "palegreen")
    pub safe_color: &'static str,
    /// Fill colour of leaves neither proven safe nor proven unsafe (default: "khaki")
    pub undecided_color: &'static str,
    /// Fill colour of leaves proven unsafe and of the outside vertex (default: "salmon")
    pub unsafe_color: &'static str,
    /// Pen width of initial image leaves (default: 3)
    pub initial_penwidth: u32,
    /// Whether leaves are labelled with their region rather than the tree node (default: true)
    pub show_regions: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            leaf_shape: "box",
            outside_shape: "doubleoctagon",
            safe_color: "palegreen",
            undecided_color: "khaki",
            unsafe_color: "salmon",
            initial_penwidth: 3,
            show_regions: true,
        }
    }
}

impl<E, D, C, const N: usize> RefinementTree<E, D, C, N>
where
    E: Enclosure + Display,
    D: Dynamics<E>,
    C: ConstraintSet<E>,
{
    /// Converts the current abstraction to DOT format.
    ///
    /// `initial` are the vertices to highlight as the initial image, usually
    /// the result of [`image`][Self::image].
    pub fn to_dot(&self, initial: &[VertexId]) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(initial, &DotConfig::default())
    }

    /// Converts the current abstraction to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, initial: &[VertexId], config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "node [shape={}, style=filled];", config.leaf_shape)?;

        let outside = self.outside();
        writeln!(dot, "{{ rank=sink")?;
        writeln!(
            dot,
            "{} [shape={}, fillcolor={}, label=\"outside\"];",
            outside, config.outside_shape, config.unsafe_color
        )?;
        writeln!(dot, "}}")?;

        let leaves = self.leaf_vertices();
        let (seeds, others): (Vec<VertexId>, Vec<VertexId>) = leaves.iter().partition(|v| initial.contains(v));

        let write_leaf = |dot: &mut String, v: VertexId| -> std::fmt::Result {
            let Location::Inside(node) = self.location(v) else {
                return Ok(());
            };
            let value = self.tree().value(node);
            let color = match value.safety() {
                Kleenean::True => config.safe_color,
                Kleenean::False => config.unsafe_color,
                Kleenean::Indeterminate => config.undecided_color,
            };
            let label = if config.show_regions {
                format!("{}\\n{}", node, value.enclosure())
            } else {
                node.to_string()
            };
            write!(dot, "{} [label=\"{}\", fillcolor={}", v, label, color)?;
            if initial.contains(&v) {
                write!(dot, ", penwidth={}", config.initial_penwidth)?;
            }
            writeln!(dot, "];")
        };

        if !seeds.is_empty() {
            writeln!(dot, "{{ rank=source")?;
            for &v in &seeds {
                write_leaf(&mut dot, v)?;
            }
            writeln!(dot, "}}")?;
        }
        for &v in &others {
            write_leaf(&mut dot, v)?;
        }

        for &v in &leaves {
            for &succ in self.postimage(v) {
                if succ == v {
                    writeln!(dot, "{} -> {} [style=dashed];", v, succ)?;
                } else {
                    writeln!(dot, "{} -> {};", v, succ)?;
                }
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::boxes::IntervalBox;
    use crate::constraint::BoxConstraint;
    use crate::dynamics::AffineMap;
    use crate::strategy::Bisection;
    use crate::types::Effort;

    fn rtree() -> RefinementTree<IntervalBox, AffineMap, BoxConstraint, 2> {
        // x -> x + 3 on [0, 8] with safe set [0, 4].
        let domain = IntervalBox::from_bounds(&[(0.0, 8.0)]);
        let safe = BoxConstraint::new(IntervalBox::from_bounds(&[(0.0, 4.0)]));
        let mut rtree = RefinementTree::new(domain, safe, AffineMap::scalar(1.0, 3.0), Effort::default());
        let root = rtree.vertex(rtree.tree().root());
        rtree.refine(root, &Bisection);
        rtree
    }

    #[test]
    fn test_to_dot_basic() {
        let rtree = rtree();
        let dot = rtree.to_dot(&[]).unwrap();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("label=\"outside\""));
        assert!(!dot.contains("rank=source"));
    }

    #[test]
    fn test_to_dot_colours_and_edges() {
        let rtree = rtree();
        let [left, right] = [rtree.leaf_vertices()[0], rtree.leaf_vertices()[1]];
        let dot = rtree.to_dot(&[]).unwrap();

        // [0, 4] is the safe set itself, [4, 8] touches it at 4.
        assert!(dot.contains(&format!("{} [label=\"n2\\n[4, 8]\", fillcolor=khaki];", right)));
        assert!(dot.contains(&format!("{} [label=\"n1\\n[0, 4]\", fillcolor=palegreen];", left)));
        // [0, 4] maps to [3, 7].
        assert!(dot.contains(&format!("{} -> {};", left, right)));
        assert!(dot.contains(&format!("{} -> {} [style=dashed];", left, left)));
        assert!(dot.contains(&format!("{} -> {};", right, rtree.outside())));
        assert!(dot.contains("fillcolor=salmon, label=\"outside\""));
    }

    #[test]
    fn test_to_dot_with_config() {
        let rtree = rtree();
        let initial = rtree.image(&IntervalBox::from_bounds(&[(0.0, 1.0)]));
        let config = DotConfig {
            show_regions: false,
            initial_penwidth: 5,
            ..DotConfig::default()
        };
        let dot = rtree.to_dot_with_config(&initial, &config).unwrap();
        assert!(dot.contains("rank=source"));
        assert!(dot.contains(&format!("{} [label=\"n1\", fillcolor=palegreen, penwidth=5];", initial[0])));
        assert!(!dot.contains("[0, 4]"));
    }

    /// Helper test to write a DOT file for manual inspection (disabled by default)
    #[test]
    #[ignore]
    fn test_write_dot_file() {
        let rtree = rtree();
        let dot = rtree.to_dot(&rtree.leaf_vertices()).unwrap();
        std::fs::write("test_output.dot", &dot).unwrap();
        println!("DOT output:\n{}", dot);
    }
}
