//! # cegar-rs: abstraction refinement for dynamical systems
//!
//! **`cegar-rs`** checks safety of a discrete-time dynamical system `x' = f(x)`
//! by Counterexample-Guided Abstraction Refinement (CEGAR).
//!
//! ## How it works
//!
//! The state space is covered by a hierarchy of regions. The current leaves of
//! that hierarchy form a finite abstraction: a graph with an edge `u -> v`
//! whenever `f(u)` may overlap `v`. A path in that graph from the initial region
//! to a region not proven safe is a candidate counterexample. If it ends in a
//! region proven unsafe and a concrete point follows it, the system is unsafe.
//! Otherwise the regions along the path are split and the search starts over,
//! until every reachable region is proven safe or the budget runs out.
//!
//! All numeric questions are answered in three-valued logic: with rounding, "I
//! cannot tell" is always a possible answer, and the engine only ever acts on
//! what is proven.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: all mutation goes through the [`RefinementTree`][crate::refinement::RefinementTree], which keeps the tree and the graph in step.
//! - **Lightweight handles**: tree nodes and graph vertices are small `Copy` indices ([`NodeId`][crate::types::NodeId], [`VertexId`][crate::types::VertexId]) into arena storage.
//! - **Generic numerics**: the engine only needs the [`Enclosure`][crate::enclosure::Enclosure], [`Dynamics`][crate::enclosure::Dynamics] and [`ConstraintSet`][crate::enclosure::ConstraintSet] traits. Outward-rounded interval boxes are provided.
//! - **Pluggable policies**: how regions are split and which regions get split are traits, implemented for closures.
//!
//! ## Basic Usage
//!
//! ```rust
//! use cegar_rs::boxes::IntervalBox;
//! use cegar_rs::cegar::{cegar, CegarConfig};
//! use cegar_rs::constraint::BoxConstraint;
//! use cegar_rs::dynamics::AffineMap;
//! use cegar_rs::refinement::RefinementTree;
//! use cegar_rs::strategy::{AllButLast, Bisection};
//! use cegar_rs::types::Effort;
//!
//! // 1. The tracked domain, the safe set and the evolution x -> x / 2 + 1
//! let domain = IntervalBox::from_bounds(&[(0.0, 8.0)]);
//! let safe = BoxConstraint::new(IntervalBox::from_bounds(&[(0.0, 6.0)]));
//! let f = AffineMap::scalar(0.5, 1.0);
//!
//! // 2. Build the coarsest abstraction
//! let mut rtree = RefinementTree::<_, _, _, 2>::new(domain, safe, f, Effort::default());
//!
//! // 3. Run the loop from the initial region
//! let initial = IntervalBox::from_bounds(&[(0.0, 1.0)]);
//! let result = cegar(&mut rtree, &initial, &Bisection, &AllButLast, &CegarConfig::default());
//! assert!(result.verdict.is_safe());
//! ```
//!
//! ## Core Components
//!
//! - **[`refinement`]**: the partition tree and transition graph kept together.
//! - **[`search`]** and **[`spurious`]**: finding and validating counterexamples.
//! - **[`cegar`]**: the refinement loop.
//! - **[`boxes`]**, **[`dynamics`]**, **[`constraint`]**: a ready-made interval numeric layer.
//! - **[`dot`]**: utilities for visualizing the abstraction using Graphviz.

pub mod boxes;
pub mod cegar;
pub mod constraint;
pub mod dot;
pub mod dynamics;
pub mod enclosure;
pub mod graph;
pub mod interval;
pub mod logic;
pub mod refinement;
pub mod search;
pub mod spurious;
pub mod strategy;
pub mod tree;
pub mod types;
