//! Capabilities the refinement engine needs from the numeric layer.
//!
//! The engine never looks inside a region. It only asks the questions below,
//! and every answer may come back indeterminate. The [`boxes`][crate::boxes]
//! module provides an interval-box implementation of all three traits.
use std::fmt::Debug;

use crate::logic::Kleenean;
use crate::types::Effort;

/// An immutable bounded set in state space.
pub trait Enclosure: Clone + Debug {
    /// A point known up to rounding.
    type Point: Clone + Debug;

    /// A representative point lying in the enclosure.
    fn centre(&self) -> Self::Point;

    /// Intersection of two enclosures, possibly empty.
    fn intersection(&self, other: &Self) -> Self;

    /// Whether `self` and `other` share no point.
    fn disjoint(&self, other: &Self) -> Kleenean;

    /// Whether `other` is a subset of `self`.
    fn includes(&self, other: &Self) -> Kleenean;

    /// Whether the (exact, unknown) point bounded by `point` lies in `self`.
    fn contains(&self, point: &Self::Point) -> Kleenean;
}

/// The evolution function of the system.
pub trait Dynamics<E: Enclosure> {
    /// An over-approximation of the image of `region`.
    fn image(&self, region: &E, effort: Effort) -> E;

    /// Bounds on the image of a single point.
    fn evaluate(&self, point: &E::Point) -> E::Point;
}

/// The safe set of the system.
pub trait ConstraintSet<E: Enclosure> {
    /// Whether `region` contains at least one safe point.
    ///
    /// A proven `False` means the whole region is unsafe.
    fn overlaps(&self, region: &E, effort: Effort) -> Kleenean;

    /// Whether every point of `region` is safe.
    ///
    /// A proven `True` means the whole region is safe.
    fn covers(&self, region: &E, effort: Effort) -> Kleenean;
}

impl<E: Enclosure, D: Dynamics<E> + ?Sized> Dynamics<E> for &D {
    fn image(&self, region: &E, effort: Effort) -> E {
        (**self).image(region, effort)
    }

    fn evaluate(&self, point: &E::Point) -> E::Point {
        (**self).evaluate(point)
    }
}

impl<E: Enclosure, C: ConstraintSet<E> + ?Sized> ConstraintSet<E> for &C {
    fn overlaps(&self, region: &E, effort: Effort) -> Kleenean {
        (**self).overlaps(region, effort)
    }

    fn covers(&self, region: &E, effort: Effort) -> Kleenean {
        (**self).covers(region, effort)
    }
}
