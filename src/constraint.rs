//! Safe sets over interval boxes.

use std::fmt;

use crate::boxes::IntervalBox;
use crate::enclosure::{ConstraintSet, Enclosure};
use crate::interval::Interval;
use crate::logic::Kleenean;
use crate::types::Effort;

/// Safe set given as a box.
#[derive(Debug, Clone)]
pub struct BoxConstraint {
    safe: IntervalBox,
}

impl BoxConstraint {
    pub fn new(safe: IntervalBox) -> Self {
        Self { safe }
    }

    pub fn safe_set(&self) -> &IntervalBox {
        &self.safe
    }
}

impl ConstraintSet<IntervalBox> for BoxConstraint {
    fn overlaps(&self, region: &IntervalBox, _effort: Effort) -> Kleenean {
        !self.safe.disjoint(region)
    }

    fn covers(&self, region: &IntervalBox, _effort: Effort) -> Kleenean {
        self.safe.includes(region)
    }
}

/// The half-space `a . x <= b`.
#[derive(Debug, Clone)]
pub struct HalfSpace {
    pub normal: Vec<f64>,
    pub bound: f64,
}

impl HalfSpace {
    pub fn new(normal: Vec<f64>, bound: f64) -> Self {
        Self { normal, bound }
    }

    fn range(&self, region: &IntervalBox) -> Interval {
        assert_eq!(self.normal.len(), region.dimension(), "Dimension mismatch in half-space");
        self.normal
            .iter()
            .zip(region.intervals())
            .fold(Interval::point(0.0), |acc, (&a, x)| acc + x.scale(a))
    }

    fn test(&self, region: &IntervalBox) -> Kleenean {
        let range = self.range(region);
        if range.hi <= self.bound {
            Kleenean::True
        } else if range.lo > self.bound {
            Kleenean::False
        } else {
            Kleenean::Indeterminate
        }
    }
}

/// Safe set given as an intersection of half-spaces.
#[derive(Debug, Clone, Default)]
pub struct Polytope {
    halfspaces: Vec<HalfSpace>,
}

impl Polytope {
    pub fn new(halfspaces: Vec<HalfSpace>) -> Self {
        Self { halfspaces }
    }

    pub fn with(mut self, normal: Vec<f64>, bound: f64) -> Self {
        self.halfspaces.push(HalfSpace::new(normal, bound));
        self
    }
}

impl Polytope {
    fn test(&self, piece: &IntervalBox) -> Kleenean {
        self.halfspaces
            .iter()
            .fold(Kleenean::True, |acc, h| acc.and(h.test(piece)))
    }
}

impl ConstraintSet<IntervalBox> for Polytope {
    fn overlaps(&self, region: &IntervalBox, effort: Effort) -> Kleenean {
        overlaps_piecewise(region, effort, |piece| self.test(piece))
    }

    fn covers(&self, region: &IntervalBox, effort: Effort) -> Kleenean {
        covers_piecewise(region, effort, |piece| self.test(piece))
    }
}

/// Safe set `{ x : g(x) in bounds }` for an interval extension `g`.
pub struct FunctionConstraint<G> {
    g: G,
    bounds: Interval,
}

impl<G> FunctionConstraint<G>
where
    G: Fn(&[Interval]) -> Interval,
{
    pub fn new(g: G, bounds: Interval) -> Self {
        Self { g, bounds }
    }
}

impl<G> fmt::Debug for FunctionConstraint<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionConstraint")
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl<G> ConstraintSet<IntervalBox> for FunctionConstraint<G>
where
    G: Fn(&[Interval]) -> Interval,
{
    fn overlaps(&self, region: &IntervalBox, effort: Effort) -> Kleenean {
        overlaps_piecewise(region, effort, |piece| self.test(piece))
    }

    fn covers(&self, region: &IntervalBox, effort: Effort) -> Kleenean {
        covers_piecewise(region, effort, |piece| self.test(piece))
    }
}

impl<G> FunctionConstraint<G>
where
    G: Fn(&[Interval]) -> Interval,
{
    fn test(&self, piece: &IntervalBox) -> Kleenean {
        self.bounds.contains(&(self.g)(piece.intervals()))
    }
}

/// Evaluates `test` ("is this piece entirely safe?") on `2^effort` pieces of `region`.
///
/// Some piece proven entirely safe proves an overlap; every piece proven entirely
/// unsafe disproves it.
fn overlaps_piecewise(region: &IntervalBox, effort: Effort, test: impl Fn(&IntervalBox) -> Kleenean) -> Kleenean {
    if region.is_empty() {
        return Kleenean::False;
    }
    let mut all_unsafe = true;
    for piece in region.subdivide(effort.level()) {
        match test(&piece) {
            Kleenean::True => return Kleenean::True,
            Kleenean::Indeterminate => all_unsafe = false,
            Kleenean::False => {}
        }
    }
    if all_unsafe {
        Kleenean::False
    } else {
        Kleenean::Indeterminate
    }
}

/// Evaluates `test` on `2^effort` pieces of `region`, like [`overlaps_piecewise`].
///
/// Every piece proven entirely safe proves the cover; some piece proven entirely
/// unsafe disproves it.
fn covers_piecewise(region: &IntervalBox, effort: Effort, test: impl Fn(&IntervalBox) -> Kleenean) -> Kleenean {
    if region.is_empty() {
        return Kleenean::True;
    }
    let mut all_safe = true;
    for piece in region.subdivide(effort.level()) {
        match test(&piece) {
            Kleenean::False => return Kleenean::False,
            Kleenean::Indeterminate => all_safe = false,
            Kleenean::True => {}
        }
    }
    if all_safe {
        Kleenean::True
    } else {
        Kleenean::Indeterminate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_box_constraint() {
        let c = BoxConstraint::new(IntervalBox::from_bounds(&[(0.0, 3.0)]));
        let e = Effort::default();
        assert_eq!(c.overlaps(&IntervalBox::from_bounds(&[(2.0, 4.0)]), e), Kleenean::True);
        assert_eq!(c.overlaps(&IntervalBox::from_bounds(&[(3.5, 4.0)]), e), Kleenean::False);
        assert_eq!(c.covers(&IntervalBox::from_bounds(&[(1.0, 3.0)]), e), Kleenean::True);
        assert_eq!(c.covers(&IntervalBox::from_bounds(&[(2.0, 4.0)]), e), Kleenean::False);
    }

    #[test]
    fn test_polytope() {
        // x + y <= 1.2
        let c = Polytope::default().with(vec![1.0, 1.0], 1.2);
        let e = Effort::default();
        let inside = IntervalBox::from_bounds(&[(0.0, 0.25), (0.0, 0.25)]);
        let outside = IntervalBox::from_bounds(&[(1.0, 2.0), (1.0, 2.0)]);
        let straddling = IntervalBox::from_bounds(&[(0.0, 1.0), (0.0, 1.0)]);
        assert_eq!(c.overlaps(&inside, e), Kleenean::True);
        assert_eq!(c.overlaps(&outside, e), Kleenean::False);
        assert_eq!(c.overlaps(&straddling, e), Kleenean::Indeterminate);
        // A piece near the origin is entirely safe.
        assert_eq!(c.overlaps(&straddling, Effort::new(2)), Kleenean::True);

        assert_eq!(c.covers(&inside, e), Kleenean::True);
        assert_eq!(c.covers(&outside, e), Kleenean::False);
        assert_eq!(c.covers(&straddling, e), Kleenean::Indeterminate);
        // The corner piece [0.75, 1]^2 is entirely unsafe.
        assert_eq!(c.covers(&straddling, Effort::new(4)), Kleenean::False);
    }

    #[test]
    fn test_function_constraint_effort() {
        // safe iff x^2 <= 1
        let c = FunctionConstraint::new(|x: &[Interval]| x[0].sqr(), Interval::new(0.0, 1.0));
        let region = IntervalBox::from_bounds(&[(0.5, 1.5)]);
        assert_eq!(c.overlaps(&region, Effort::new(0)), Kleenean::Indeterminate);
        assert_eq!(c.overlaps(&region, Effort::new(2)), Kleenean::True);
        let far = IntervalBox::from_bounds(&[(2.0, 3.0)]);
        assert_eq!(c.overlaps(&far, Effort::new(1)), Kleenean::False);
        assert_eq!(c.covers(&far, Effort::new(0)), Kleenean::False);
    }

    #[test]
    fn test_function_constraint_cover_needs_effort() {
        // x - x is 0 everywhere, but its interval extension grows with the width of the box.
        let c = FunctionConstraint::new(|x: &[Interval]| x[0] - x[0], Interval::new(-1.0, 1.0));
        let region = IntervalBox::from_bounds(&[(0.0, 2.0)]);
        assert_eq!(c.overlaps(&region, Effort::new(0)), Kleenean::Indeterminate);
        assert_eq!(c.covers(&region, Effort::new(0)), Kleenean::Indeterminate);
        assert_eq!(c.covers(&region, Effort::new(2)), Kleenean::True);
    }
}
