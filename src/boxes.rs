//! Axis-aligned interval boxes, the default [`Enclosure`].

use std::fmt;

use crate::enclosure::Enclosure;
use crate::interval::Interval;
use crate::logic::Kleenean;

/// A point whose coordinates are known up to rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    coords: Vec<Interval>,
}

impl Point {
    pub fn new(coords: Vec<Interval>) -> Self {
        Self { coords }
    }

    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    pub fn coords(&self) -> &[Interval] {
        &self.coords
    }
}

impl From<&[f64]> for Point {
    fn from(values: &[f64]) -> Self {
        Point::new(values.iter().map(|&x| Interval::point(x)).collect())
    }
}

impl<const D: usize> From<[f64; D]> for Point {
    fn from(values: [f64; D]) -> Self {
        Point::from(&values[..])
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

/// Cartesian product of closed intervals.
///
/// Image boxes may have unbounded components, but a box that is split or traced
/// through [`Enclosure::centre`] must be bounded.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalBox {
    intervals: Vec<Interval>,
}

impl IntervalBox {
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    /// Builds a box from finite `(lo, hi)` pairs.
    pub fn from_bounds(bounds: &[(f64, f64)]) -> Self {
        for &(lo, hi) in bounds {
            assert!(lo.is_finite() && hi.is_finite(), "Box bounds must be finite, got [{}, {}]", lo, hi);
        }
        Self::new(bounds.iter().map(|&(lo, hi)| Interval::new(lo, hi)).collect())
    }

    pub fn dimension(&self) -> usize {
        self.intervals.len()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.iter().any(|i| i.is_empty())
    }

    /// Whether every component is non-empty with finite bounds.
    pub fn is_bounded(&self) -> bool {
        self.intervals.iter().all(|i| !i.is_empty() && i.lo.is_finite() && i.hi.is_finite())
    }

    /// Index of the widest component (the first one on ties).
    pub fn widest_dimension(&self) -> usize {
        assert!(self.dimension() > 0, "Zero-dimensional box has no widest dimension");
        let mut best = 0;
        for (i, interval) in self.intervals.iter().enumerate() {
            if interval.width() > self.intervals[best].width() {
                best = i;
            }
        }
        best
    }

    /// Splits the box in half along dimension `dim`.
    pub fn bisect(&self, dim: usize) -> (IntervalBox, IntervalBox) {
        assert!(dim < self.dimension(), "Dimension {} out of range", dim);
        let (lo, hi) = self.intervals[dim].bisect();
        let mut left = self.intervals.clone();
        let mut right = self.intervals.clone();
        left[dim] = lo;
        right[dim] = hi;
        (IntervalBox::new(left), IntervalBox::new(right))
    }

    /// Bisects the box `depth` times along its widest dimension, yielding `2^depth` pieces
    /// that cover it.
    pub fn subdivide(&self, depth: u32) -> Vec<IntervalBox> {
        let mut pieces = vec![self.clone()];
        for _ in 0..depth {
            pieces = pieces
                .iter()
                .flat_map(|piece| {
                    let (l, r) = piece.bisect(piece.widest_dimension());
                    [l, r]
                })
                .collect();
        }
        pieces
    }

    /// Smallest box containing both.
    pub fn hull(&self, other: &IntervalBox) -> IntervalBox {
        self.check_dimension(other.dimension());
        IntervalBox::new(self.intervals.iter().zip(&other.intervals).map(|(a, b)| a.hull(b)).collect())
    }

    fn check_dimension(&self, dimension: usize) {
        assert_eq!(
            self.dimension(),
            dimension,
            "Dimension mismatch: box has {} components, operand has {}",
            self.dimension(),
            dimension
        );
    }
}

impl From<Point> for IntervalBox {
    fn from(point: Point) -> Self {
        IntervalBox::new(point.coords)
    }
}

impl Enclosure for IntervalBox {
    type Point = Point;

    fn centre(&self) -> Point {
        assert!(self.is_bounded(), "Centre of an unbounded or empty box {}", self);
        Point::new(self.intervals.iter().map(|i| Interval::point(i.midpoint())).collect())
    }

    fn intersection(&self, other: &IntervalBox) -> IntervalBox {
        self.check_dimension(other.dimension());
        IntervalBox::new(
            self.intervals
                .iter()
                .zip(&other.intervals)
                .map(|(a, b)| a.intersection(b))
                .collect(),
        )
    }

    fn disjoint(&self, other: &IntervalBox) -> Kleenean {
        self.check_dimension(other.dimension());
        let separated = self.intervals.iter().zip(&other.intervals).any(|(a, b)| a.disjoint(b));
        Kleenean::from(separated)
    }

    fn includes(&self, other: &IntervalBox) -> Kleenean {
        self.check_dimension(other.dimension());
        if other.is_empty() {
            return Kleenean::True;
        }
        let included = self.intervals.iter().zip(&other.intervals).all(|(a, b)| a.includes(b));
        Kleenean::from(included)
    }

    fn contains(&self, point: &Point) -> Kleenean {
        self.check_dimension(point.dimension());
        self.intervals
            .iter()
            .zip(point.coords())
            .fold(Kleenean::True, |acc, (i, c)| acc.and(i.contains(c)))
    }
}

impl fmt::Display for IntervalBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, interval) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            if interval.is_empty() {
                write!(f, "[]")?;
            } else {
                write!(f, "[{}, {}]", interval.lo, interval.hi)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn unit_square() -> IntervalBox {
        IntervalBox::from_bounds(&[(0.0, 1.0), (0.0, 1.0)])
    }

    #[test]
    fn test_centre_is_contained() {
        let b = IntervalBox::from_bounds(&[(0.0, 1.0), (-3.0, 5.0)]);
        let c = b.centre();
        assert_eq!(c, Point::from([0.5, 1.0]));
        assert_eq!(b.contains(&c), Kleenean::True);
    }

    #[test]
    fn test_disjoint_and_intersection() {
        let a = unit_square();
        let b = IntervalBox::from_bounds(&[(0.5, 2.0), (0.5, 2.0)]);
        let c = IntervalBox::from_bounds(&[(2.0, 3.0), (0.0, 1.0)]);
        assert_eq!(a.disjoint(&b), Kleenean::False);
        assert_eq!(a.disjoint(&c), Kleenean::True);
        assert_eq!(a.intersection(&b), IntervalBox::from_bounds(&[(0.5, 1.0), (0.5, 1.0)]));
        assert!(a.intersection(&c).is_empty());
    }

    #[test]
    fn test_includes() {
        let a = unit_square();
        let inner = IntervalBox::from_bounds(&[(0.25, 0.75), (0.0, 1.0)]);
        assert_eq!(a.includes(&inner), Kleenean::True);
        assert_eq!(inner.includes(&a), Kleenean::False);
    }

    #[test]
    fn test_contains_point_on_boundary_of_rounding() {
        let a = unit_square();
        let fuzzy = Point::new(vec![Interval::new(0.9, 1.1), Interval::point(0.5)]);
        assert_eq!(a.contains(&fuzzy), Kleenean::Indeterminate);
        assert_eq!(a.contains(&Point::from([2.0, 0.5])), Kleenean::False);
    }

    #[test]
    fn test_bisect_widest() {
        let b = IntervalBox::from_bounds(&[(0.0, 1.0), (0.0, 4.0)]);
        assert_eq!(b.widest_dimension(), 1);
        let (l, r) = b.bisect(1);
        assert_eq!(l, IntervalBox::from_bounds(&[(0.0, 1.0), (0.0, 2.0)]));
        assert_eq!(r, IntervalBox::from_bounds(&[(0.0, 1.0), (2.0, 4.0)]));
        assert_eq!(l.hull(&r), b);
    }

    #[test]
    fn test_subdivide_covers() {
        let b = unit_square();
        let pieces = b.subdivide(3);
        assert_eq!(pieces.len(), 8);
        let hull = pieces.iter().skip(1).fold(pieces[0].clone(), |acc, p| acc.hull(p));
        assert_eq!(hull, b);
        assert!(pieces.iter().all(|p| b.includes(p) == Kleenean::True));
    }

    #[test]
    fn test_bounded() {
        assert!(unit_square().is_bounded());
        let half_line = IntervalBox::new(vec![Interval::new(0.0, f64::INFINITY)]);
        assert!(!half_line.is_bounded());
        let empty = unit_square().intersection(&IntervalBox::from_bounds(&[(2.0, 3.0), (0.0, 1.0)]));
        assert!(!empty.is_bounded());
    }

    #[test]
    #[should_panic(expected = "Box bounds must be finite")]
    fn test_infinite_bounds_panic() {
        IntervalBox::from_bounds(&[(0.0, 1.0), (f64::NEG_INFINITY, 0.0)]);
    }

    #[test]
    #[should_panic(expected = "Centre of an unbounded or empty box")]
    fn test_centre_of_unbounded_box_panics() {
        let half_line = IntervalBox::new(vec![Interval::new(0.0, f64::INFINITY)]);
        half_line.centre();
    }

    #[test]
    #[should_panic(expected = "Dimension mismatch")]
    fn test_dimension_mismatch_panics() {
        let a = unit_square();
        let b = IntervalBox::from_bounds(&[(0.0, 1.0)]);
        a.disjoint(&b);
    }
}
