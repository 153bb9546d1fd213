//! Evolution functions over interval boxes.

use std::fmt;

use crate::boxes::{IntervalBox, Point};
use crate::enclosure::Dynamics;
use crate::interval::Interval;
use crate::types::Effort;

/// The map `x -> A x + b`.
#[derive(Debug, Clone)]
pub struct AffineMap {
    matrix: Vec<Vec<f64>>,
    offset: Vec<f64>,
}

impl AffineMap {
    pub fn new(matrix: Vec<Vec<f64>>, offset: Vec<f64>) -> Self {
        assert_eq!(matrix.len(), offset.len(), "Matrix rows and offset length differ");
        if let Some(first) = matrix.first() {
            assert!(
                matrix.iter().all(|row| row.len() == first.len()),
                "Matrix rows have different lengths"
            );
        }
        Self { matrix, offset }
    }

    /// The map `x -> k x + b` on the real line.
    pub fn scalar(k: f64, b: f64) -> Self {
        Self::new(vec![vec![k]], vec![b])
    }

    fn apply(&self, x: &[Interval]) -> Vec<Interval> {
        self.matrix
            .iter()
            .zip(&self.offset)
            .map(|(row, &b)| {
                assert_eq!(row.len(), x.len(), "Dimension mismatch in affine map");
                row.iter()
                    .zip(x)
                    .fold(Interval::point(b), |acc, (&a, xi)| acc + xi.scale(a))
            })
            .collect()
    }
}

impl Dynamics<IntervalBox> for AffineMap {
    // Interval evaluation of an affine map has no dependency problem, so effort is not needed.
    fn image(&self, region: &IntervalBox, _effort: Effort) -> IntervalBox {
        IntervalBox::new(self.apply(region.intervals()))
    }

    fn evaluate(&self, point: &Point) -> Point {
        Point::new(self.apply(point.coords()))
    }
}

/// Dynamics given by an interval extension of the evolution function.
///
/// The closure receives interval coordinates and must return an enclosure of the
/// image of every point they bound. Images of regions are computed on
/// `2^effort` sub-boxes and joined, which counters the dependency problem of
/// naive interval evaluation.
pub struct FnDynamics<F> {
    f: F,
}

impl<F> FnDynamics<F>
where
    F: Fn(&[Interval]) -> Vec<Interval>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for FnDynamics<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDynamics").finish_non_exhaustive()
    }
}

impl<F> Dynamics<IntervalBox> for FnDynamics<F>
where
    F: Fn(&[Interval]) -> Vec<Interval>,
{
    fn image(&self, region: &IntervalBox, effort: Effort) -> IntervalBox {
        region
            .subdivide(effort.level())
            .iter()
            .map(|piece| IntervalBox::new((self.f)(piece.intervals())))
            .reduce(|acc, image| acc.hull(&image))
            .unwrap_or_else(|| region.clone())
    }

    fn evaluate(&self, point: &Point) -> Point {
        Point::new((self.f)(point.coords()))
    }
}
