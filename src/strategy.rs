//! Pluggable refinement policies.
//!
//! - A [`RegionSplitter`] decides how one region is cut into `N` pieces.
//! - A [`Locator`] decides which vertices of a spurious counterexample get split.
//!
//! Both are implemented for plain closures, so ad-hoc policies need no new type.

use crate::boxes::IntervalBox;
use crate::types::VertexId;

/// Splits a region into exactly `N` sub-regions covering it.
pub trait RegionSplitter<E, const N: usize> {
    fn split(&self, region: &E) -> [E; N];
}

impl<E, F, const N: usize> RegionSplitter<E, N> for F
where
    F: Fn(&E) -> [E; N],
{
    fn split(&self, region: &E) -> [E; N] {
        self(region)
    }
}

/// Halves a box along its widest dimension.
#[derive(Debug, Copy, Clone, Default)]
pub struct Bisection;

impl RegionSplitter<IntervalBox, 2> for Bisection {
    fn split(&self, region: &IntervalBox) -> [IntervalBox; 2] {
        let (l, r) = region.bisect(region.widest_dimension());
        [l, r]
    }
}

/// Halves a box along every dimension at once, `N = 2^D` pieces for a `D`-dimensional box.
#[derive(Debug, Copy, Clone, Default)]
pub struct GridSplit<const D: usize>;

impl RegionSplitter<IntervalBox, 4> for GridSplit<2> {
    fn split(&self, region: &IntervalBox) -> [IntervalBox; 4] {
        assert_eq!(region.dimension(), 2, "GridSplit<2> needs a two-dimensional box");
        let (l, r) = region.bisect(0);
        let (ll, lr) = l.bisect(1);
        let (rl, rr) = r.bisect(1);
        [ll, lr, rl, rr]
    }
}

/// Selects the vertices of a counterexample to refine.
///
/// `unsafe_end` tells whether the last vertex of `path` is proven unsafe.
/// Otherwise it is undecided, and splitting it may decide its parts.
pub trait Locator {
    fn locate(&self, path: &[VertexId], unsafe_end: bool) -> Vec<VertexId>;
}

impl<F> Locator for F
where
    F: Fn(&[VertexId], bool) -> Vec<VertexId>,
{
    fn locate(&self, path: &[VertexId], unsafe_end: bool) -> Vec<VertexId> {
        self(path, unsafe_end)
    }
}

/// Every vertex except a last one proven unsafe.
#[derive(Debug, Copy, Clone, Default)]
pub struct AllButLast;

impl Locator for AllButLast {
    fn locate(&self, path: &[VertexId], unsafe_end: bool) -> Vec<VertexId> {
        match path.split_last() {
            Some((_, init)) if unsafe_end => init.to_vec(),
            _ => path.to_vec(),
        }
    }
}

/// Every vertex of the path.
#[derive(Debug, Copy, Clone, Default)]
pub struct Everything;

impl Locator for Everything {
    fn locate(&self, path: &[VertexId], _unsafe_end: bool) -> Vec<VertexId> {
        path.to_vec()
    }
}

/// The first vertex of the path, which is the one in the initial image.
#[derive(Debug, Copy, Clone, Default)]
pub struct First;

impl Locator for First {
    fn locate(&self, path: &[VertexId], _unsafe_end: bool) -> Vec<VertexId> {
        path.first().copied().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn path() -> Vec<VertexId> {
        vec![VertexId::new(1), VertexId::new(4), VertexId::new(2)]
    }

    #[test]
    fn test_bisection() {
        let b = IntervalBox::from_bounds(&[(0.0, 1.0), (0.0, 2.0)]);
        let [l, r] = Bisection.split(&b);
        assert_eq!(l, IntervalBox::from_bounds(&[(0.0, 1.0), (0.0, 1.0)]));
        assert_eq!(r, IntervalBox::from_bounds(&[(0.0, 1.0), (1.0, 2.0)]));
    }

    #[test]
    fn test_grid_split() {
        let b = IntervalBox::from_bounds(&[(0.0, 2.0), (0.0, 2.0)]);
        let pieces = GridSplit::<2>.split(&b);
        assert_eq!(pieces[0], IntervalBox::from_bounds(&[(0.0, 1.0), (0.0, 1.0)]));
        assert_eq!(pieces[3], IntervalBox::from_bounds(&[(1.0, 2.0), (1.0, 2.0)]));
    }

    #[test]
    fn test_closure_splitter() {
        let thirds = |b: &IntervalBox| {
            let i = b.intervals()[0];
            let w = i.width() / 3.0;
            [
                IntervalBox::from_bounds(&[(i.lo, i.lo + w)]),
                IntervalBox::from_bounds(&[(i.lo + w, i.lo + 2.0 * w)]),
                IntervalBox::from_bounds(&[(i.lo + 2.0 * w, i.hi)]),
            ]
        };
        let pieces = RegionSplitter::<IntervalBox, 3>::split(&thirds, &IntervalBox::from_bounds(&[(0.0, 3.0)]));
        assert_eq!(pieces[1], IntervalBox::from_bounds(&[(1.0, 2.0)]));
    }

    #[test]
    fn test_locators() {
        let p = path();
        assert_eq!(AllButLast.locate(&p, true), vec![VertexId::new(1), VertexId::new(4)]);
        assert_eq!(Everything.locate(&p, true), p);
        assert_eq!(First.locate(&p, true), vec![VertexId::new(1)]);
        assert!(AllButLast.locate(&[], true).is_empty());
        assert!(First.locate(&[], false).is_empty());

        let last_only = |p: &[VertexId], _: bool| p.last().copied().into_iter().collect::<Vec<_>>();
        assert_eq!(last_only.locate(&p, true), vec![VertexId::new(2)]);
    }

    #[test]
    fn test_all_but_last_keeps_undecided_end() {
        let p = path();
        assert_eq!(AllButLast.locate(&p, false), p);
        assert_eq!(AllButLast.locate(&p[..1], false), vec![VertexId::new(1)]);
        assert!(AllButLast.locate(&p[..1], true).is_empty());
        assert!(AllButLast.locate(&[], false).is_empty());
    }
}
