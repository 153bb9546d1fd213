//! Outward-rounded interval arithmetic over `f64`.
//!
//! Every operation rounds its lower bound down and its upper bound up by one
//! ulp, so the exact result of the real operation is always enclosed.
//! An interval with `lo > hi` is empty.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::logic::Kleenean;

/// Largest `f64` strictly below `x`.
pub fn next_down(x: f64) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        return x;
    }
    if x == 0.0 {
        return -f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits - 1)
    } else {
        f64::from_bits(bits + 1)
    }
}

/// Smallest `f64` strictly above `x`.
pub fn next_up(x: f64) -> f64 {
    -next_down(-x)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub fn new(lo: f64, hi: f64) -> Self {
        assert!(!lo.is_nan() && !hi.is_nan(), "Interval bounds must not be NaN");
        Self { lo, hi }
    }

    /// The degenerate interval `[x, x]`.
    pub fn point(x: f64) -> Self {
        Self::new(x, x)
    }

    pub fn empty() -> Self {
        Self {
            lo: f64::INFINITY,
            hi: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.hi - self.lo
        }
    }

    /// A point of the interval. For finite bounds it lies in `[lo, hi]`.
    pub fn midpoint(&self) -> f64 {
        self.lo + (self.hi - self.lo) / 2.0
    }

    pub fn intersection(&self, other: &Interval) -> Interval {
        Interval {
            lo: self.lo.max(other.lo),
            hi: self.hi.min(other.hi),
        }
    }

    /// Smallest interval containing both.
    pub fn hull(&self, other: &Interval) -> Interval {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Interval {
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }

    /// Splits the interval at its midpoint.
    pub fn bisect(&self) -> (Interval, Interval) {
        let mid = self.midpoint();
        (Interval::new(self.lo, mid), Interval::new(mid, self.hi))
    }

    /// Whether the two intervals share no point. Exact for closed intervals.
    pub fn disjoint(&self, other: &Interval) -> bool {
        self.is_empty() || other.is_empty() || self.hi < other.lo || other.hi < self.lo
    }

    /// Whether `other` is a subset of `self`. Exact for closed intervals.
    pub fn includes(&self, other: &Interval) -> bool {
        other.is_empty() || (self.lo <= other.lo && other.hi <= self.hi)
    }

    /// Whether the exact value bounded by `value` lies in `self`.
    pub fn contains(&self, value: &Interval) -> Kleenean {
        if self.includes(value) {
            Kleenean::True
        } else if self.disjoint(value) {
            Kleenean::False
        } else {
            Kleenean::Indeterminate
        }
    }

    pub fn sqr(&self) -> Interval {
        if self.is_empty() {
            return *self;
        }
        let a = self.lo * self.lo;
        let b = self.hi * self.hi;
        if self.lo <= 0.0 && 0.0 <= self.hi {
            Interval::new(0.0, next_up(a.max(b)))
        } else {
            Interval::new(next_down(a.min(b)).max(0.0), next_up(a.max(b)))
        }
    }

    /// Multiplication by an exact constant.
    pub fn scale(&self, k: f64) -> Interval {
        *self * Interval::point(k)
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            return Interval::empty();
        }
        Interval::new(next_down(self.lo + rhs.lo), next_up(self.hi + rhs.hi))
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        Interval {
            lo: -self.hi,
            hi: -self.lo,
        }
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Interval) -> Interval {
        self + (-rhs)
    }
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            return Interval::empty();
        }
        let products = [self.lo * rhs.lo, self.lo * rhs.hi, self.hi * rhs.lo, self.hi * rhs.hi];
        // 0 * inf
        if products.iter().any(|p| p.is_nan()) {
            return Interval::new(f64::NEG_INFINITY, f64::INFINITY);
        }
        let lo = products.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = products.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Interval::new(next_down(lo), next_up(hi))
    }
}

impl From<f64> for Interval {
    fn from(x: f64) -> Self {
        Interval::point(x)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[]")
        } else if self.lo == self.hi {
            write!(f, "{}", self.lo)
        } else {
            write!(f, "[{}, {}]", self.lo, self.hi)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_next_up_down() {
        assert!(next_up(1.0) > 1.0);
        assert!(next_down(1.0) < 1.0);
        assert!(next_down(0.0) < 0.0);
        assert!(next_up(0.0) > 0.0);
        assert!(next_down(-1.0) < -1.0);
        assert_eq!(next_up(f64::INFINITY), f64::INFINITY);
        assert_eq!(next_down(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn test_add_encloses() {
        let a = Interval::point(0.1);
        let b = Interval::point(0.2);
        let c = a + b;
        assert!(c.lo <= 0.1 + 0.2 && 0.1 + 0.2 <= c.hi);
        assert!(c.lo < c.hi);
    }

    #[test]
    fn test_mul_signs() {
        let a = Interval::new(-1.0, 2.0);
        let b = Interval::new(3.0, 4.0);
        let c = a * b;
        assert!(c.lo <= -4.0 && c.hi >= 8.0);
        assert!(c.lo > -4.0001 && c.hi < 8.0001);
    }

    #[test]
    fn test_sqr_straddling_zero() {
        let a = Interval::new(-2.0, 1.0);
        let s = a.sqr();
        assert_eq!(s.lo, 0.0);
        assert!(s.hi >= 4.0);
    }

    #[test]
    fn test_contains() {
        let i = Interval::new(0.0, 1.0);
        assert_eq!(i.contains(&Interval::point(0.5)), Kleenean::True);
        assert_eq!(i.contains(&Interval::point(2.0)), Kleenean::False);
        assert_eq!(i.contains(&Interval::new(0.9, 1.1)), Kleenean::Indeterminate);
    }

    #[test]
    fn test_disjoint_closed() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(1.0, 2.0);
        let c = Interval::new(1.5, 2.0);
        assert!(!a.disjoint(&b));
        assert!(a.disjoint(&c));
        assert!(a.intersection(&c).is_empty());
    }

    #[test]
    fn test_bisect_and_hull() {
        let (l, r) = Interval::new(0.0, 4.0).bisect();
        assert_eq!(l, Interval::new(0.0, 2.0));
        assert_eq!(r, Interval::new(2.0, 4.0));
        assert_eq!(l.hull(&r), Interval::new(0.0, 4.0));
        assert_eq!(Interval::empty().hull(&l), l);
    }
}
