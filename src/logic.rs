//! Three-valued logic for bounded-precision predicates.
//!
//! A predicate evaluated on enclosures either proves its outcome or gives up:
//!
//! - [`Kleenean`] carries all three outcomes.
//! - [`LowerKleenean`] can only ever be proven `True` (it is a lower bound on truth).
//! - [`UpperKleenean`] can only ever be proven `False` (it is an upper bound on truth).
//!
//! The one-sided wrappers have no constructor for the forbidden proven value:
//! converting a [`Kleenean`] into them weakens that value to `Indeterminate`.
//! Negation swaps the two sides.
//!
//! Two projections turn a value into a `bool`:
//! [`definitely`] (proven true) and [`possibly`] (not proven false).
use std::fmt;
use std::ops::Not;

/// Outcome of a bounded-precision predicate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kleenean {
    True,
    False,
    Indeterminate,
}

impl Kleenean {
    pub const fn definitely(self) -> bool {
        matches!(self, Kleenean::True)
    }

    pub const fn possibly(self) -> bool {
        !matches!(self, Kleenean::False)
    }

    pub const fn is_determinate(self) -> bool {
        !matches!(self, Kleenean::Indeterminate)
    }

    pub fn and(self, other: Kleenean) -> Kleenean {
        match (self, other) {
            (Kleenean::False, _) | (_, Kleenean::False) => Kleenean::False,
            (Kleenean::True, Kleenean::True) => Kleenean::True,
            _ => Kleenean::Indeterminate,
        }
    }

    pub fn or(self, other: Kleenean) -> Kleenean {
        match (self, other) {
            (Kleenean::True, _) | (_, Kleenean::True) => Kleenean::True,
            (Kleenean::False, Kleenean::False) => Kleenean::False,
            _ => Kleenean::Indeterminate,
        }
    }
}

impl From<bool> for Kleenean {
    fn from(value: bool) -> Self {
        if value {
            Kleenean::True
        } else {
            Kleenean::False
        }
    }
}

impl Not for Kleenean {
    type Output = Kleenean;

    fn not(self) -> Self::Output {
        match self {
            Kleenean::True => Kleenean::False,
            Kleenean::False => Kleenean::True,
            Kleenean::Indeterminate => Kleenean::Indeterminate,
        }
    }
}

impl fmt::Display for Kleenean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kleenean::True => write!(f, "true"),
            Kleenean::False => write!(f, "false"),
            Kleenean::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// A value that can be proven `True` but never proven `False`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LowerKleenean(Kleenean);

impl LowerKleenean {
    pub const TRUE: LowerKleenean = LowerKleenean(Kleenean::True);
    pub const INDETERMINATE: LowerKleenean = LowerKleenean(Kleenean::Indeterminate);

    /// Returns the underlying value, which is never `False`.
    pub const fn get(self) -> Kleenean {
        self.0
    }
}

impl From<Kleenean> for LowerKleenean {
    fn from(value: Kleenean) -> Self {
        match value {
            Kleenean::False => LowerKleenean::INDETERMINATE,
            other => LowerKleenean(other),
        }
    }
}

impl Not for LowerKleenean {
    type Output = UpperKleenean;

    fn not(self) -> Self::Output {
        UpperKleenean(!self.0)
    }
}

/// A value that can be proven `False` but never proven `True`.
///
/// Safety verdicts and spuriousness are of this kind: at finite effort a region
/// can be shown to be unsafe, and a counterexample can be shown to be real, but
/// never the opposite.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UpperKleenean(Kleenean);

impl UpperKleenean {
    pub const FALSE: UpperKleenean = UpperKleenean(Kleenean::False);
    pub const INDETERMINATE: UpperKleenean = UpperKleenean(Kleenean::Indeterminate);

    /// Returns the underlying value, which is never `True`.
    pub const fn get(self) -> Kleenean {
        self.0
    }
}

impl From<Kleenean> for UpperKleenean {
    fn from(value: Kleenean) -> Self {
        match value {
            Kleenean::True => UpperKleenean::INDETERMINATE,
            other => UpperKleenean(other),
        }
    }
}

impl Not for UpperKleenean {
    type Output = LowerKleenean;

    fn not(self) -> Self::Output {
        LowerKleenean(!self.0)
    }
}

impl fmt::Display for LowerKleenean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for UpperKleenean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Common projections of all three-valued types.
pub trait Truth: Copy {
    fn value(self) -> Kleenean;
}

impl Truth for Kleenean {
    fn value(self) -> Kleenean {
        self
    }
}

impl Truth for LowerKleenean {
    fn value(self) -> Kleenean {
        self.0
    }
}

impl Truth for UpperKleenean {
    fn value(self) -> Kleenean {
        self.0
    }
}

/// `true` iff the value is proven true.
pub fn definitely(value: impl Truth) -> bool {
    value.value().definitely()
}

/// `true` unless the value is proven false.
pub fn possibly(value: impl Truth) -> bool {
    value.value().possibly()
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_projections() {
        assert!(definitely(Kleenean::True));
        assert!(!definitely(Kleenean::Indeterminate));
        assert!(!definitely(Kleenean::False));

        assert!(possibly(Kleenean::True));
        assert!(possibly(Kleenean::Indeterminate));
        assert!(!possibly(Kleenean::False));
    }

    #[test]
    fn test_connectives() {
        use Kleenean::*;
        assert_eq!(True.and(Indeterminate), Indeterminate);
        assert_eq!(False.and(Indeterminate), False);
        assert_eq!(True.or(Indeterminate), True);
        assert_eq!(False.or(Indeterminate), Indeterminate);
        assert_eq!(!Indeterminate, Indeterminate);
        assert_eq!(!True, False);
    }

    #[test]
    fn test_upper_never_true() {
        let u = UpperKleenean::from(Kleenean::True);
        assert_eq!(u.get(), Kleenean::Indeterminate);
        assert!(possibly(u));
        assert!(!definitely(u));

        let u = UpperKleenean::from(Kleenean::False);
        assert!(!possibly(u));
    }

    #[test]
    fn test_lower_never_false() {
        let l = LowerKleenean::from(Kleenean::False);
        assert_eq!(l.get(), Kleenean::Indeterminate);
        assert!(definitely(LowerKleenean::from(Kleenean::True)));
    }

    #[test]
    fn test_negation_swaps_sides() {
        let u: UpperKleenean = !LowerKleenean::TRUE;
        assert_eq!(u, UpperKleenean::FALSE);
        let l: LowerKleenean = !UpperKleenean::FALSE;
        assert!(definitely(l));
        assert_eq!((!UpperKleenean::INDETERMINATE).get(), Kleenean::Indeterminate);
    }
}
