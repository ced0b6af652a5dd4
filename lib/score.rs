//! Parity-based selection of the shooting residual.

use crate::ode::State;

/// Symmetry of a mode under reflection through the equator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Parity {
    /// Symmetric modes; `g` must vanish at the equator.
    Even,
    /// Antisymmetric modes; `f` must vanish at the equator.
    Odd,
}

impl Parity {
    /// Parity of the mode with azimuthal order `m` and latitudinal index `l`:
    /// even if and only if `m + l` is even.
    pub fn from_mode(m: i32, l: i32) -> Self {
        if (m + l).rem_euclid(2) == 0 { Self::Even } else { Self::Odd }
    }

    /// Index of the state component that vanishes at the equator.
    pub fn channel(self) -> usize {
        match self {
            Self::Even => 1,
            Self::Odd => 0,
        }
    }

    /// Return `true` if `self` is `Even`.
    pub fn is_even(self) -> bool { matches!(self, Self::Even) }

    /// Return `true` if `self` is `Odd`.
    pub fn is_odd(self) -> bool { matches!(self, Self::Odd) }
}

/// Picks the parity-appropriate component out of a final state.
#[derive(Copy, Clone, Debug)]
pub struct Scorer {
    parity: Parity,
}

impl Scorer {
    pub fn new(parity: Parity) -> Self { Self { parity } }

    pub fn parity(&self) -> Parity { self.parity }

    pub fn set_parity(&mut self, parity: Parity) { self.parity = parity; }

    /// Index of the scored component.
    pub fn channel(&self) -> usize { self.parity.channel() }

    pub fn score(&self, y: &State) -> f64 { y[self.channel()] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parity_from_mode() {
        assert_eq!(Parity::from_mode(0, 2), Parity::Even);
        assert_eq!(Parity::from_mode(2, 3), Parity::Odd);
        assert_eq!(Parity::from_mode(-2, 1), Parity::Odd);
        assert_eq!(Parity::from_mode(2, -2), Parity::Even);
        assert_eq!(Parity::from_mode(-1, 0), Parity::Odd);
    }

    #[test]
    fn scorer_channels() {
        let mut scorer = Scorer::new(Parity::Even);
        assert_eq!(scorer.score(&[3.0, -4.0]), -4.0);
        scorer.set_parity(Parity::Odd);
        assert_eq!(scorer.score(&[3.0, -4.0]), 3.0);
        assert!(scorer.parity().is_odd());
    }
}
