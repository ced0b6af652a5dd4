//! Right-hand side of the Laplace Tidal Equation, regularized at the poles.
//!
//! In terms of *x* ≡ *μ* = cos(*θ*), the physical amplitudes *P* and *Q* are
//! written as
//! ```text
//! P = (1 - x²)^α f
//! Q = (1 - x²)^α g
//! α = |m| / 2
//! ```
//! which turns the tidal equations into
//! ```text
//!           df
//! (1 - x²) -- = (2 α x + m q x) f + (q² x² - 1) g
//!           dx
//!
//!           dg
//! (1 - x²) -- = (2 α x - m q x) g + (λ (1 - x²) - m²) f
//!           dx
//! ```
//! whose bounded solutions are regular at *x* = ±1. See
//! [`docs`][crate::docs#regularization].

use ndarray as nd;
use crate::{
    Arr1,
    Arr2,
    error::{ LengthError, XError },
    solve::XResult,
    DEF_SEED,
};

/// Two-component state `[f, g]` of the regularized system.
pub type State = [f64; 2];

// denominators at or below this are treated as singular
pub(crate) const SINGULAR_FLOOR: f64 = 1e2 * f64::EPSILON;

/// A first-order system of two ordinary differential equations.
pub trait OdeSystem {
    /// Evaluate *dy*/*dt* at `(t, y)`.
    fn rhs(&self, t: f64, y: &State) -> XResult<State>;
}

/// Mode parameters identifying a single trial problem.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModeParams {
    /// Azimuthal wavenumber.
    pub m: i32,
    /// Spin parameter.
    pub q: f64,
    /// Trial eigenvalue.
    pub lam: f64,
}

impl ModeParams {
    /// Regularization exponent *α* = |*m*| / 2.
    pub fn alpha(&self) -> f64 { 0.5 * f64::from(self.m.abs()) }
}

/// The regularized Laplace Tidal Equation for fixed mode parameters, set up for
/// integration starting at `t0 = 1 - epsilon`.
#[derive(Copy, Clone, Debug)]
pub struct LaplaceOde {
    m: f64,
    q: f64,
    msq: f64,
    qsq: f64,
    alpha: f64,
    lam: f64,
    t0: f64,
    seed: f64,
}

impl LaplaceOde {
    /// Create a new `LaplaceOde`, validating the boundary offset.
    pub fn new(params: ModeParams, epsilon: f64) -> XResult<Self> {
        XError::check_epsilon(epsilon)?;
        let m = f64::from(params.m);
        Ok(Self {
            m,
            q: params.q,
            msq: m * m,
            qsq: params.q * params.q,
            alpha: params.alpha(),
            lam: params.lam,
            t0: 1.0 - epsilon,
            seed: DEF_SEED,
        })
    }

    /// Set the (arbitrary) initial amplitude of `f`.
    pub fn with_seed(mut self, seed: f64) -> Self {
        self.seed = seed;
        self
    }

    /// Starting coordinate of the integration.
    pub fn t0(&self) -> f64 { self.t0 }

    /// Regularization exponent.
    pub fn alpha(&self) -> f64 { self.alpha }

    /// Initial state at `t0`.
    ///
    /// `f` is set to the seed amplitude and `g` is chosen to satisfy the
    /// regularity condition of the system at the boundary,
    /// ```text
    /// g = (2 α + m q) t0 f / (1 - q² t0²)
    /// ```
    pub fn init_y(&self) -> XResult<State> {
        let t0 = self.t0;
        let denom = 1.0 - self.qsq * t0 * t0;
        if denom.abs() <= SINGULAR_FLOOR {
            return Err(XError::Singularity { t: t0, denom });
        }
        let y0 = self.seed;
        let y1 = (2.0 * self.alpha + self.m * self.q) * t0 * y0 / denom;
        Ok([y0, y1])
    }

    /// Convert a sampled solution of the regularized system to the physical
    /// amplitudes `[P, Q]` by multiplying each row by (1 - *t*²)^*α*.
    ///
    /// `y` is expected to have shape `(t.len(), 2)`.
    pub fn transform<S, T>(&self, t: &Arr1<S>, y: &Arr2<T>)
        -> XResult<nd::Array2<f64>>
    where
        S: nd::Data<Elem = f64>,
        T: nd::Data<Elem = f64>,
    {
        LengthError::check(t, &y.column(0))?;
        let mut py = y.to_owned();
        nd::Zip::from(py.rows_mut()).and(t)
            .for_each(|mut row, &tk| {
                row *= (1.0 - tk * tk).powf(self.alpha);
            });
        Ok(py)
    }
}

impl OdeSystem for LaplaceOde {
    fn rhs(&self, t: f64, y: &State) -> XResult<State> {
        let sinsq = 1.0 - t * t;
        if sinsq <= SINGULAR_FLOOR {
            return Err(XError::Singularity { t, denom: sinsq });
        }
        let twoax = 2.0 * self.alpha * t;
        let mqx = self.m * self.q * t;
        let qterm = self.qsq * t * t - 1.0;
        let dy0 = ((twoax + mqx) * y[0] + qterm * y[1]) / sinsq;
        let dy1
            = self.lam * y[0] - (self.msq * y[0] - (twoax - mqx) * y[1]) / sinsq;
        Ok([dy0, dy1])
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use super::*;

    fn ode(m: i32, q: f64, lam: f64) -> LaplaceOde {
        LaplaceOde::new(ModeParams { m, q, lam }, 1e-6).unwrap()
    }

    #[test]
    fn init_y_regularity() {
        let leg = ode(0, 0.0, 6.0);
        assert_eq!(leg.init_y().unwrap(), [1e-4, 0.0]);

        let leg = ode(2, 0.5, 6.0);
        let t0 = 1.0 - 1e-6;
        let [y0, y1] = leg.init_y().unwrap();
        assert_relative_eq!(y0, 1e-4);
        assert_relative_eq!(y1, 3.0 * t0 * 1e-4 / (1.0 - 0.25 * t0 * t0));
    }

    #[test]
    fn init_y_singular() {
        let leg = ode(1, 1.0 / (1.0 - 1e-6), 2.0);
        assert!(matches!(leg.init_y(), Err(XError::Singularity { .. })));
    }

    // f = const, g = 2 t f solves the m = 2, q = 0 system for λ = 6 exactly
    #[test]
    fn rhs_associated_legendre() {
        let leg = ode(2, 0.0, 6.0);
        for t in [0.0, 0.3, -0.7, 0.99] {
            let [dy0, dy1] = leg.rhs(t, &[1.0, 2.0 * t]).unwrap();
            assert_relative_eq!(dy0, 0.0, epsilon = 1e-12);
            assert_relative_eq!(dy1, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rhs_rejects_poles() {
        let leg = ode(0, 0.0, 2.0);
        assert!(matches!(
            leg.rhs(1.0, &[1.0, 0.0]),
            Err(XError::Singularity { .. })
        ));
        assert!(leg.rhs(1.0 - 1e-8, &[1.0, 0.0]).is_ok());
    }

    #[test]
    fn transform_is_pure() {
        let leg = ode(2, 0.0, 6.0);
        let t = nd::array![0.0, 0.5];
        let y = nd::array![[1.0, 2.0], [1.0, 2.0]];
        let py = leg.transform(&t, &y).unwrap();
        assert_eq!(y, nd::array![[1.0, 2.0], [1.0, 2.0]]);
        assert_relative_eq!(py[[0, 0]], 1.0);
        assert_relative_eq!(py[[1, 0]], 0.75);
        assert_relative_eq!(py[[1, 1]], 1.5);
    }

    #[test]
    fn transform_length_mismatch() {
        let leg = ode(1, 0.0, 2.0);
        let t = nd::array![0.0, 0.5, 0.7];
        let y = nd::array![[1.0, 2.0], [1.0, 2.0]];
        assert!(matches!(leg.transform(&t, &y), Err(XError::Length(_))));
    }
}
