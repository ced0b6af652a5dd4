#![allow(dead_code, non_snake_case)]

//! Provides a shooting-method solver for the eigenvalues and eigenfunctions
//! (Hough functions) of the Laplace Tidal Equation over the half-domain
//! *μ* ≡ cos(*θ*) ∊ (0, 1).
//!
//! Provides implementations for the following numerical routines:
//! - Singularity-regularized right-hand side with a boundary-consistent
//!   initial condition
//! - Adaptive Dormand-Prince 8(5,3) integration with step observers
//! - Parity-selected, scale-free shooting residuals for use by an external
//!   root search
//! - Normalized eigenfunction reconstruction and not-a-knot cubic spline
//!   resampling
//!
//! ```
//! use tidal::{ score::Parity, solve::ShootingSolver };
//!
//! // with no rotation, the eigenvalues are those of the Legendre equation
//! let solver = ShootingSolver::new(0, 0.0, Parity::Even);
//! let below = solver.shoot(5.9).unwrap();
//! let above = solver.shoot(6.1).unwrap();
//! assert!(below * above < 0.0);
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod hough;
pub mod integrate;
pub mod interp;
pub mod observe;
pub mod ode;
pub mod score;
pub mod solve;
pub mod utils;

pub mod docs;

pub(crate) const DEF_EPSILON: f64 = 1e-6;
pub(crate) const DEF_T1: f64 = 0.0;
pub(crate) const DEF_SEED: f64 = 1e-4;
pub(crate) const DEF_ATOL: f64 = 0.0;
pub(crate) const DEF_RTOL: f64 = 1.0 / 1073741824.0; // 2^-30
pub(crate) const DEF_MAXSTEPS: usize = 2000;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;

/// Eigenvalue of the associated Legendre equation for degree `l`, which is the
/// exact eigenvalue of the Laplace Tidal Equation in the non-rotating (*q* = 0)
/// limit.
pub fn legendre_eigenvalue(l: u32) -> f64 {
    let l = l as f64;
    l * (l + 1.0)
}
