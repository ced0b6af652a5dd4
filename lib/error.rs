//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned from functions in [`interp`][crate::interp].
#[derive(Debug, Error)]
pub enum SplineError {
    /// [`LengthError`]
    #[error("length error: {0}")]
    Length(#[from] LengthError),

    /// Returned when fewer than 4 samples are given; a not-a-knot spline is
    /// only defined for at least 4 points.
    #[error("cubic spline interpolation requires at least 4 samples; got {0}")]
    TooFewPoints(usize),

    /// Returned when sample coordinates are not strictly monotonic.
    #[error("spline sample coordinates must be strictly monotonic")]
    NotMonotonic,

    /// Returned when evaluation is requested outside of the sampled span.
    #[error("point {x} lies outside of the interpolation span [{lo}, {hi}]")]
    OutOfRange { x: f64, lo: f64, hi: f64 },
}

impl SplineError {
    pub(crate) fn check_len<S>(a: &nd::ArrayBase<S, nd::Ix1>)
        -> Result<(), Self>
    where S: nd::Data<Elem = f64>
    {
        let n = a.len();
        (n >= 4).then_some(()).ok_or(Self::TooFewPoints(n))
    }
}

/// Returned from an [`Integrator`][crate::integrate::Integrator] when it cannot
/// carry a solution to its target.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// Returned when the maximum number of steps is exhausted.
    #[error("step budget of {maxsteps} steps exhausted at t = {t}")]
    StepBudget { maxsteps: usize, t: f64 },

    /// Returned when the step size falls below the resolution of `t`.
    #[error("step size underflowed at t = {t}")]
    StepSizeUnderflow { t: f64 },

    /// Returned when the stepper's stiffness test fires repeatedly.
    #[error("problem appears to be stiff at t = {t}")]
    Stiff { t: f64 },

    /// Returned when the state becomes infinite or NaN.
    #[error("encountered a non-finite state at t = {t}")]
    NonFinite { t: f64 },
}

/// Returned from the shooting solver and its components.
#[derive(Debug, Error)]
pub enum XError {
    /// Returned when a boundary offset outside of (0, 1) is encountered.
    #[error("epsilon values must lie in (0, 1); got {0}")]
    BadEpsilon(f64),

    /// Returned when the integration target does not lie strictly between
    /// `-t0` and `t0`.
    #[error("integration target must lie in (-t0, t0) = (-{t0}, {t0}); got {t1}")]
    BadTarget { t0: f64, t1: f64 },

    /// Returned when a negative absolute or non-positive relative tolerance is
    /// encountered.
    #[error("tolerances must be finite with atol ≥ 0 and rtol > 0; got {0}")]
    BadTolerance(f64),

    /// Returned when a non-positive `maxsteps` value is encountered.
    #[error("maxsteps must be greater than 0; got {0}")]
    BadMaxsteps(usize),

    /// Returned when a right-hand side or initial condition would divide by a
    /// vanishing denominator; usually this means epsilon is too small.
    #[error("near-singular denominator {denom:e} at t = {t}")]
    Singularity { t: f64, denom: f64 },

    /// [`IntegrationError`]
    #[error("integration error: {0}")]
    Integration(#[from] IntegrationError),

    /// Returned when a normalization divisor is zero.
    #[error("cannot normalize an identically zero solution")]
    DegenerateNorm,

    /// [`SplineError`]
    #[error("spline error: {0}")]
    Spline(#[from] SplineError),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),
}

impl XError {
    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0 && epsilon < 1.0).then_some(())
            .ok_or(Self::BadEpsilon(epsilon))
    }

    pub(crate) fn check_target(t0: f64, t1: f64) -> Result<(), Self> {
        (t1 > -t0 && t1 < t0).then_some(()).ok_or(Self::BadTarget { t0, t1 })
    }

    pub(crate) fn check_tolerances(atol: f64, rtol: f64) -> Result<(), Self> {
        (atol.is_finite() && atol >= 0.0).then_some(())
            .ok_or(Self::BadTolerance(atol))?;
        (rtol.is_finite() && rtol > 0.0).then_some(())
            .ok_or(Self::BadTolerance(rtol))
    }

    pub(crate) fn check_maxsteps(maxsteps: usize) -> Result<(), Self> {
        (maxsteps != 0).then_some(()).ok_or(Self::BadMaxsteps(maxsteps))
    }

    /// Return `true` if `self` signals that the trial point could not be
    /// evaluated with the current boundary offset or tolerances (as opposed to
    /// a well-defined but unusable result), i.e. `Singularity` or
    /// `Integration`.
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::Singularity { .. } | Self::Integration(_))
    }

    /// Return `true` if `self` is an out-of-range interpolation request.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::Spline(SplineError::OutOfRange { .. }))
    }
}
