//! Miscellaneous tools.

use ndarray as nd;
use num_traits::Float;
use crate::{ Arr1, error::XError, solve::XResult };

/// Return whichever of the maximum and minimum of `a` has the larger
/// magnitude, keeping its sign. Ties go to the minimum.
///
/// Returns `None` if `a` is empty or contains NaN.
pub fn extremum<S, A>(a: &Arr1<S>) -> Option<A>
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    let mut iter = a.iter().copied();
    let first = iter.next().filter(|a0| !a0.is_nan())?;
    let (fmin, fmax)
        = iter.try_fold((first, first), |(lo, hi), ak| {
            (!ak.is_nan()).then(|| (lo.min(ak), hi.max(ak)))
        })?;
    if fmax.abs() > fmin.abs() { Some(fmax) } else { Some(fmin) }
}

/// Return a copy of `a` divided by its [`extremum`], so that the entry of
/// largest magnitude becomes exactly ±1 with its sign preserved.
///
/// Fails with [`XError::DegenerateNorm`] if `a` is empty, identically zero, or
/// not finite.
pub fn normalize_extremum<S>(a: &Arr1<S>) -> XResult<nd::Array1<f64>>
where S: nd::Data<Elem = f64>
{
    let norm = norm_divisor(a)?;
    Ok(a.mapv(|ak| ak / norm))
}

/// Return a copy of `a` divided by the largest absolute value of its entries.
///
/// Fails with [`XError::DegenerateNorm`] if `a` is empty, identically zero, or
/// not finite.
pub fn normalize_max_abs<S>(a: &Arr1<S>) -> XResult<nd::Array1<f64>>
where S: nd::Data<Elem = f64>
{
    let norm = norm_divisor(a)?.abs();
    Ok(a.mapv(|ak| ak / norm))
}

// sign-preserving extremum, rejecting values that can't be divided by
pub(crate) fn norm_divisor<S>(a: &Arr1<S>) -> XResult<f64>
where S: nd::Data<Elem = f64>
{
    extremum(a)
        .filter(|n| *n != 0.0 && n.is_finite())
        .ok_or(XError::DegenerateNorm)
}
