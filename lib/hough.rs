//! Hough functions derived from a resampled eigenfunction.
//!
//! With *μ* = cos(*θ*), the Laplace Tidal Equation eigenfunction Θ and its
//! companions are
//! ```text
//! Θ  = P
//! Θ̂  = Q
//! Θ̃  = -m P - q μ Q
//! ```
//! where `(P, Q)` are the two channels of a [`Profile`].

use ndarray as nd;
use crate::{ error::XError, solve::{ Profile, XResult } };

/// The triple (Θ, Θ̂, Θ̃) sampled on a grid in *μ*.
#[derive(Clone, Debug)]
pub struct HoughFunctions {
    /// Azimuthal order.
    pub m: i32,
    /// Grid coordinates *μ*.
    pub mu: nd::Array1<f64>,
    /// Θ
    pub hough: nd::Array1<f64>,
    /// Θ̂
    pub hough_hat: nd::Array1<f64>,
    /// Θ̃
    pub hough_tilde: nd::Array1<f64>,
}

impl HoughFunctions {
    /// Assemble the triple from a profile computed for azimuthal order `m` and
    /// spin parameter `q`.
    pub fn from_profile(profile: &Profile, m: i32, q: f64) -> Self {
        let mf = f64::from(m);
        let mut hough_tilde = profile.p.mapv(|pk| -mf * pk);
        nd::Zip::from(&mut hough_tilde)
            .and(&profile.t)
            .and(&profile.q)
            .for_each(|tilde, mu, qk| { *tilde -= q * mu * qk; });
        Self {
            m,
            mu: profile.t.clone(),
            hough: profile.p.clone(),
            hough_hat: profile.q.clone(),
            hough_tilde,
        }
    }

    // index of the sample nearest the equator
    fn equator(&self) -> Option<usize> {
        self.mu.iter().enumerate()
            .filter(|(_, mu)| !mu.is_nan())
            .min_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()))
            .map(|(i, _)| i)
    }

    /// Return a copy normalized to the convention of Townsend (2003) for
    /// meridional index `k`.
    ///
    /// All three functions are divided by Θ(0) when `k` is even and by -Θ̂(0)
    /// when `k` is odd, with the equatorial value read at the grid sample
    /// nearest *μ* = 0. Θ̃ additionally changes sign when *m* is negative.
    ///
    /// Fails with [`XError::DegenerateNorm`] if the grid is empty or the
    /// divisor vanishes.
    pub fn townsend_normalized(&self, k: i32) -> XResult<Self> {
        let i = self.equator().ok_or(XError::DegenerateNorm)?;
        let norm
            = if k.rem_euclid(2) == 0 { self.hough[i] } else { -self.hough_hat[i] };
        if norm == 0.0 || !norm.is_finite() {
            return Err(XError::DegenerateNorm);
        }
        let tilde_norm = if self.m < 0 { -norm } else { norm };
        Ok(Self {
            m: self.m,
            mu: self.mu.clone(),
            hough: &self.hough / norm,
            hough_hat: &self.hough_hat / norm,
            hough_tilde: &self.hough_tilde / tilde_norm,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;

    fn profile() -> Profile {
        let t = nd::array![1.0, 0.5, 0.0];
        Profile {
            p: t.mapv(|tk: f64| 2.0 * (1.0 - tk * tk)),
            q: t.mapv(|tk: f64| tk - 0.5),
            t,
        }
    }

    #[test]
    fn triple() {
        let h = HoughFunctions::from_profile(&profile(), 2, 0.5);
        assert_eq!(h.hough, nd::array![0.0, 1.5, 2.0]);
        assert_eq!(h.hough_hat, nd::array![0.5, 0.0, -0.5]);
        // -2 P - 0.5 μ Q
        assert_abs_diff_eq!(h.hough_tilde[0], -0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(h.hough_tilde[1], -3.0, epsilon = 1e-15);
        assert_abs_diff_eq!(h.hough_tilde[2], -4.0, epsilon = 1e-15);
    }

    #[test]
    fn townsend_even_odd() {
        let h = HoughFunctions::from_profile(&profile(), 2, 0.5);
        assert_eq!(h.m, 2);
        let even = h.townsend_normalized(0).unwrap();
        assert_eq!(even.hough[2], 1.0);
        assert_eq!(even.hough_tilde[2], -2.0);
        let odd = h.townsend_normalized(1).unwrap();
        assert_eq!(odd.hough_hat[2], -1.0);
        assert_eq!(odd.hough[2], 4.0);
        assert_eq!(odd.hough_tilde[2], -8.0);
    }

    // m < 0 flips the sign of Θ̃ on top of the common divisor
    #[test]
    fn townsend_negative_m() {
        let h = HoughFunctions::from_profile(&profile(), -2, 0.5);
        assert_eq!(h.m, -2);
        // 2 P - 0.5 μ Q = 4 at μ = 0
        assert_eq!(h.hough_tilde[2], 4.0);
        let odd = h.townsend_normalized(1).unwrap();
        assert_eq!(odd.m, -2);
        assert_eq!(odd.hough[2], 4.0);
        assert_eq!(odd.hough_tilde[2], -8.0);
    }

    #[test]
    fn townsend_degenerate() {
        let mut prof = profile();
        prof.p.fill(0.0);
        let h = HoughFunctions::from_profile(&prof, 0, 0.0);
        assert!(matches!(h.townsend_normalized(2), Err(XError::DegenerateNorm)));
        assert!(h.townsend_normalized(1).is_ok());
    }
}
