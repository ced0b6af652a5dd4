//! Not-a-knot cubic spline interpolation of array-sampled (continuous)
//! functions.
//!
//! ```
//! use ndarray as nd;
//! use tidal::interp::CubicSpline;
//!
//! let x: nd::Array1<f64> = nd::Array::linspace(1.0, -1.0, 9);
//! let y = x.mapv(|xk| (xk + 3.0) * (xk - 0.5) * (xk - 2.0));
//! let spline = CubicSpline::new(&x, &y).unwrap();
//! assert!(
//!     [-0.8, 0.1, 0.7].into_iter()
//!         .all(|xk| {
//!             let expected = (xk + 3.0) * (xk - 0.5) * (xk - 2.0);
//!             (spline.eval(xk).unwrap() - expected).abs() < 1e-12
//!         })
//! );
//! assert!(spline.eval(1.5).is_err());
//! ```

use ndarray as nd;
use crate::{ Arr1, error::* };

pub type InterpResult<T> = Result<T, SplineError>;

/// A cubic spline through a set of samples, with the not-a-knot condition (a
/// continuous third derivative across the second and second-to-last samples)
/// imposed at both ends.
///
/// Sample coordinates may be given in either strictly increasing or strictly
/// decreasing order.
#[derive(Clone, Debug)]
pub struct CubicSpline {
    // coordinates, increasing
    x: nd::Array1<f64>,
    // sampled values
    y: nd::Array1<f64>,
    // second derivatives at each coordinate
    m: nd::Array1<f64>,
}

// solve a tridiagonal system in place via the Thomas algorithm, leaving the
// solution in `r`
//
// `sub[0]` and `sup[n - 1]` are ignored
fn solve_tridiagonal(sub: &[f64], diag: &mut [f64], sup: &[f64], r: &mut [f64]) {
    let n = diag.len();
    for i in 1..n {
        let w = sub[i] / diag[i - 1];
        diag[i] -= w * sup[i - 1];
        r[i] -= w * r[i - 1];
    }
    r[n - 1] /= diag[n - 1];
    for i in (0..n - 1).rev() {
        r[i] = (r[i] - sup[i] * r[i + 1]) / diag[i];
    }
}

impl CubicSpline {
    /// Construct the spline through samples `(x[k], y[k])`.
    pub fn new<S, T>(x: &Arr1<S>, y: &Arr1<T>) -> InterpResult<Self>
    where
        S: nd::Data<Elem = f64>,
        T: nd::Data<Elem = f64>,
    {
        LengthError::check(x, y)?;
        SplineError::check_len(x)?;
        let decreasing = x[1] < x[0];
        let (x, y): (nd::Array1<f64>, nd::Array1<f64>)
            = if decreasing {
                (
                    x.iter().rev().copied().collect(),
                    y.iter().rev().copied().collect(),
                )
            } else {
                (x.to_owned(), y.to_owned())
            };
        if x.iter().zip(x.iter().skip(1)).any(|(xk, xkp1)| !(xkp1 > xk)) {
            return Err(SplineError::NotMonotonic);
        }

        let n = x.len();
        let h: Vec<f64>
            = x.iter().zip(x.iter().skip(1))
            .map(|(xk, xkp1)| xkp1 - xk)
            .collect();
        let d: Vec<f64>
            = y.iter().zip(y.iter().skip(1)).zip(&h)
            .map(|((yk, ykp1), hk)| (ykp1 - yk) / hk)
            .collect();

        // unknowns are the interior second derivatives m[1..n - 1]; the
        // not-a-knot conditions eliminate m[0] and m[n - 1]
        let k = n - 2;
        let mut sub: Vec<f64> = vec![0.0; k];
        let mut diag: Vec<f64> = vec![0.0; k];
        let mut sup: Vec<f64> = vec![0.0; k];
        let mut r: Vec<f64> = vec![0.0; k];
        for j in 0..k {
            let (hl, hr) = (h[j], h[j + 1]);
            sub[j] = hl;
            diag[j] = 2.0 * (hl + hr);
            sup[j] = hr;
            r[j] = 6.0 * (d[j + 1] - d[j]);
        }
        let (h0, h1) = (h[0], h[1]);
        diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
        sup[0] = (h1 * h1 - h0 * h0) / h1;
        let (ha, hb) = (h[n - 3], h[n - 2]);
        sub[k - 1] = (ha * ha - hb * hb) / ha;
        diag[k - 1] = (ha + hb) * (2.0 * ha + hb) / ha;
        solve_tridiagonal(&sub, &mut diag, &sup, &mut r);

        let mut m: nd::Array1<f64> = nd::Array1::zeros(n);
        m.slice_mut(nd::s![1..n - 1]).assign(&nd::ArrayView1::from(&r[..]));
        m[0] = ((h0 + h1) * m[1] - h0 * m[2]) / h1;
        m[n - 1] = ((ha + hb) * m[n - 2] - hb * m[n - 3]) / ha;
        Ok(Self { x, y, m })
    }

    /// Smallest and largest sample coordinates.
    pub fn span(&self) -> (f64, f64) { (self.x[0], self.x[self.x.len() - 1]) }

    /// Return `true` if `x` lies within the sampled span.
    pub fn contains(&self, x: f64) -> bool {
        let (lo, hi) = self.span();
        (lo..=hi).contains(&x)
    }

    /// Evaluate the spline at a point.
    ///
    /// Fails with [`SplineError::OutOfRange`] if `x` lies outside of the
    /// sampled span; values are never extrapolated.
    pub fn eval(&self, x: f64) -> InterpResult<f64> {
        let (lo, hi) = self.span();
        if !self.contains(x) {
            return Err(SplineError::OutOfRange { x, lo, hi });
        }
        let n = self.x.len();
        let i
            = self.x.as_slice()
            .map(|xs| xs.partition_point(|xk| *xk <= x))
            .unwrap_or_else(|| self.x.iter().take_while(|xk| **xk <= x).count())
            .clamp(1, n - 1) - 1;
        let h = self.x[i + 1] - self.x[i];
        let dx = x - self.x[i];
        let (mi, mip1) = (self.m[i], self.m[i + 1]);
        let slope
            = (self.y[i + 1] - self.y[i]) / h - h * (2.0 * mi + mip1) / 6.0;
        Ok(
            self.y[i]
            + slope * dx
            + mi / 2.0 * dx.powi(2)
            + (mip1 - mi) / (6.0 * h) * dx.powi(3)
        )
    }

    /// Evaluate the spline at an array of points.
    ///
    /// Fails on the first point outside of the sampled span.
    pub fn eval_arr<S>(&self, x: &Arr1<S>) -> InterpResult<nd::Array1<f64>>
    where S: nd::Data<Elem = f64>
    {
        x.iter().map(|xk| self.eval(*xk)).collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use super::*;

    #[test]
    fn reproduces_cubics() {
        let f = |x: f64| 2.0 * x.powi(3) - x.powi(2) + 0.5 * x - 3.0;
        let x = nd::array![0.0, 0.1, 0.35, 0.4, 0.8, 1.0];
        let y = x.mapv(f);
        let spline = CubicSpline::new(&x, &y).unwrap();
        for xk in [0.0, 0.05, 0.2, 0.37, 0.6, 0.99, 1.0] {
            assert_relative_eq!(spline.eval(xk).unwrap(), f(xk), epsilon = 1e-12);
        }
    }

    #[test]
    fn four_points() {
        let f = |x: f64| x.powi(3) - x;
        let x = nd::array![-1.0, -0.2, 0.5, 2.0];
        let spline = CubicSpline::new(&x, &x.mapv(f)).unwrap();
        assert_relative_eq!(spline.eval(1.2).unwrap(), f(1.2), epsilon = 1e-12);
    }

    #[test]
    fn decreasing_samples() {
        let x: nd::Array1<f64> = nd::Array1::linspace(1.0, 0.0, 40);
        let y = x.mapv(f64::sin);
        let spline = CubicSpline::new(&x, &y).unwrap();
        assert_eq!(spline.span(), (0.0, 1.0));
        let xs = nd::array![0.0, 0.013, 0.5, 1.0];
        let ys = spline.eval_arr(&xs).unwrap();
        for (xk, yk) in xs.iter().zip(&ys) {
            assert_relative_eq!(*yk, xk.sin(), epsilon = 1e-8);
        }
        // interpolation through the samples themselves
        for (xk, yk) in x.iter().zip(&y) {
            assert_relative_eq!(spline.eval(*xk).unwrap(), *yk, epsilon = 1e-14);
        }
    }

    #[test]
    fn rejects_bad_samples() {
        let x = nd::array![0.0, 1.0, 2.0];
        assert!(matches!(
            CubicSpline::new(&x, &x),
            Err(SplineError::TooFewPoints(3))
        ));
        let x = nd::array![0.0, 1.0, 1.0, 2.0];
        assert!(matches!(
            CubicSpline::new(&x, &x),
            Err(SplineError::NotMonotonic)
        ));
        let y = nd::array![0.0, 1.0];
        assert!(matches!(
            CubicSpline::new(&x, &y),
            Err(SplineError::Length(_))
        ));
    }

    #[test]
    fn no_extrapolation() {
        let x: nd::Array1<f64> = nd::Array1::linspace(0.0, 1.0, 10);
        let spline = CubicSpline::new(&x, &x).unwrap();
        assert!(matches!(
            spline.eval(-1e-3),
            Err(SplineError::OutOfRange { .. })
        ));
        assert!(spline.eval_arr(&nd::array![0.5, 1.5]).is_err());
    }
}
