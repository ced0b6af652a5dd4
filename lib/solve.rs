//! Shooting solver for the Laplace Tidal Equation.
//!
//! Every operation builds a fresh [`LaplaceOde`] for the trial eigenvalue and
//! integrates it from `t0 = 1 - epsilon` to the equator `t1 = 0`. Apart from
//! the fields of [`ShootingSolver`] itself, no state is shared between calls,
//! so independent trial eigenvalues may be evaluated in parallel on separate
//! (or shared, immutable) solvers.

use log::warn;
use ndarray as nd;
use crate::{
    Arr1,
    error::XError,
    hough::HoughFunctions,
    integrate::{ Integrator, DormandPrince853, Tolerances },
    interp::CubicSpline,
    observe::{ MaxTracker, Observer, TrajectoryRecorder },
    ode::{ LaplaceOde, ModeParams, State },
    score::{ Parity, Scorer },
    utils::norm_divisor,
    DEF_EPSILON,
    DEF_SEED,
    DEF_T1,
};

pub type XResult<T> = Result<T, XError>;

/// Integration setup shared by all operations of a [`ShootingSolver`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// Offset of the starting point from the pole, `t0 = 1 - epsilon`
    /// (default: `1e-6`).
    pub epsilon: f64,
    /// Integration target (default: `0`).
    pub t1: f64,
    /// Initial amplitude of the regularized solution (default: `1e-4`). The
    /// problem is linear and homogeneous, so this only sets an overall scale
    /// that is removed again by normalization.
    pub seed: f64,
    /// Integrator tolerances and step budget.
    pub tol: Tolerances,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epsilon: DEF_EPSILON,
            t1: DEF_T1,
            seed: DEF_SEED,
            tol: Tolerances::default(),
        }
    }
}

impl Config {
    /// Starting coordinate of every integration.
    pub fn t0(&self) -> f64 { 1.0 - self.epsilon }

    /// Return a copy of `self` with a different boundary offset.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Return a copy of `self` with a different integration target.
    pub fn with_target(mut self, t1: f64) -> Self {
        self.t1 = t1;
        self
    }

    /// Return a copy of `self` with a different initial amplitude.
    pub fn with_seed(mut self, seed: f64) -> Self {
        self.seed = seed;
        self
    }

    /// Return a copy of `self` with different tolerances.
    pub fn with_tolerances(mut self, tol: Tolerances) -> Self {
        self.tol = tol;
        self
    }

    pub(crate) fn check(&self) -> XResult<()> {
        XError::check_epsilon(self.epsilon)?;
        XError::check_target(self.t0(), self.t1)?;
        self.tol.check()?;
        Ok(())
    }
}

/// A solution sampled at the integrator's accepted steps.
#[derive(Clone, Debug)]
pub struct Trajectory {
    /// Coordinates, strictly decreasing from `t0` to `t1`.
    pub t: nd::Array1<f64>,
    /// Solution values with shape `(t.len(), 2)`; the columns are `P` and `Q`.
    pub y: nd::Array2<f64>,
}

impl Trajectory {
    /// Number of samples.
    pub fn len(&self) -> usize { self.t.len() }

    pub fn is_empty(&self) -> bool { self.t.is_empty() }

    /// View of the first channel.
    pub fn p(&self) -> nd::ArrayView1<f64> { self.y.column(0) }

    /// View of the second channel.
    pub fn q(&self) -> nd::ArrayView1<f64> { self.y.column(1) }
}

/// A normalized solution resampled onto a caller-supplied grid.
#[derive(Clone, Debug)]
pub struct Profile {
    /// Grid coordinates.
    pub t: nd::Array1<f64>,
    /// First channel.
    pub p: nd::Array1<f64>,
    /// Second channel.
    pub q: nd::Array1<f64>,
}

/// Shooting solver for a fixed azimuthal order `m`, spin parameter `q`, and
/// [`Parity`].
///
/// [`shoot`][Self::shoot] is the scalar objective for an external root search
/// in the eigenvalue; [`save`][Self::save] and [`interp`][Self::interp]
/// reconstruct the eigenfunction once a root is found.
#[derive(Clone, Debug)]
pub struct ShootingSolver<I = DormandPrince853> {
    m: i32,
    q: f64,
    scorer: Scorer,
    config: Config,
    integrator: I,
}

impl ShootingSolver<DormandPrince853> {
    /// Create a new solver with the default [`Config`] and integrator.
    pub fn new(m: i32, q: f64, parity: Parity) -> Self {
        Self::with_integrator(m, q, parity, DormandPrince853::default())
    }
}

impl<I> ShootingSolver<I>
where I: Integrator
{
    /// Create a new solver using a particular integrator.
    pub fn with_integrator(m: i32, q: f64, parity: Parity, integrator: I)
        -> Self
    {
        Self {
            m,
            q,
            scorer: Scorer::new(parity),
            config: Config::default(),
            integrator,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn m(&self) -> i32 { self.m }

    pub fn q(&self) -> f64 { self.q }

    pub fn parity(&self) -> Parity { self.scorer.parity() }

    pub fn config(&self) -> &Config { &self.config }

    pub fn set_m(&mut self, m: i32) { self.m = m; }

    pub fn set_q(&mut self, q: f64) { self.q = q; }

    pub fn set_parity(&mut self, parity: Parity) {
        self.scorer.set_parity(parity);
    }

    pub fn set_config(&mut self, config: Config) { self.config = config; }

    fn model(&self, lam: f64) -> XResult<LaplaceOde> {
        self.config.check()?;
        let params = ModeParams { m: self.m, q: self.q, lam };
        Ok(LaplaceOde::new(params, self.config.epsilon)?
            .with_seed(self.config.seed))
    }

    fn run<O>(&self, ode: &LaplaceOde, observer: &mut O) -> XResult<State>
    where O: Observer
    {
        let y0 = ode.init_y()?;
        self.integrator.integrate(
            ode, y0, (ode.t0(), self.config.t1), &self.config.tol, observer)
    }

    /// Compute the shooting residual for a trial eigenvalue `lam`.
    ///
    /// This is the parity-selected component of the final state, divided by
    /// the largest magnitude of that component over the whole integration. The
    /// result lies in [-1, 1] and vanishes at eigenvalues of the given parity.
    ///
    /// Fails with [`XError::DegenerateNorm`] if the tracked component is
    /// identically zero. This includes eigenvalues whose eigenfunction makes it
    /// vanish everywhere, e.g. *λ* = 0 for *m* = 0 with even parity, where *P*
    /// is constant and *g* = 0 throughout.
    pub fn shoot(&self, lam: f64) -> XResult<f64> {
        let ode = self.model(lam)?;
        let mut obs = MaxTracker::new(self.scorer.channel());
        let y1 = self.run(&ode, &mut obs)?;
        let max = obs.max();
        if max == 0.0 || !max.is_finite() {
            return Err(XError::DegenerateNorm);
        }
        Ok(self.scorer.score(&y1) / max)
    }

    /// Compute [shooting residuals][Self::shoot] for a series of trial
    /// eigenvalues, failing on the first unusable one.
    pub fn shoot_scan<S>(&self, lams: &Arr1<S>) -> XResult<nd::Array1<f64>>
    where S: nd::Data<Elem = f64>
    {
        lams.iter().map(|lam| self.shoot(*lam)).collect()
    }

    /// Integrate for a trial eigenvalue `lam`, recording every step, and return
    /// the physical amplitudes `[P, Q]` normalized by the extremum of `P`.
    ///
    /// The normalization divisor is the entry of `P` with the largest
    /// magnitude, sign included, so that `P` attains exactly ±1 there.
    pub fn save(&self, lam: f64) -> XResult<Trajectory> {
        let ode = self.model(lam)?;
        let mut obs = TrajectoryRecorder::new();
        self.run(&ode, &mut obs)?;
        let (t, y) = obs.into_arrays();
        let mut py = ode.transform(&t, &y)?;
        let norm = norm_divisor(&py.column(0))?;
        py /= norm;
        Ok(Trajectory { t, y: py })
    }

    /// Compute the [normalized solution][Self::save] for a trial eigenvalue
    /// `lam` and resample both channels onto `steps` via cubic splines.
    ///
    /// Every point of `steps` must lie within [`t1`, `t0`]; otherwise this
    /// fails with an out-of-range [`SplineError`][crate::error::SplineError]
    /// rather than extrapolating.
    pub fn interp<S>(&self, lam: f64, steps: &Arr1<S>) -> XResult<Profile>
    where S: nd::Data<Elem = f64>
    {
        let traj = self.save(lam)?;
        let p_spline = CubicSpline::new(&traj.t, &traj.p())?;
        let q_spline = CubicSpline::new(&traj.t, &traj.q())?;
        if let Some(x) = steps.iter().find(|x| !p_spline.contains(**x)) {
            let (lo, hi) = p_spline.span();
            warn!(
                "solve::interp: requested point {x} lies outside of the \
                computed span [{lo}, {hi}]"
            );
        }
        Ok(Profile {
            t: steps.to_owned(),
            p: p_spline.eval_arr(steps)?,
            q: q_spline.eval_arr(steps)?,
        })
    }

    /// [Interpolate][Self::interp] onto `n` evenly spaced points running from
    /// `t0` down to `t1`.
    pub fn profile(&self, lam: f64, n: usize) -> XResult<Profile> {
        let t0 = self.config.t0();
        let t1 = self.config.t1;
        let mut steps: nd::Array1<f64> = nd::Array1::linspace(t0, t1, n);
        // pin the ends against rounding in the grid spacing
        if n >= 2 {
            steps[0] = t0;
            steps[n - 1] = t1;
        }
        self.interp(lam, &steps)
    }

    /// Compute the [profile][Self::profile] for a trial eigenvalue `lam` and
    /// assemble the associated [`HoughFunctions`].
    pub fn hough(&self, lam: f64, n: usize) -> XResult<HoughFunctions> {
        let profile = self.profile(lam, n)?;
        Ok(HoughFunctions::from_profile(&profile, self.m, self.q))
    }
}
