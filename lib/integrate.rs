//! Adaptive explicit Runge-Kutta integration with step observers.
//!
//! The default integrator drives the Dormand-Prince 8(5,3) method of Hairer,
//! Nørsett, and Wanner[^1] as implemented by [`ode_solvers::Dop853`], handing
//! every accepted step to an [`Observer`].
//!
//! [^1]: E. Hairer, S. P. Nørsett, and G. Wanner, *Solving Ordinary
//! Differential Equations I: Nonstiff Problems*, 2nd ed. Springer (1993).

use std::cell::{ Cell, RefCell };
use log::debug;
use ode_solvers::{
    dop_shared::{ IntegrationError as DopError, OutputType },
    SVector,
    System,
};
use crate::{
    error::{ IntegrationError, XError },
    observe::Observer,
    ode::{ OdeSystem, State },
    solve::XResult,
    DEF_ATOL,
    DEF_MAXSTEPS,
    DEF_RTOL,
};

type Vector2 = SVector<f64, 2>;

/// Error tolerances and step budget for a single integration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tolerances {
    /// Absolute tolerance (default: `0`).
    pub atol: f64,
    /// Relative tolerance (default: `2^-30`).
    pub rtol: f64,
    /// Maximum number of steps, accepted or rejected (default: `2000`).
    pub maxsteps: usize,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { atol: DEF_ATOL, rtol: DEF_RTOL, maxsteps: DEF_MAXSTEPS }
    }
}

impl Tolerances {
    pub(crate) fn check(&self) -> XResult<()> {
        XError::check_tolerances(self.atol, self.rtol)?;
        XError::check_maxsteps(self.maxsteps)?;
        Ok(())
    }

    // RMS norm of `v` weighted per component by atol + rtol * |y|
    //
    // a component whose weight vanishes (exactly zero state with atol = 0) is
    // weighted by the magnitude of the whole state instead
    fn norm(&self, v: &State, y: &State) -> f64 {
        let ymax = y.iter().fold(0.0_f64, |acc, yk| acc.max(yk.abs()));
        let sum: f64
            = v.iter().zip(y)
            .map(|(vk, yk)| {
                if *vk == 0.0 { return 0.0; }
                let sk = self.atol + self.rtol * yk.abs();
                let sk = if sk > 0.0 { sk } else { self.atol + self.rtol * ymax };
                (vk / sk).powi(2)
            })
            .sum();
        (sum / v.len() as f64).sqrt()
    }
}

/// An adaptive initial-value integrator.
pub trait Integrator {
    /// Integrate `system` from `(t_bounds.0, y0)` to `t_bounds.1`, calling
    /// `observer` on the initial point and after every accepted step, and
    /// return the final state.
    ///
    /// The final observed coordinate is exactly `t_bounds.1`.
    fn integrate<F, O>(
        &self,
        system: &F,
        y0: State,
        t_bounds: (f64, f64),
        tol: &Tolerances,
        observer: &mut O,
    ) -> XResult<State>
    where
        F: OdeSystem,
        O: Observer;
}

/// Dormand-Prince 8(5,3) adaptive integrator.
///
/// The step size controller parameters are passed through to
/// [`ode_solvers::Dop853`]; the defaults are those of the reference Fortran
/// code.
#[derive(Copy, Clone, Debug)]
pub struct DormandPrince853 {
    /// Safety factor on the optimal step size (default: `0.9`).
    pub safety: f64,
    /// Step size stabilization exponent (default: `0`).
    pub beta: f64,
    /// Smallest allowed step size ratio between consecutive steps (default:
    /// `0.333`).
    pub fac_min: f64,
    /// Largest allowed step size ratio between consecutive steps (default:
    /// `6`).
    pub fac_max: f64,
    /// Number of accepted steps between stiffness checks (default: `1000`).
    pub n_stiff: u32,
}

impl Default for DormandPrince853 {
    fn default() -> Self {
        Self { safety: 0.9, beta: 0.0, fac_min: 0.333, fac_max: 6.0, n_stiff: 1000 }
    }
}

fn is_finite(y: &State) -> bool { y.iter().all(|yk| yk.is_finite()) }

// starting step size estimate following Hairer, Nørsett, and Wanner, section
// II.4
//
// the stepper's own estimate divides by atol + rtol * |y| and so cannot be used
// with atol = 0 and a state component that starts at exactly zero
fn initial_step<F>(
    system: &F,
    t: f64,
    y: &State,
    f0: &State,
    t1: f64,
    tol: &Tolerances,
) -> XResult<f64>
where F: OdeSystem
{
    let dir = (t1 - t).signum();
    let span = (t1 - t).abs();
    let d0 = tol.norm(y, y);
    let d1 = tol.norm(f0, y);
    let h0
        = if d0 < 1e-10 || d1 < 1e-10 { 1e-6 } else { 0.01 * d0 / d1 }
        .min(span);
    let y1 = [y[0] + dir * h0 * f0[0], y[1] + dir * h0 * f0[1]];
    let f1 = system.rhs(t + dir * h0, &y1)?;
    let df = [f1[0] - f0[0], f1[1] - f0[1]];
    let d2 = tol.norm(&df, y) / h0;
    let dmax = d1.max(d2);
    let h1
        = if dmax <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / dmax).powf(1.0 / 8.0)
        };
    Ok((100.0 * h0).min(h1).min(span))
}

// adapts an `OdeSystem` and an `Observer` to the stepper's callbacks
//
// errors raised inside the callbacks are parked in `failure` and halt the
// stepper at its next accepted step
struct Stepper<'a, F, O> {
    system: &'a F,
    observer: &'a mut O,
    t_bounds: (f64, f64),
    failure: &'a RefCell<Option<XError>>,
    last: &'a Cell<State>,
}

impl<F, O> Stepper<'_, F, O> {
    fn fail(&self, err: XError) {
        let mut failure = self.failure.borrow_mut();
        if failure.is_none() { *failure = Some(err); }
    }

    // snap the final coordinate onto the target against rounding in the last
    // step
    fn snap(&self, t: f64) -> f64 {
        let (t0, t1) = self.t_bounds;
        let slack = 16.0 * f64::EPSILON * t0.abs().max(t1.abs());
        if (t - t1).abs() <= slack { t1 } else { t }
    }
}

impl<F, O> System<f64, Vector2> for Stepper<'_, F, O>
where
    F: OdeSystem,
    O: Observer,
{
    fn system(&self, t: f64, y: &Vector2, dy: &mut Vector2) {
        match self.system.rhs(t, &[y[0], y[1]]) {
            Ok(f) => { *dy = Vector2::from(f); }
            Err(err) => {
                self.fail(err);
                *dy = Vector2::from_element(f64::NAN);
            }
        }
    }

    fn solout(&mut self, t: f64, y: &Vector2, _dy: &Vector2) -> bool {
        if self.failure.borrow().is_some() { return true; }
        // the initial point is observed before stepping begins
        if t == self.t_bounds.0 { return false; }
        let y: State = [y[0], y[1]];
        if !is_finite(&y) {
            self.fail(IntegrationError::NonFinite { t }.into());
            return true;
        }
        let t = self.snap(t);
        self.observer.observe(t, &y);
        self.last.set(y);
        false
    }
}

impl Integrator for DormandPrince853 {
    fn integrate<F, O>(
        &self,
        system: &F,
        y0: State,
        t_bounds: (f64, f64),
        tol: &Tolerances,
        observer: &mut O,
    ) -> XResult<State>
    where
        F: OdeSystem,
        O: Observer,
    {
        tol.check()?;
        let (t0, t1) = t_bounds;
        if !is_finite(&y0) {
            return Err(IntegrationError::NonFinite { t: t0 }.into());
        }
        observer.observe(t0, &y0);
        if t0 == t1 { return Ok(y0); }

        let f0 = system.rhs(t0, &y0)?;
        let h = (t1 - t0).signum() * initial_step(system, t0, &y0, &f0, t1, tol)?;
        let failure: RefCell<Option<XError>> = RefCell::new(None);
        let last: Cell<State> = Cell::new(y0);
        let stepper = Stepper {
            system,
            observer,
            t_bounds,
            failure: &failure,
            last: &last,
        };
        let n_max = u32::try_from(tol.maxsteps).unwrap_or(u32::MAX);
        // the stepper weights errors by atol + rtol * |y|; a floor on atol
        // keeps an identically zero component from contributing 0 / 0
        let atol = tol.atol.max(f64::MIN_POSITIVE);
        let mut dop = ode_solvers::Dop853::from_param(
            stepper,
            t0,
            t1,
            0.0,
            Vector2::from(y0),
            tol.rtol,
            atol,
            self.safety,
            self.beta,
            self.fac_min,
            self.fac_max,
            (t1 - t0).abs(),
            h,
            n_max,
            self.n_stiff,
            OutputType::Sparse,
        );
        let res = dop.integrate();
        if let Some(err) = failure.take() {
            debug!("integration stopped: {err}");
            return Err(err);
        }
        let stats
            = res.map_err(|err| {
                let err = match err {
                    DopError::MaxNumStepReached { x, .. } =>
                        IntegrationError::StepBudget {
                            maxsteps: tol.maxsteps,
                            t: x,
                        },
                    DopError::StepSizeUnderflow { x } =>
                        IntegrationError::StepSizeUnderflow { t: x },
                    DopError::StiffnessDetected { x } =>
                        IntegrationError::Stiff { t: x },
                };
                debug!("integration stopped: {err}");
                XError::from(err)
            })?;
        debug!(
            "integrated from t = {t0} to t = {t1}: {} evaluations, \
            {} accepted, {} rejected",
            stats.num_eval, stats.accepted_steps, stats.rejected_steps,
        );
        Ok(last.get())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use crate::observe::TrajectoryRecorder;
    use super::*;

    struct Oscillator;

    impl OdeSystem for Oscillator {
        fn rhs(&self, _t: f64, y: &State) -> XResult<State> {
            Ok([y[1], -y[0]])
        }
    }

    struct Blowup;

    impl OdeSystem for Blowup {
        fn rhs(&self, _t: f64, y: &State) -> XResult<State> {
            Ok([y[0] * y[0], 1.0])
        }
    }

    struct Growth;

    impl OdeSystem for Growth {
        fn rhs(&self, _t: f64, y: &State) -> XResult<State> {
            Ok([y[0], 0.0])
        }
    }

    // fails past t = 0.5
    struct Wall;

    impl OdeSystem for Wall {
        fn rhs(&self, t: f64, _y: &State) -> XResult<State> {
            if t > 0.5 {
                Err(XError::Singularity { t, denom: 0.0 })
            } else {
                Ok([1.0, 1.0])
            }
        }
    }

    #[test]
    fn harmonic_oscillator_backward() {
        let mut obs = TrajectoryRecorder::new();
        let tol = Tolerances::default();
        let y = DormandPrince853::default()
            .integrate(&Oscillator, [1.0, 0.0], (2.0, 0.0), &tol, &mut obs)
            .unwrap();
        // y(t) = [cos(t - 2), -sin(t - 2)]
        assert_relative_eq!(y[0], 2.0_f64.cos(), epsilon = 1e-7);
        assert_relative_eq!(y[1], 2.0_f64.sin(), epsilon = 1e-7);
        let t = obs.steps();
        assert_eq!(t[0], 2.0);
        assert_eq!(*t.last().unwrap(), 0.0);
        assert!(t.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(*obs.solun().last().unwrap(), y);
    }

    #[test]
    fn initial_step_with_zero_component() {
        let tol = Tolerances::default();
        let y = [1.0, 0.0];
        let f0 = Oscillator.rhs(2.0, &y).unwrap();
        let h = initial_step(&Oscillator, 2.0, &y, &f0, 0.0, &tol).unwrap();
        assert!(h.is_finite() && h > 0.0 && h <= 2.0);
    }

    #[test]
    fn zero_state_stays_zero() {
        let mut obs = TrajectoryRecorder::new();
        let y = DormandPrince853::default()
            .integrate(
                &Oscillator, [0.0, 0.0], (1.0, 0.0),
                &Tolerances::default(), &mut obs,
            )
            .unwrap();
        assert_eq!(y, [0.0, 0.0]);
        assert_eq!(*obs.steps().last().unwrap(), 0.0);
        assert!(obs.solun().iter().all(|yk| *yk == [0.0, 0.0]));
    }

    // second component is identically zero throughout
    #[test]
    fn zero_component_with_zero_atol() {
        let mut obs = TrajectoryRecorder::new();
        let y = DormandPrince853::default()
            .integrate(
                &Growth, [1.0, 0.0], (0.0, 1.0),
                &Tolerances::default(), &mut obs,
            )
            .unwrap();
        assert_relative_eq!(y[0], 1.0_f64.exp(), max_relative = 1e-7);
        assert_eq!(y[1], 0.0);
    }

    #[test]
    fn step_budget() {
        let tol = Tolerances { maxsteps: 3, ..Tolerances::default() };
        let res = DormandPrince853::default()
            .integrate(
                &Oscillator, [1.0, 0.0], (0.0, 100.0), &tol,
                &mut |_: f64, _: &State| { },
            );
        assert!(matches!(
            res,
            Err(XError::Integration(IntegrationError::StepBudget { maxsteps: 3, .. }))
        ));
    }

    // y' = y², y(0) = 1 blows up at t = 1
    #[test]
    fn finite_time_blowup() {
        let res = DormandPrince853::default()
            .integrate(
                &Blowup, [1.0, 0.0], (0.0, 2.0), &Tolerances::default(),
                &mut |_: f64, _: &State| { },
            );
        assert!(matches!(res, Err(err) if err.is_numerical()));
    }

    #[test]
    fn rhs_errors_propagate() {
        let res = DormandPrince853::default()
            .integrate(
                &Wall, [1.0, 1.0], (0.0, 1.0), &Tolerances::default(),
                &mut |_: f64, _: &State| { },
            );
        assert!(matches!(res, Err(XError::Singularity { .. })));
    }

    #[test]
    fn bad_tolerances() {
        let tol = Tolerances { rtol: 0.0, ..Tolerances::default() };
        let res = DormandPrince853::default()
            .integrate(
                &Oscillator, [1.0, 0.0], (0.0, 1.0), &tol,
                &mut |_: f64, _: &State| { },
            );
        assert!(matches!(res, Err(XError::BadTolerance(_))));
    }
}
