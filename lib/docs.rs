//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Regularization](#regularization)
//! - [Shooting](#shooting)
//! - [Parity](#parity)
//! - [Normalization](#normalization)
//!
//! # Background
//! In the traditional approximation, small-amplitude waves in a thin, rotating
//! fluid layer separate into a radial part and a latitudinal part. The
//! latitudinal part is governed by the Laplace Tidal Equation (LTE)[^1]; with
//! *μ* = cos(*θ*), azimuthal order *m*, and spin parameter *q* = 2 Ω / *ω* (the
//! ratio of twice the rotation rate to the wave frequency), it can be written
//! as a pair of first-order equations for two amplitudes *P* and *Q*,
//! ```text
//!           dP
//! (1 - μ²) -- = m q μ P + (q² μ² - 1) Q
//!           dμ
//!
//!           dQ
//! (1 - μ²) -- = -m q μ Q + (λ (1 - μ²) - m²) P
//!           dμ
//! ```
//! where *λ* is the eigenvalue. Physical solutions are bounded at both poles
//! *μ* = ±1, which holds only for a discrete set of *λ*. The eigenfunction
//! *P* is the Hough function Θ, and *Q* is its companion Θ̂ (see
//! [`hough`][crate::hough]).
//!
//! With no rotation (*q* = 0), the system reduces to the associated Legendre
//! equation, so that *P* = *P*<sub>*l*</sub><sup>*m*</sup>(*μ*) and *λ* =
//! *l* (*l* + 1) for integer *l* ≥ |*m*|. This limit is the main check on the
//! numerics; see [`legendre_eigenvalue`][crate::legendre_eigenvalue].
//!
//! # Regularization
//! Both equations are singular at *μ* = ±1. Near *μ* = 1, bounded solutions
//! behave like (1 - *μ*²)<sup>|*m*|/2</sup>, so the amplitudes are rescaled as
//! ```text
//! P = (1 - μ²)^α f
//! Q = (1 - μ²)^α g
//! α = |m| / 2
//! ```
//! giving
//! ```text
//!           df
//! (1 - μ²) -- = (2 α μ + m q μ) f + (q² μ² - 1) g
//!           dμ
//!
//!           dg
//! (1 - μ²) -- = λ (1 - μ²) f - (m² f - (2 α μ - m q μ) g)
//!           dμ
//! ```
//! The rescaled pair (*f*, *g*) is smooth at the pole, but the right-hand side
//! still divides by 1 - *μ*². Integration therefore begins at *μ*₀ = 1 - *ε*
//! for a small offset *ε* (`1e-6` by default) rather than at the pole itself.
//!
//! The initial condition at *μ*₀ comes from requiring the left-hand side of the
//! first equation to vanish as 1 - *μ*² → 0, i.e. that *df*/*dμ* remain finite:
//! ```text
//!     (2 α + m q) μ₀
//! g = -------------- f
//!      1 - q² μ₀²
//! ```
//! The value of *f* itself is arbitrary since the problem is linear and
//! homogeneous. Seeding the slope this way, rather than with a generic
//! guess, keeps the starting point on the bounded branch of the solution; the
//! unbounded branch would otherwise grow like (1 - *μ*²)<sup>-|*m*|/2</sup>
//! and swamp the result.
//!
//! # Shooting
//! For a trial *λ*, (*f*, *g*) is integrated from *μ*₀ to the equator *μ* = 0
//! using the adaptive Dormand-Prince 8(5,3) Runge-Kutta method[^2]. The trial
//! value is
//! an eigenvalue when the solution also satisfies the equatorial condition
//! appropriate for its parity (below), so the component that must vanish there
//! serves as the shooting residual. An external root search (e.g.
//! bisection or Brent's method over a bracketing interval) then drives the
//! residual to zero.
//!
//! To make the residual independent of the arbitrary seed amplitude and
//! bounded regardless of how much the solution grows along the way, it is
//! divided by the largest magnitude that the same component attains over the
//! whole integration. The residual hence always lies in [-1, 1].
//!
//! # Parity
//! The LTE is symmetric under *μ* → -*μ*, so eigenfunctions are either even
//! or odd about the equator. An even *P* has vanishing derivative at *μ* = 0,
//! which from the first equation means *Q*(0) = 0; an odd *P* has *P*(0) = 0.
//! Hence
//! - even modes are scored by the second component, *g*(0) (channel 1),
//! - odd modes are scored by the first component, *f*(0) (channel 0).
//!
//! In the Legendre limit, *P*<sub>*l*</sub><sup>*m*</sup> is even when
//! *l* + *m* is even; see [`Parity::from_mode`][crate::score::Parity::from_mode].
//!
//! # Normalization
//! Once an eigenvalue is found, the full trajectory is recorded, transformed
//! back to (*P*, *Q*), and divided by the extremum of *P*: whichever of its
//! maximum and minimum has the larger magnitude, with sign preserved. The
//! normalized *P* then attains exactly ±1. Resampling onto a caller-supplied
//! grid uses not-a-knot cubic splines through the recorded steps and is
//! refused for points outside of [0, *μ*₀].
//!
//! For comparison with tabulated results, the Hough functions may further be
//! normalized following Townsend[^3], dividing by Θ(0) for even meridional
//! index *k* and by -Θ̂(0) for odd *k*.
//!
//! [^1]: M. S. Longuet-Higgins, "The eigenfunctions of Laplace's tidal
//! equations over a sphere." Philosophical Transactions of the Royal Society
//! of London A **262** 1132 511-607 (1968).
//!
//! [^2]: E. Hairer, S. P. Nørsett, and G. Wanner, *Solving Ordinary
//! Differential Equations I: Nonstiff Problems*, 2nd ed. Springer (1993),
//! section II.10.
//!
//! [^3]: R. H. D. Townsend, "Asymptotic expressions for the angular dependence
//! of low-frequency pulsation modes in rotating stars." Monthly Notices of the
//! Royal Astronomical Society **340** 3 1020-1030 (2003).

