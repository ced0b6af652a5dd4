//! Step observers invoked by an [`Integrator`][crate::integrate::Integrator]
//! on the initial point and after every accepted step.

use ndarray as nd;
use crate::ode::State;

/// Receives `(t, y)` after each accepted integration step.
pub trait Observer {
    fn observe(&mut self, t: f64, y: &State);
}

impl<F> Observer for F
where F: FnMut(f64, &State)
{
    fn observe(&mut self, t: f64, y: &State) { self(t, y) }
}

/// Tracks the running maximum of |`y[channel]`|.
#[derive(Copy, Clone, Debug)]
pub struct MaxTracker {
    channel: usize,
    max: f64,
}

impl MaxTracker {
    /// Create a new tracker for a given component of the state.
    ///
    /// *Panics if `channel` is not 0 or 1*.
    pub fn new(channel: usize) -> Self {
        assert!(channel < 2, "state channel must be 0 or 1; got {channel}");
        Self { channel, max: 0.0 }
    }

    /// Observed component index.
    pub fn channel(&self) -> usize { self.channel }

    /// Largest absolute value seen so far.
    pub fn max(&self) -> f64 { self.max }
}

impl Observer for MaxTracker {
    fn observe(&mut self, _t: f64, y: &State) {
        self.max = self.max.max(y[self.channel].abs());
    }
}

/// Records every observed point in step order.
#[derive(Clone, Debug, Default)]
pub struct TrajectoryRecorder {
    t: Vec<f64>,
    y: Vec<State>,
}

impl TrajectoryRecorder {
    pub fn new() -> Self { Self::default() }

    /// Number of recorded points.
    pub fn len(&self) -> usize { self.t.len() }

    pub fn is_empty(&self) -> bool { self.t.is_empty() }

    /// Recorded coordinates.
    pub fn steps(&self) -> &[f64] { &self.t }

    /// Recorded states.
    pub fn solun(&self) -> &[State] { &self.y }

    /// Consume `self`, returning the coordinates as a 1D array and the states
    /// as a 2D array of shape `(n, 2)`.
    pub fn into_arrays(self) -> (nd::Array1<f64>, nd::Array2<f64>) {
        let t = nd::Array1::from_vec(self.t);
        let y = nd::arr2(&self.y);
        (t, y)
    }
}

impl Observer for TrajectoryRecorder {
    fn observe(&mut self, t: f64, y: &State) {
        self.t.push(t);
        self.y.push(*y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_tracker_uses_magnitude() {
        let mut obs = MaxTracker::new(1);
        obs.observe(0.9, &[10.0, -3.0]);
        obs.observe(0.5, &[20.0, 2.0]);
        obs.observe(0.1, &[-50.0, -1.0]);
        assert_eq!(obs.max(), 3.0);
        assert_eq!(obs.channel(), 1);
    }

    #[test]
    fn recorder_keeps_order() {
        let mut obs = TrajectoryRecorder::new();
        obs.observe(0.9, &[1.0, 2.0]);
        obs.observe(0.5, &[3.0, 4.0]);
        assert_eq!(obs.len(), 2);
        assert_eq!(obs.steps(), &[0.9, 0.5]);
        let (t, y) = obs.into_arrays();
        assert_eq!(t, nd::array![0.9, 0.5]);
        assert_eq!(y, nd::array![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn closures_observe() {
        let mut count = 0;
        let mut obs = |_: f64, _: &State| { count += 1; };
        obs.observe(0.0, &[0.0, 0.0]);
        obs.observe(0.0, &[0.0, 0.0]);
        assert_eq!(count, 2);
    }
}
