//! Fixed-timestep RK4 integration of the damped spring equation.
//!
//! The host hands us wall-clock deltas of whatever size its render loop
//! produced. Those are clamped, added to an accumulator, and consumed in
//! uniform sub-steps of [`SOLVER_TIMESTEP`]; leftover time carries to the next
//! call. Each sub-step is one classical fourth-order Runge-Kutta step of
//!
//! ```text
//! x' = v
//! v' = tension * (end - x) - friction * v
//! ```
//!
//! When the elapsed time does not divide evenly into sub-steps, the visible
//! state is blended between the state before the final sub-step and the state
//! after it, weighted by the fraction of a sub-step left in the accumulator.

use crate::config::SpringConfig;

/// Length of one integration sub-step, in seconds.
pub const SOLVER_TIMESTEP: f64 = 0.001;

/// Upper bound on the simulated time a single call may add, in seconds.
///
/// A long stall (dropped frames, a debugger pause) would otherwise be replayed
/// in one burst and visibly jump the animation.
pub const MAX_DELTA_TIME: f64 = 0.064;

/// Position and velocity of a spring at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsState {
    pub position: f64,
    pub velocity: f64,
}

impl PhysicsState {
    /// Creates a state.
    pub const fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }

    /// Blends `self` with `previous`: `self * alpha + previous * (1 - alpha)`.
    pub fn interpolate(self, previous: Self, alpha: f64) -> Self {
        Self {
            position: self.position * alpha + previous.position * (1.0 - alpha),
            velocity: self.velocity * alpha + previous.velocity * (1.0 - alpha),
        }
    }
}

/// One RK4 stage sample: the state derivative `(x', v')`.
#[derive(Debug, Clone, Copy)]
struct Derivative {
    velocity: f64,
    acceleration: f64,
}

impl Derivative {
    fn sample(config: SpringConfig, end_value: f64, state: PhysicsState) -> Self {
        Self {
            velocity: state.velocity,
            acceleration: config.tension * (end_value - state.position)
                - config.friction * state.velocity,
        }
    }
}

/// Summary of one [`Integrator::integrate`] call, used for tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct StepReport {
    pub clamped: bool,
    pub substeps: u32,
    pub interpolated: bool,
}

/// The three physics states of a spring plus its time accumulator.
#[derive(Debug, Clone, Default)]
pub(crate) struct Integrator {
    /// Authoritative, externally visible state.
    pub current: PhysicsState,
    /// Snapshot taken just before the last sub-step of a pass.
    pub previous: PhysicsState,
    /// Scratch state reused by the RK4 stage predictions.
    pub working: PhysicsState,
    /// Simulated time not yet consumed by a sub-step.
    pub accumulator: f64,
}

impl Integrator {
    /// Advances the current state by `real_delta` seconds of wall-clock time.
    ///
    /// Negative deltas count as no elapsed time.
    pub fn integrate(
        &mut self,
        real_delta: f64,
        config: SpringConfig,
        end_value: f64,
    ) -> StepReport {
        let mut report = StepReport::default();

        let delta = if real_delta > MAX_DELTA_TIME {
            report.clamped = true;
            MAX_DELTA_TIME
        } else {
            real_delta.max(0.0)
        };
        self.accumulator += delta;

        let mut state = self.current;
        while self.accumulator >= SOLVER_TIMESTEP {
            self.accumulator -= SOLVER_TIMESTEP;
            if self.accumulator < SOLVER_TIMESTEP {
                // Last sub-step of this call.
                self.previous = state;
            }
            state = self.rk4_step(state, config, end_value, SOLVER_TIMESTEP);
            report.substeps += 1;
        }
        self.current = state;

        // Without a sub-step this call, `previous` belongs to an older pass and
        // blending toward it would move the value backwards.
        if report.substeps > 0 && self.accumulator > 0.0 {
            let alpha = self.accumulator / SOLVER_TIMESTEP;
            self.current = self.current.interpolate(self.previous, alpha);
            report.interpolated = true;
        }

        report
    }

    /// One classical RK4 step of length `h` starting from `state`.
    fn rk4_step(
        &mut self,
        state: PhysicsState,
        config: SpringConfig,
        end_value: f64,
        h: f64,
    ) -> PhysicsState {
        let a = Derivative::sample(config, end_value, state);

        self.working = PhysicsState::new(
            state.position + a.velocity * h * 0.5,
            state.velocity + a.acceleration * h * 0.5,
        );
        let b = Derivative::sample(config, end_value, self.working);

        self.working = PhysicsState::new(
            state.position + b.velocity * h * 0.5,
            state.velocity + b.acceleration * h * 0.5,
        );
        let c = Derivative::sample(config, end_value, self.working);

        self.working = PhysicsState::new(
            state.position + c.velocity * h,
            state.velocity + c.acceleration * h,
        );
        let d = Derivative::sample(config, end_value, self.working);

        let dxdt = (a.velocity + 2.0 * (b.velocity + c.velocity) + d.velocity) / 6.0;
        let dvdt =
            (a.acceleration + 2.0 * (b.acceleration + c.acceleration) + d.acceleration) / 6.0;

        PhysicsState::new(state.position + dxdt * h, state.velocity + dvdt * h)
    }
}
