//! The spring aggregate: targets, rest detection, and notifications.
//!
//! A [`Spring`] moves a scalar from its start value toward its end value. The
//! host calls [`Spring::advance`] once per frame with the elapsed wall-clock
//! time; the spring integrates in fixed sub-steps, snaps to its target once it
//! is within the rest thresholds, and notifies its listeners.
//!
//! # Example
//!
//! ```rust
//! use recoil::{Spring, SpringConfig};
//!
//! let mut spring = Spring::new(SpringConfig::new(50.0, 10.0));
//! spring.set_end_value(1.0);
//!
//! // Three seconds at 60 FPS.
//! for _ in 0..180 {
//!     spring.advance(1.0 / 60.0);
//! }
//!
//! assert!(spring.is_at_rest());
//! assert_eq!(spring.current_value(), 1.0);
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::{SpringConfig, check_threshold};
use crate::error::{Error, Result};
use crate::integrator::{Integrator, PhysicsState};
use crate::listener::{ListenerId, Listeners, Notification, SpringListener};
use crate::phase::Phase;

/// Default speed and displacement below which a spring counts as at rest.
pub const DEFAULT_REST_THRESHOLD: f64 = 0.001;

/// A damped harmonic oscillator driven by a host frame loop.
///
/// A new spring rests at `0.0`. Every setter may be called at any time,
/// including mid-flight; changes take effect on the next [`advance`].
///
/// [`advance`]: Spring::advance
#[derive(Debug)]
pub struct Spring {
    config: SpringConfig,
    integrator: Integrator,
    start_value: f64,
    end_value: f64,
    rest_speed_threshold: f64,
    rest_displacement_threshold: f64,
    overshoot_clamping: bool,
    phase: Phase,
    listeners: Listeners,
}

impl Default for Spring {
    fn default() -> Self {
        Self::new(SpringConfig::default())
    }
}

impl Spring {
    /// Creates a spring at rest at `0.0`.
    pub fn new(config: SpringConfig) -> Self {
        Self {
            config,
            integrator: Integrator::default(),
            start_value: 0.0,
            end_value: 0.0,
            rest_speed_threshold: DEFAULT_REST_THRESHOLD,
            rest_displacement_threshold: DEFAULT_REST_THRESHOLD,
            overshoot_clamping: false,
            phase: Phase::Resting,
            listeners: Listeners::default(),
        }
    }

    /// Returns a builder for a spring with validated settings.
    pub fn builder() -> SpringBuilder {
        SpringBuilder::new()
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Replaces the physical parameters.
    pub fn set_config(&mut self, config: SpringConfig) -> &mut Self {
        if config != self.config {
            debug!(
                spring.tension = config.tension,
                spring.friction = config.friction,
                "Spring config changed"
            );
        }
        self.config = config;
        self
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn set_rest_speed_threshold(&mut self, threshold: f64) -> &mut Self {
        self.rest_speed_threshold = threshold;
        self
    }

    pub fn rest_speed_threshold(&self) -> f64 {
        self.rest_speed_threshold
    }

    pub fn set_rest_displacement_threshold(&mut self, threshold: f64) -> &mut Self {
        self.rest_displacement_threshold = threshold;
        self
    }

    pub fn rest_displacement_threshold(&self) -> f64 {
        self.rest_displacement_threshold
    }

    /// When enabled, a spring that crosses its target is snapped onto it and
    /// halted instead of oscillating back.
    pub fn set_overshoot_clamping(&mut self, enabled: bool) -> &mut Self {
        self.overshoot_clamping = enabled;
        self
    }

    pub fn is_overshoot_clamping_enabled(&self) -> bool {
        self.overshoot_clamping
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    /// Teleports the spring to `value` and brings it to rest there.
    ///
    /// Listeners receive `on_update` immediately, before the spring is put at
    /// rest. No `on_at_rest` is sent.
    pub fn set_current_value(&mut self, value: f64) -> &mut Self {
        self.place(value);
        self.set_at_rest()
    }

    /// Teleports the spring to `value` keeping its velocity and end value, so
    /// it continues moving from there on the next [`advance`](Spring::advance).
    pub fn set_current_value_keep_motion(&mut self, value: f64) -> &mut Self {
        self.place(value);
        self
    }

    fn place(&mut self, value: f64) {
        self.start_value = value;
        self.integrator.current.position = value;
        self.listeners.notify(self, Notification::Update);
    }

    pub fn current_value(&self) -> f64 {
        self.integrator.current.position
    }

    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    /// Sets the target.
    ///
    /// Does nothing if `value` is already the target and the spring is at
    /// rest. Otherwise the motion restarts from the current value; calling
    /// this mid-flight with the unchanged target still resets the start value
    /// (and so the overshoot direction) without touching velocity.
    pub fn set_end_value(&mut self, value: f64) -> &mut Self {
        if self.end_value == value && self.is_at_rest() {
            return self;
        }
        trace!(
            spring.from = self.current_value(),
            spring.to = value,
            "Spring end value set"
        );
        self.start_value = self.current_value();
        self.end_value = value;
        self
    }

    pub fn end_value(&self) -> f64 {
        self.end_value
    }

    /// Overwrites the velocity without moving the spring, e.g. to hand over a
    /// fling from a gesture.
    pub fn set_velocity(&mut self, velocity: f64) -> &mut Self {
        if velocity != self.integrator.current.velocity {
            self.integrator.current.velocity = velocity;
        }
        self
    }

    pub fn velocity(&self) -> f64 {
        self.integrator.current.velocity
    }

    /// Current position and velocity.
    pub fn state(&self) -> PhysicsState {
        self.integrator.current
    }

    /// `|end_value - current_value|`.
    pub fn current_displacement_distance(&self) -> f64 {
        (self.end_value - self.current_value()).abs()
    }

    /// Whether the current value is within the rest displacement threshold of
    /// `value`.
    pub fn current_value_is_approximately(&self, value: f64) -> bool {
        (self.current_value() - value).abs() <= self.rest_displacement_threshold
    }

    // ------------------------------------------------------------------
    // Rest
    // ------------------------------------------------------------------

    /// Whether speed and displacement are both within their thresholds.
    ///
    /// A spring without tension has no target to measure displacement
    /// against, so its speed alone decides.
    pub fn is_at_rest(&self) -> bool {
        self.velocity().abs() <= self.rest_speed_threshold
            && (self.current_displacement_distance() <= self.rest_displacement_threshold
                || self.config.tension == 0.0)
    }

    /// Whether the previous [`advance`](Spring::advance) ended at rest.
    pub fn was_at_rest(&self) -> bool {
        self.phase.is_resting()
    }

    /// Latched phase from the previous [`advance`](Spring::advance).
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the spring has crossed its target in the direction of travel.
    pub fn is_overshooting(&self) -> bool {
        let current = self.current_value();
        self.config.tension > 0.0
            && ((self.start_value < self.end_value && current > self.end_value)
                || (self.start_value > self.end_value && current < self.end_value))
    }

    /// Collapses the target onto the current value and zeroes velocity,
    /// without notifying listeners.
    pub fn set_at_rest(&mut self) -> &mut Self {
        let position = self.current_value();
        self.end_value = position;
        self.start_value = position;
        self.integrator.working.position = position;
        self.integrator.current.velocity = 0.0;
        self
    }

    // ------------------------------------------------------------------
    // Integration
    // ------------------------------------------------------------------

    /// Advances the simulation by `real_delta` seconds of wall-clock time.
    /// Deltas above [`MAX_DELTA_TIME`](crate::MAX_DELTA_TIME) are clamped and
    /// negative ones count as zero.
    ///
    /// Does nothing while the spring is at rest and the previous call also
    /// ended at rest. Otherwise every listener receives `on_update`, followed
    /// by `on_at_rest` when this call brought the spring to rest.
    pub fn advance(&mut self, real_delta: f64) {
        if self.is_at_rest() && self.phase.is_resting() {
            return;
        }

        let report = self
            .integrator
            .integrate(real_delta, self.config, self.end_value);
        if report.clamped {
            debug!(spring.delta = real_delta, "Spring delta clamped");
        }
        trace!(
            spring.delta = real_delta,
            spring.substeps = report.substeps,
            spring.interpolated = report.interpolated,
            spring.value = self.current_value(),
            spring.velocity = self.velocity(),
            "Spring advanced"
        );

        let mut at_rest = self.is_at_rest();
        if at_rest || (self.overshoot_clamping && self.is_overshooting()) {
            self.snap();
            at_rest = true;
        }

        let (phase, edges) = self.phase.settle(at_rest);
        self.phase = phase;
        if edges.activated {
            debug!(
                spring.value = self.current_value(),
                spring.target = self.end_value,
                "Spring activated"
            );
        }

        let notification = if edges.came_to_rest {
            debug!(spring.value = self.current_value(), "Spring came to rest");
            Notification::UpdateAndRest
        } else {
            Notification::Update
        };
        self.listeners.notify(self, notification);
    }

    /// Pins the spring to its resting value without notifying.
    fn snap(&mut self) {
        if self.config.tension > 0.0 {
            self.start_value = self.end_value;
            self.integrator.current.position = self.end_value;
        } else {
            // No restoring force: freeze the target where motion stopped.
            self.end_value = self.current_value();
            self.start_value = self.end_value;
        }
        self.integrator.current.velocity = 0.0;
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Registers a listener. Registering the same `Arc` twice returns the
    /// original id.
    pub fn add_listener(&self, listener: Arc<dyn SpringListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn remove_all_listeners(&self) {
        self.listeners.clear();
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Validating builder for [`Spring`].
///
/// ```rust
/// use recoil::{Spring, SpringConfig};
///
/// let spring = Spring::builder()
///     .config(SpringConfig::from_legacy_units(40.0, 5.0))
///     .overshoot_clamping(true)
///     .start_value(10.0)
///     .build()
///     .unwrap();
/// assert_eq!(spring.current_value(), 10.0);
///
/// assert!(Spring::builder().build().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SpringBuilder {
    config: Option<SpringConfig>,
    rest_speed_threshold: f64,
    rest_displacement_threshold: f64,
    overshoot_clamping: bool,
    start_value: f64,
}

impl Default for SpringBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpringBuilder {
    /// A builder with default thresholds and no configuration.
    pub fn new() -> Self {
        Self {
            config: None,
            rest_speed_threshold: DEFAULT_REST_THRESHOLD,
            rest_displacement_threshold: DEFAULT_REST_THRESHOLD,
            overshoot_clamping: false,
            start_value: 0.0,
        }
    }

    pub fn config(mut self, config: SpringConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn rest_speed_threshold(mut self, threshold: f64) -> Self {
        self.rest_speed_threshold = threshold;
        self
    }

    pub fn rest_displacement_threshold(mut self, threshold: f64) -> Self {
        self.rest_displacement_threshold = threshold;
        self
    }

    pub fn overshoot_clamping(mut self, enabled: bool) -> Self {
        self.overshoot_clamping = enabled;
        self
    }

    /// Value the spring starts at rest on.
    pub fn start_value(mut self, value: f64) -> Self {
        self.start_value = value;
        self
    }

    /// Builds the spring.
    ///
    /// # Errors
    ///
    /// [`Error::MissingConfig`] if no configuration was given, and
    /// [`Error::InvalidThreshold`] for a negative or NaN threshold.
    pub fn build(self) -> Result<Spring> {
        let config = self.config.ok_or(Error::MissingConfig)?;
        check_threshold("rest_speed_threshold", self.rest_speed_threshold)?;
        check_threshold(
            "rest_displacement_threshold",
            self.rest_displacement_threshold,
        )?;

        let mut spring = Spring::new(config);
        spring.rest_speed_threshold = self.rest_speed_threshold;
        spring.rest_displacement_threshold = self.rest_displacement_threshold;
        spring.overshoot_clamping = self.overshoot_clamping;
        spring.start_value = self.start_value;
        spring.end_value = self.start_value;
        spring.integrator.current.position = self.start_value;
        spring.integrator.working.position = self.start_value;
        Ok(spring)
    }
}
