//! Host-side driver that ticks a spring only while it moves.
//!
//! [`SpringAnimator`] is the glue between a frame source and a [`Spring`]:
//! changing the target or velocity starts it, each frame it forwards the
//! elapsed time, and it stops itself once the spring has settled so an idle
//! animation does not keep consuming frames.
//!
//! ```rust
//! use std::time::Duration;
//! use recoil::{SpringAnimator, SpringConfig};
//!
//! let mut animator = SpringAnimator::new(SpringConfig::new(50.0, 10.0));
//! animator.set_end_value(1.0);
//! assert!(animator.is_running());
//!
//! let frames = animator.run_until_rest(Duration::from_millis(16), 1_000);
//! assert!(frames > 0);
//! assert!(!animator.is_running());
//! assert_eq!(animator.spring().current_value(), 1.0);
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::SpringConfig;
use crate::listener::{ListenerId, SpringListener};
use crate::spring::Spring;

/// Drives a [`Spring`] from host frame ticks.
#[derive(Debug)]
pub struct SpringAnimator {
    spring: Spring,
    running: bool,
}

impl Default for SpringAnimator {
    fn default() -> Self {
        Self::new(SpringConfig::default())
    }
}

impl SpringAnimator {
    /// Creates a stopped animator around a fresh spring.
    pub fn new(config: SpringConfig) -> Self {
        Self::from_spring(Spring::new(config))
    }

    /// Wraps an existing spring. The animator starts stopped.
    pub fn from_spring(spring: Spring) -> Self {
        Self {
            spring,
            running: false,
        }
    }

    pub fn spring(&self) -> &Spring {
        &self.spring
    }

    /// Mutable access for settings the animator does not forward. Changes made
    /// here do not start the animator.
    pub fn spring_mut(&mut self) -> &mut Spring {
        &mut self.spring
    }

    pub fn into_spring(self) -> Spring {
        self.spring
    }

    pub fn set_config(&mut self, config: SpringConfig) {
        self.spring.set_config(config);
    }

    pub fn config(&self) -> SpringConfig {
        self.spring.config()
    }

    /// Teleports the spring to `value` and brings it to rest.
    pub fn set_current_value(&mut self, value: f64) {
        self.spring.set_current_value(value);
    }

    pub fn current_value(&self) -> f64 {
        self.spring.current_value()
    }

    /// Sets the target, starting the animator if the spring leaves rest.
    pub fn set_end_value(&mut self, value: f64) {
        self.spring.set_end_value(value);
        if !self.spring.is_at_rest() {
            self.start();
        }
    }

    pub fn end_value(&self) -> f64 {
        self.spring.end_value()
    }

    /// Sets the velocity, starting the animator if the spring leaves rest.
    pub fn set_velocity(&mut self, velocity: f64) {
        self.spring.set_velocity(velocity);
        if !self.spring.is_at_rest() {
            self.start();
        }
    }

    pub fn velocity(&self) -> f64 {
        self.spring.velocity()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            debug!(
                spring.target = self.spring.end_value(),
                "Spring animator started"
            );
            self.running = true;
        }
    }

    pub fn cancel(&mut self) {
        if self.running {
            debug!(
                spring.value = self.spring.current_value(),
                "Spring animator stopped"
            );
            self.running = false;
        }
    }

    /// Handles one host frame.
    ///
    /// Returns `true` if the spring was advanced. A settled spring (at rest
    /// now and at the end of the previous advance) stops the animator instead.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.running {
            return false;
        }
        if self.spring.is_at_rest() && self.spring.was_at_rest() {
            self.cancel();
            return false;
        }
        self.spring.advance(delta.as_secs_f64());
        true
    }

    /// Ticks with a fixed frame length until the animator stops or
    /// `max_frames` frames have been advanced. Returns the number of frames
    /// advanced.
    pub fn run_until_rest(&mut self, frame: Duration, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.tick(frame) {
            frames += 1;
        }
        if self.running {
            info!(
                spring.frames = frames,
                spring.value = self.spring.current_value(),
                "Spring still moving after frame budget"
            );
        }
        frames
    }

    pub fn add_listener(&self, listener: Arc<dyn SpringListener>) -> ListenerId {
        self.spring.add_listener(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.spring.remove_listener(id)
    }

    pub fn remove_all_listeners(&self) {
        self.spring.remove_all_listeners();
    }
}
