#![forbid(unsafe_code)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

//! # Recoil
//!
//! A damped-spring simulator for driving animations from a host frame loop.
//!
//! Recoil provides:
//! - **Spring**: a fixed-timestep RK4 integrator that moves a value toward a
//!   target with physically plausible overshoot and settling, detects rest,
//!   and notifies listeners
//! - **SpringConfig**: tension/friction tuning, with conversion from the
//!   legacy tension/friction index used by design tools
//! - **SpringAnimator**: a host-side driver that ticks a spring only while it
//!   is moving
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use recoil::{Spring, SpringConfig, SpringListener};
//!
//! struct Printer;
//!
//! impl SpringListener for Printer {
//!     fn on_at_rest(&self, spring: &Spring) {
//!         println!("settled at {}", spring.current_value());
//!     }
//! }
//!
//! let mut spring = Spring::new(SpringConfig::from_legacy_units(40.0, 7.0));
//! spring.add_listener(Arc::new(Printer));
//! spring.set_end_value(100.0);
//!
//! while !(spring.is_at_rest() && spring.was_at_rest()) {
//!     spring.advance(1.0 / 60.0);
//! }
//! assert_eq!(spring.current_value(), 100.0);
//! ```
//!
//! ## Timing
//!
//! Hosts pass wall-clock deltas of any size. Each call simulates at most
//! [`MAX_DELTA_TIME`] seconds, in sub-steps of [`SOLVER_TIMESTEP`], carrying
//! leftover time to the next call.

mod animator;
mod config;
mod error;
mod integrator;
mod listener;
mod phase;
mod spring;

pub use animator::SpringAnimator;
pub use config::{
    DEFAULT_LEGACY_FRICTION, DEFAULT_LEGACY_TENSION, SpringConfig, SpringSettings,
    friction_from_legacy, legacy_friction_from_friction, legacy_tension_from_tension,
    tension_from_legacy,
};
pub use error::{Error, Result};
pub use integrator::{MAX_DELTA_TIME, PhysicsState, SOLVER_TIMESTEP};
pub use listener::{ListenerId, SpringListener};
pub use phase::{Edges, Phase};
pub use spring::{DEFAULT_REST_THRESHOLD, Spring, SpringBuilder};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::animator::SpringAnimator;
    pub use crate::config::{SpringConfig, SpringSettings};
    pub use crate::listener::{ListenerId, SpringListener};
    pub use crate::spring::{Spring, SpringBuilder};
}
