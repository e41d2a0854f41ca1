//! Two-state rest/motion machine.
//!
//! Whether a spring is at rest right now is a predicate over its state. What
//! listeners care about is the *edge*: the call where motion started and the
//! call where it stopped. [`Phase`] latches the outcome of the previous
//! `advance` so both edges are computed exactly once per call.

/// Latched outcome of the most recent `advance`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The last `advance` ended at rest (or none has run yet).
    #[default]
    Resting,
    /// The last `advance` ended in motion.
    Moving,
}

/// Edges crossed by one `advance` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    /// Was resting before the call and is moving after it.
    pub activated: bool,
    /// Is at rest after the call.
    pub came_to_rest: bool,
}

impl Phase {
    /// Returns `true` for [`Phase::Resting`].
    pub const fn is_resting(self) -> bool {
        matches!(self, Self::Resting)
    }

    /// Transitions on the rest predicate observed at the end of a call.
    pub const fn settle(self, at_rest_now: bool) -> (Self, Edges) {
        let next = if at_rest_now {
            Self::Resting
        } else {
            Self::Moving
        };
        let edges = Edges {
            activated: self.is_resting() && !at_rest_now,
            came_to_rest: at_rest_now,
        };
        (next, edges)
    }
}
