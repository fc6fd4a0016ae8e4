//! # Control module
//!
//! Control is split into a pair of plans, each driven by its own PID controller:
//!
//! - The speed plan closes the loop between the target speed (kilometers/hour) and the current
//!   speed of the vehicle (meters/second), saturating the result to the speed envelope.
//! - The steering plan closes the loop between the target and current headings (degrees),
//!   keeping the heading inside (-180, 180].
//!
//! Both plans read and write the shared [`crate::state::VehicleState`], so they are implemented
//! as methods on it in their own files. They run with the state locked, so instead of logging
//! they return a [`PlanStep`] which the caller logs once the lock is released.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod pid;
pub mod speed_plan;
pub mod steering_plan;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;

pub use pid::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The result of advancing one of the plans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanStep {
    /// The new value of the planned quantity
    pub value: f64,

    /// The target the plan is driving towards
    pub target: f64,

    /// The controller evaluation behind this step
    pub pid: PidStep,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PlanStep {
    /// Log the step under the given plan name.
    pub fn log(&self, name: &str) {
        self.pid.log(name);
        trace!(
            "{} plan: target {:.3}, output {:.3} -> {:.3}",
            name, self.target, self.pid.output, self.value
        );
    }
}
