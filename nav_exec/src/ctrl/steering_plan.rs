//! # Steering plan
//!
//! Drives the current heading towards the target heading through the angular controller, keeping
//! the result in (-180, 180] degrees.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::wrap_deg_180;
use crate::ctrl::PlanStep;
use crate::state::VehicleState;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleState {

    /// Advance the steering plan by `dt` seconds.
    ///
    /// The step's value is the new current heading in degrees.
    pub fn plan_steering(&mut self, dt: f64) -> PlanStep {
        self.steer_pid.update_gains(self.steer_gains, dt);

        let pid = self.steer_pid.compute(
            self.target_heading_deg,
            self.current_heading_deg
        );

        self.current_heading_deg = wrap_deg_180(self.current_heading_deg + pid.output);

        PlanStep {
            value: self.current_heading_deg,
            target: self.target_heading_deg,
            pid,
        }
    }

    /// Clear the steering controller's memory.
    pub fn reset_steering_plan(&mut self) {
        self.steer_pid.reset();
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;
    use comms_if::nav::PidGains;

    use crate::nav::Params;
    use crate::state::VehicleState;

    #[test]
    fn test_heading_stays_in_range() {
        let mut state = VehicleState::new(Params::default(), Vec::new());

        for &(current, target) in [
            (170.0, -170.0),
            (-175.0, 175.0),
            (180.0, -90.0),
            (0.0, 180.0),
            (-90.0, 90.0),
        ].iter() {
            state.current_heading_deg = current;
            state.target_heading_deg = target;
            state.reset_steering_plan();

            for _ in 0..50 {
                let heading = state.plan_steering(0.1).value;
                assert!(heading > -180.0 && heading <= 180.0, "heading {} out of range", heading);
            }
        }
    }

    #[test]
    fn test_turns_the_short_way() {
        let mut state = VehicleState::new(Params::default(), Vec::new());
        state.steer_gains = PidGains { kp: 0.75, ki: 0.0, kd: 0.0 };
        state.current_heading_deg = 170.0;
        state.target_heading_deg = -170.0;

        // The error is +20 so the heading goes through 180 and comes out the other side
        assert_abs_diff_eq!(state.plan_steering(0.1).value, -175.0, epsilon = 1e-9);

        // Landing exactly on the boundary keeps +180
        state.steer_gains = PidGains { kp: 0.5, ki: 0.0, kd: 0.0 };
        state.current_heading_deg = 170.0;
        assert_abs_diff_eq!(state.plan_steering(0.1).value, 180.0, epsilon = 1e-9);
    }
}
