//! # Speed plan
//!
//! Drives the current speed towards the target speed. The controller works in kilometers/hour,
//! the stored speed is in meters/second and is kept within the speed envelope.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::{clamp, kmh_to_ms, ms_to_kmh};
use crate::ctrl::PlanStep;
use crate::state::VehicleState;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleState {

    /// Advance the speed plan by `dt` seconds.
    ///
    /// The step's value is the new current speed in meters/second, its target is in
    /// kilometers/hour.
    pub fn plan_speed(&mut self, dt: f64) -> PlanStep {
        self.speed_pid.update_gains(self.speed_gains, dt);

        let current_kmh = ms_to_kmh(self.current_speed_ms);
        let pid = self.speed_pid.compute(self.target_speed_kmh, current_kmh);

        let max_speed_ms = kmh_to_ms(self.params.max_speed_kmh);
        self.current_speed_ms = clamp(
            &(self.current_speed_ms + kmh_to_ms(pid.output)),
            &-max_speed_ms,
            &max_speed_ms
        );

        PlanStep {
            value: self.current_speed_ms,
            target: self.target_speed_kmh,
            pid,
        }
    }

    /// Clear the speed controller's memory.
    pub fn reset_speed_plan(&mut self) {
        self.speed_pid.reset();
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;
    use comms_if::nav::PidGains;

    use crate::nav::Params;
    use crate::state::VehicleState;

    #[test]
    fn test_speed_clamped_to_envelope() {
        let mut state = VehicleState::new(Params::default(), Vec::new());
        let max_ms = 60.0 / 3.6;

        state.target_speed_kmh = 1000.0;
        for _ in 0..100 {
            let speed = state.plan_speed(0.1).value;
            assert!(speed <= max_ms + 1e-9);
        }
        assert_abs_diff_eq!(state.current_speed_ms, max_ms, epsilon = 1e-9);

        state.reset_speed_plan();
        state.target_speed_kmh = -1000.0;
        for _ in 0..100 {
            let speed = state.plan_speed(0.1).value;
            assert!(speed >= -max_ms - 1e-9);
        }
        assert_abs_diff_eq!(state.current_speed_ms, -max_ms, epsilon = 1e-9);
    }

    #[test]
    fn test_speed_units() {
        let mut state = VehicleState::new(Params::default(), Vec::new());
        state.speed_gains = PidGains { kp: 1.0, ki: 0.0, kd: 0.0 };

        // At 5 m/s (18 km/h) with a 36 km/h target the output is 18 km/h, i.e. 5 m/s
        state.current_speed_ms = 5.0;
        state.target_speed_kmh = 36.0;
        assert_abs_diff_eq!(state.plan_speed(0.1).value, 10.0, epsilon = 1e-9);

        // Target reached, no further change
        assert_abs_diff_eq!(state.plan_speed(0.1).value, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reset_speed_plan() {
        let mut state = VehicleState::new(Params::default(), Vec::new());
        state.target_speed_kmh = 20.0;
        state.plan_speed(0.1);
        assert!(state.speed_pid.integral() != 0.0);

        state.reset_speed_plan();
        assert_eq!(state.speed_pid.integral(), 0.0);
        assert_eq!(state.speed_pid.prev_error(), 0.0);
    }
}
