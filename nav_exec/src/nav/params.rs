//! Parameters structure for the navigation loop

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

use comms_if::nav::PidGains;

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Parameters for the navigation loop and its controllers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {

    /// Period of the background navigation tick.
    ///
    /// Units: seconds
    pub tick_period_s: f64,

    /// Tracking error under which a set destination is considered reached.
    ///
    /// Units: simulator units
    pub arrival_tolerance: f64,

    /// Speed under which the motion command is `STOP`.
    ///
    /// Units: meters/second
    pub stop_speed_threshold_ms: f64,

    /// Magnitude of the speed envelope.
    ///
    /// Units: kilometers/hour
    pub max_speed_kmh: f64,

    /// Destination used by the path planner when none has been set, as (x, y, z).
    pub default_destination: [f64; 3],

    /// Initial gains of the speed controller
    pub speed_gains: PidGains,

    /// Initial gains of the steering controller
    pub steer_gains: PidGains,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            tick_period_s: 0.1,
            arrival_tolerance: 0.5,
            stop_speed_threshold_ms: 0.1,
            max_speed_kmh: 60.0,
            default_destination: [100.0, 100.0, 0.0],
            speed_gains: PidGains { kp: 0.5, ki: 0.1, kd: 0.05 },
            steer_gains: PidGains { kp: 0.5, ki: 0.1, kd: 0.05 },
        }
    }
}
