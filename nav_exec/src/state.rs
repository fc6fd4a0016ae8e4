//! # Vehicle state
//!
//! The single source of truth for the navigation system. One `VehicleState` is shared between the
//! background navigation loop and the request handlers behind a mutex, and every operation which
//! touches it (planning, localisation, pose ingestion) is a method on it, found in the module
//! which owns that operation.
//!
//! Positions and reference points are held as `(x, z, y)` vectors, so that the first two
//! components are the ground plane coordinates used by planning and localisation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Vector2, Vector3};

// Internal
use comms_if::nav::{NavStatus, PidGains, PlayerPos};
use crate::ctrl::PidController;
use crate::nav::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The destination of the vehicle in the simulator frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// The navigation state of the vehicle.
#[derive(Debug, Clone)]
pub struct VehicleState {
    /// Parameters the state was built with
    pub(crate) params: Params,

    /// Position used by control and localisation, `(x, z, y)`
    pub(crate) position: Vector3<f64>,

    /// Position staged by the last pose report, applied on the next position update
    pub(crate) previous_position: Vector3<f64>,

    /// Units: meters/second
    pub(crate) current_speed_ms: f64,

    /// Units: kilometers/hour
    pub(crate) target_speed_kmh: f64,

    /// Units: degrees, in the range (-180, 180]
    pub(crate) current_heading_deg: f64,

    /// Units: degrees, in the range (-180, 180]
    pub(crate) target_heading_deg: f64,

    pub(crate) destination: Option<Destination>,

    /// Planned path as ground plane `(x, z)` points
    pub(crate) path: Vec<Vector2<f64>>,

    /// Reference trajectory, `(x, z, y)`
    pub(crate) ref_points: Vec<Vector3<f64>>,

    /// Reference point nearest to the vehicle on the ground plane
    pub(crate) nearest_point: Option<Vector2<f64>>,

    /// Distance from the vehicle to `nearest_point`, infinite before the first evaluation
    pub(crate) tracking_error: f64,

    /// Set once the missing reference trajectory has been reported
    pub(crate) empty_ref_warned: bool,

    pub(crate) speed_gains: PidGains,
    pub(crate) steer_gains: PidGains,

    pub(crate) speed_pid: PidController,
    pub(crate) steer_pid: PidController,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleState {

    /// Create a new state at the origin, at rest, tracking the given reference points.
    pub fn new(params: Params, ref_points: Vec<Vector3<f64>>) -> Self {
        Self {
            params,
            position: Vector3::zeros(),
            previous_position: Vector3::zeros(),
            current_speed_ms: 0f64,
            target_speed_kmh: 0f64,
            current_heading_deg: 0f64,
            target_heading_deg: 0f64,
            destination: None,
            path: Vec::new(),
            ref_points,
            nearest_point: None,
            tracking_error: f64::INFINITY,
            empty_ref_warned: false,
            speed_gains: params.speed_gains,
            steer_gains: params.steer_gains,
            speed_pid: PidController::linear(params.speed_gains, params.tick_period_s),
            steer_pid: PidController::angular(params.steer_gains, params.tick_period_s),
        }
    }

    /// Build a snapshot of the state for operator tools.
    pub fn status(&self, running: bool) -> NavStatus {
        NavStatus {
            running,
            position: PlayerPos {
                x: self.position[0],
                z: self.position[1],
                y: self.position[2],
            },
            current_speed_ms: self.current_speed_ms,
            target_speed_kmh: self.target_speed_kmh,
            current_heading_deg: self.current_heading_deg,
            target_heading_deg: self.target_heading_deg,
            destination: self.destination.map(|d| [d.x, d.y, d.z]),
            path: self.path.iter().map(|p| [p[0], p[1]]).collect(),
            nearest_point: self.nearest_point.map(|p| [p[0], p[1]]),
            tracking_error: Some(self.tracking_error).filter(|e| e.is_finite()),
            speed_gains: self.speed_gains,
            steer_gains: self.steer_gains,
        }
    }

    pub fn destination(&self) -> Option<Destination> {
        self.destination
    }

    pub fn path(&self) -> &[Vector2<f64>] {
        &self.path
    }

    pub fn nearest_point(&self) -> Option<Vector2<f64>> {
        self.nearest_point
    }

    pub fn tracking_error(&self) -> f64 {
        self.tracking_error
    }

    pub fn heading(&self) -> f64 {
        self.current_heading_deg
    }

    pub fn target_speed(&self) -> f64 {
        self.target_speed_kmh
    }

    pub fn target_heading(&self) -> f64 {
        self.target_heading_deg
    }
}

impl Destination {
    /// The ground plane `(x, z)` point of the destination.
    pub fn ground(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.z)
    }
}

impl From<[f64; 3]> for Destination {
    fn from(xyz: [f64; 3]) -> Self {
        Self {
            x: xyz[0],
            y: xyz[1],
            z: xyz[2],
        }
    }
}
