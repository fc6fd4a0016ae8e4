//! # Navigation interface
//!
//! Messages exchanged between the navigation executable and its clients: the
//! simulator (pose reports and move queries) and the operator console
//! (destination, targets, gain tuning and status).
//!
//! All messages are serialised as JSON. Field names of the simulator-facing
//! types follow the names the simulator itself uses.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A position in the simulator frame.
///
/// The simulator's ground plane is X/Z, with Y pointing upwards. Units are the simulator's native
/// linear units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPos {
    pub x: f64,
    pub z: f64,
    #[serde(default)]
    pub y: f64,
}

/// A pose and speed report sent by the simulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseReport {
    /// Position of the vehicle, or `None` if the simulator didn't include it in this report.
    #[serde(default)]
    pub player_pos: Option<PlayerPos>,

    /// Speed of the vehicle.
    ///
    /// Units: meters/second
    #[serde(default)]
    pub player_speed: f64,

    /// Heading of the vehicle body.
    ///
    /// Units: degrees
    #[serde(default)]
    pub player_body_x: f64,
}

/// The motion command for the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveCmd {
    pub command: MoveCommand,

    /// Speed demand.
    ///
    /// Units: meters/second
    pub speed: f64,

    /// Heading demand.
    ///
    /// Units: degrees, in the range (-180, 180]
    pub yaw: f64,
}

/// Proportional, integral and derivative gains of a PID controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

/// A snapshot of the navigation state, used by operator tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavStatus {
    /// True if the periodic navigation loop is running
    pub running: bool,

    pub position: PlayerPos,

    pub current_speed_ms: f64,
    pub target_speed_kmh: f64,

    pub current_heading_deg: f64,
    pub target_heading_deg: f64,

    /// Destination as an (x, y, z) triple
    pub destination: Option<[f64; 3]>,

    /// The planned path as (x, z) points
    pub path: Vec<[f64; 2]>,

    /// The reference point nearest to the vehicle as (x, z)
    pub nearest_point: Option<[f64; 2]>,

    /// Distance to the nearest reference point, `None` before the first evaluation.
    pub tracking_error: Option<f64>,

    pub speed_gains: PidGains,
    pub steer_gains: PidGains,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Label of a motion command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MoveCommand {
    /// Hold position
    Stop,

    /// Drive forwards at the commanded speed and heading
    Move,
}

/// A request sent to the navigation server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavRequest {
    /// Ingest a pose report from the simulator.
    Info(PoseReport),

    /// Get the motion command for this cycle.
    GetMove,

    /// Replace the destination.
    SetDestination { x: f64, y: f64, z: f64 },

    /// Tune the speed controller.
    SetSpeedGains(PidGains),

    /// Tune the steering controller.
    SetSteerGains(PidGains),

    /// Set the target speed in kilometers/hour.
    SetTargetSpeed { kmh: f64 },

    /// Set the target heading in degrees.
    SetTargetHeading { deg: f64 },

    /// Get a snapshot of the navigation state.
    GetStatus,

    /// Stop the navigation loop and exit the server.
    Shutdown,
}

/// A response from the navigation server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavResponse {
    /// The request was applied.
    Success,

    /// The motion command for this cycle.
    Move(MoveCmd),

    /// Snapshot of the navigation state.
    Status(NavStatus),

    /// The request could not be understood.
    Error(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MoveCmd {
    /// A stop command with zero speed and heading.
    pub fn stop() -> Self {
        Self {
            command: MoveCommand::Stop,
            speed: 0.0,
            yaw: 0.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pose_report_from_simulator_json() {
        let json = r#"{
            "playerPos": {"x": 12.5, "y": 8.0, "z": -3.25},
            "playerSpeed": 4.2,
            "playerBodyX": 271.5,
            "playerTurretX": 12.0
        }"#;

        let report: PoseReport = serde_json::from_str(json).unwrap();
        assert_eq!(
            report.player_pos,
            Some(PlayerPos { x: 12.5, z: -3.25, y: 8.0 })
        );
        assert_eq!(report.player_speed, 4.2);
        assert_eq!(report.player_body_x, 271.5);
    }

    #[test]
    fn test_pose_report_defaults() {
        let report: PoseReport = serde_json::from_str(r#"{"playerPos": {"x": 1, "z": 2}}"#)
            .unwrap();
        assert_eq!(report.player_pos, Some(PlayerPos { x: 1.0, z: 2.0, y: 0.0 }));
        assert_eq!(report.player_speed, 0.0);
        assert_eq!(report.player_body_x, 0.0);

        let empty: PoseReport = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.player_pos, None);
    }

    #[test]
    fn test_move_cmd_json() {
        let json = serde_json::to_value(MoveCmd::stop()).unwrap();
        assert_eq!(json, serde_json::json!({"command": "STOP", "speed": 0.0, "yaw": 0.0}));

        let cmd = MoveCmd { command: MoveCommand::Move, speed: 2.5, yaw: -90.0 };
        let json = serde_json::to_value(cmd).unwrap();
        assert_eq!(json["command"], "MOVE");
    }

    #[test]
    fn test_request_json() {
        let req: NavRequest = serde_json::from_str(
            r#"{"SetDestination": {"x": 100.0, "y": 100.0, "z": 0.0}}"#
        ).unwrap();
        assert_eq!(req, NavRequest::SetDestination { x: 100.0, y: 100.0, z: 0.0 });

        let req: NavRequest = serde_json::from_str(r#""GetMove""#).unwrap();
        assert_eq!(req, NavRequest::GetMove);
    }
}
