//! # Position handler
//!
//! Pose reports are staged rather than applied directly. The staged position becomes the
//! control position at the next position update, which happens at the start of every move
//! request.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector3;

use comms_if::nav::PoseReport;
use util::maths::wrap_deg_180;
use crate::state::VehicleState;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleState {

    /// Stage the position from a pose report and take its speed and heading.
    ///
    /// A report without a position leaves the staged position unchanged. The heading is wrapped
    /// into (-180, 180].
    pub fn ingest_pose(&mut self, report: &PoseReport) {
        if let Some(pos) = report.player_pos {
            self.previous_position = Vector3::new(pos.x, pos.z, pos.y);
        }

        self.current_speed_ms = report.player_speed;
        self.current_heading_deg = wrap_deg_180(report.player_body_x);
    }

    /// Apply the staged position.
    pub fn update_position(&mut self) {
        self.position = self.previous_position;
    }

    /// The control position as `(x, z, y)`.
    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    /// The current speed in meters/second.
    pub fn speed(&self) -> f64 {
        self.current_speed_ms
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::nav::PlayerPos;

    use crate::nav::Params;

    #[test]
    fn test_position_is_staged() {
        let mut state = VehicleState::new(Params::default(), Vec::new());

        state.ingest_pose(&PoseReport {
            player_pos: Some(PlayerPos { x: 1.0, z: 2.0, y: 3.0 }),
            player_speed: 4.5,
            player_body_x: 270.0,
        });

        // Speed and heading apply at once, the position waits for the update
        assert_eq!(state.speed(), 4.5);
        assert_eq!(state.heading(), -90.0);
        assert_eq!(state.position(), Vector3::zeros());

        state.update_position();
        assert_eq!(state.position(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_report_without_position() {
        let mut state = VehicleState::new(Params::default(), Vec::new());
        state.ingest_pose(&PoseReport {
            player_pos: Some(PlayerPos { x: 1.0, z: 2.0, y: 3.0 }),
            ..Default::default()
        });
        state.ingest_pose(&PoseReport {
            player_pos: None,
            player_speed: 2.0,
            player_body_x: 10.0,
        });

        state.update_position();
        assert_eq!(state.position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(state.speed(), 2.0);
    }

    #[test]
    fn test_heading_just_above_half_turn() {
        let mut state = VehicleState::new(Params::default(), Vec::new());
        let report: PoseReport = serde_json::from_str(
            r#"{"playerPos": {"x": 0.0, "z": 0.0}, "playerSpeed": 1.0, "playerBodyX": 180.00000000000003}"#
        ).unwrap();

        state.ingest_pose(&report);

        let heading = state.heading();
        assert!(heading > -180.0 && heading <= 180.0, "heading {} out of range", heading);
    }
}
