//! # Path planner
//!
//! Plans a straight path from the vehicle's position to the destination on the ground plane. If
//! no destination has been set the default destination is adopted.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{trace, warn};
use nalgebra::Vector2;

use crate::state::{Destination, VehicleState};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The outcome of a path calculation, logged once the state lock has been released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStep {
    pub start: Vector2<f64>,
    pub end: Vector2<f64>,

    /// The default destination, if it was adopted by this calculation
    pub defaulted: Option<Destination>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleState {

    /// Replace the path with the segment from the current position to the destination.
    pub fn calc_path(&mut self) -> PathStep {
        let (destination, defaulted) = match self.destination {
            Some(d) => (d, None),
            None => {
                let d = Destination::from(self.params.default_destination);
                self.destination = Some(d);
                (d, Some(d))
            }
        };

        let start = self.position.xy();
        let end = destination.ground();
        self.path = vec![start, end];

        PathStep { start, end, defaulted }
    }
}

impl PathStep {
    pub fn log(&self) {
        if let Some(d) = self.defaulted {
            warn!(
                "No destination set, using the default destination ({}, {}, {})",
                d.x, d.y, d.z
            );
        }

        trace!("Path: {:?} -> {:?}", self.start, self.end);
    }
}

#[cfg(test)]
mod test {
    use nalgebra::{Vector2, Vector3};

    use crate::nav::Params;
    use crate::state::{Destination, VehicleState};

    #[test]
    fn test_default_destination() {
        let mut state = VehicleState::new(Params::default(), Vec::new());
        state.position = Vector3::new(5.0, 5.0, 1.0);

        let step = state.calc_path();

        assert_eq!(state.destination(), Some(Destination { x: 100.0, y: 100.0, z: 0.0 }));
        assert_eq!(state.path(), &[Vector2::new(5.0, 5.0), Vector2::new(100.0, 0.0)]);
        assert_eq!(step.defaulted, Some(Destination { x: 100.0, y: 100.0, z: 0.0 }));

        // Only the calculation which adopted the default reports it
        assert_eq!(state.calc_path().defaulted, None);
    }

    #[test]
    fn test_path_follows_position() {
        let mut state = VehicleState::new(Params::default(), Vec::new());
        state.destination = Some(Destination { x: -20.0, y: 3.0, z: 40.0 });

        state.calc_path();
        assert_eq!(state.path(), &[Vector2::new(0.0, 0.0), Vector2::new(-20.0, 40.0)]);

        state.position = Vector3::new(-10.0, 12.5, 0.0);
        state.calc_path();
        assert_eq!(state.path(), &[Vector2::new(-10.0, 12.5), Vector2::new(-20.0, 40.0)]);
        assert_eq!(state.destination(), Some(Destination { x: -20.0, y: 3.0, z: 40.0 }));
    }
}
