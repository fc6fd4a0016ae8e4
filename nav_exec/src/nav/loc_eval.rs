//! # Localisation evaluator
//!
//! Measures how far the vehicle has strayed from the reference trajectory by finding the
//! reference point nearest to it on the ground plane.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{trace, warn};
use nalgebra::{Vector2, Vector3};

use crate::state::VehicleState;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The outcome of a localisation evaluation, logged once the state lock has been released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocEval {
    /// The nearest reference point and the tracking error to it
    Nearest { point: Vector2<f64>, tracking_error: f64 },

    /// No usable reference points. `first` is set the first time this happens in a run.
    NoReference { first: bool },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleState {

    /// Update the nearest reference point and the tracking error.
    ///
    /// With no usable reference points the tracking error is zero and there is no nearest
    /// point.
    pub fn evaluate_loc(&mut self) -> LocEval {
        match nearest_point(&self.ref_points, self.position.xy()) {
            Some((point, dist)) => {
                self.nearest_point = Some(point);
                self.tracking_error = dist;
                LocEval::Nearest { point, tracking_error: dist }
            },
            None => {
                let first = !self.empty_ref_warned;
                self.empty_ref_warned = true;
                self.nearest_point = None;
                self.tracking_error = 0f64;
                LocEval::NoReference { first }
            }
        }
    }
}

impl LocEval {
    pub fn log(&self) {
        match self {
            LocEval::Nearest { point, tracking_error } => trace!(
                "Nearest reference point {:?}, tracking error {:.3}", point, tracking_error
            ),
            LocEval::NoReference { first: true } => warn!(
                "No reference points available, tracking error set to zero"
            ),
            LocEval::NoReference { first: false } => ()
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Find the reference point nearest to `position` on the ground plane, and its distance.
///
/// Ties go to the earliest point. Points at a non-finite distance are skipped.
pub fn nearest_point(
    ref_points: &[Vector3<f64>],
    position: Vector2<f64>
) -> Option<(Vector2<f64>, f64)> {
    let mut nearest: Option<(Vector2<f64>, f64)> = None;

    for point in ref_points.iter().map(|p| p.xy()) {
        let dist = (point - position).norm();

        if !dist.is_finite() {
            continue;
        }

        match nearest {
            Some((_, d)) if d <= dist => (),
            _ => nearest = Some((point, dist))
        }
    }

    nearest
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    use crate::nav::Params;

    #[test]
    fn test_nearest_point() {
        let refs = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 5.0),
            Vector3::new(20.0, 0.0, 0.0),
        ];
        let mut state = VehicleState::new(Params::default(), refs);
        state.position = Vector3::new(9.0, 1.0, 100.0);

        state.evaluate_loc();

        assert_eq!(state.nearest_point(), Some(Vector2::new(10.0, 0.0)));
        assert_abs_diff_eq!(state.tracking_error(), 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_no_reference_points() {
        let mut state = VehicleState::new(Params::default(), Vec::new());
        state.position = Vector3::new(3.0, 4.0, 0.0);

        assert_eq!(state.evaluate_loc(), LocEval::NoReference { first: true });

        assert_eq!(state.nearest_point(), None);
        assert_eq!(state.tracking_error(), 0.0);

        // The missing reference is only reported once
        assert_eq!(state.evaluate_loc(), LocEval::NoReference { first: false });
    }

    #[test]
    fn test_ties_and_bad_points() {
        let refs = vec![
            Vector3::new(f64::NAN, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
        ];

        let (point, dist) = nearest_point(&refs, Vector2::zeros()).unwrap();
        assert_eq!(point, Vector2::new(1.0, 0.0));
        assert_eq!(dist, 1.0);

        assert_eq!(nearest_point(&refs[..1], Vector2::zeros()), None);
    }
}
