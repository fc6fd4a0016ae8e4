//! # Navigation Executable Parameters
//!
//! This module provide parameters for the navigation executable itself. Parameters for the
//! navigation loop are found in [`crate::nav::Params`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavExecParams {

    /// Time step passed to the controllers when the simulator requests a move.
    ///
    /// Units: seconds
    pub get_move_dt_s: f64,

    /// Path to the reference map CSV, relative to the software root
    pub ref_map_path: String,

    /// Path to the pose log CSV, relative to the software root
    pub pose_log_path: String,

    /// Maximum number of rows kept in the pose log
    pub pose_log_max_rows: usize,
}
