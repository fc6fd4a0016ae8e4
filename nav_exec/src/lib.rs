//! # Navigation library.
//!
//! This library allows other crates in the workspace to access items defined inside the
//! navigation crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Control module - PID controllers and the speed and steering plans built on them
pub mod ctrl;

/// Navigation module - the periodic navigation loop, path planning and localisation evaluation
pub mod nav;

/// Navigation server - serves requests from the simulator and operator tools
pub mod nav_server;

/// Executable parameters
pub mod params;

/// Pose log - bounded rolling log of the reported poses
pub mod pose_log;

/// Reference map - loads the reference trajectory the vehicle tracks
pub mod ref_map;

/// Vehicle state shared between the navigation loop and its callers
pub mod state;
