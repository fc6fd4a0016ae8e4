//! Host platform utility functions

use std::path::PathBuf;

/// Environment variable holding the root directory of the software.
pub const SW_ROOT_ENV_VAR: &str = "TANK_NAV_SW_ROOT";

/// Get the software root directory, as given by the `TANK_NAV_SW_ROOT`
/// environment variable.
///
/// Parameter files, session directories and data files are all located
/// relative to this directory.
pub fn get_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
