//! # Pose log
//!
//! Every pose report carrying a position is appended to a rolling CSV log, which holds only the
//! most recent rows.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::Path;
use serde::{Deserialize, Serialize};

use comms_if::nav::PoseReport;
use util::archive::{ArchiveError, RollingArchive};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A row of the pose log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    pub x: f64,
    pub z: f64,
    pub y: f64,

    /// Units: meters/second
    pub speed: f64,
}

pub struct PoseLog {
    archive: RollingArchive<PoseRecord>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseRecord {
    /// Build a record from a report, if it carries a position.
    pub fn from_report(report: &PoseReport) -> Option<Self> {
        report.player_pos.map(|p| Self {
            x: p.x,
            z: p.z,
            y: p.y,
            speed: report.player_speed,
        })
    }
}

impl PoseLog {
    /// Open the log at the given path, keeping at most `max_rows` rows.
    pub fn open<P: AsRef<Path>>(path: P, max_rows: usize) -> Result<Self, ArchiveError> {
        Ok(Self {
            archive: RollingArchive::open(path, max_rows)?,
        })
    }

    /// Record a pose report. Reports without a position are not recorded.
    pub fn record(&mut self, report: &PoseReport) -> Result<(), ArchiveError> {
        match PoseRecord::from_report(report) {
            Some(r) => self.archive.push(r),
            None => Ok(())
        }
    }

    /// The records held, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &PoseRecord> {
        self.archive.records()
    }

    pub fn path(&self) -> &Path {
        self.archive.path()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::nav::PlayerPos;

    #[test]
    fn test_pose_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/rddf.csv");
        let mut log = PoseLog::open(&path, 2).unwrap();

        for i in 0..3 {
            log.record(&PoseReport {
                player_pos: Some(PlayerPos { x: i as f64, z: 1.0, y: 2.0 }),
                player_speed: 0.5,
                player_body_x: 0.0,
            }).unwrap();
        }
        log.record(&PoseReport::default()).unwrap();

        let xs: Vec<f64> = log.records().map(|r| r.x).collect();
        assert_eq!(xs, vec![1.0, 2.0]);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().next(), Some("x,z,y,speed"));
        assert_eq!(contents.lines().count(), 3);
    }
}
