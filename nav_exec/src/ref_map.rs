//! # Reference map
//!
//! The reference trajectory is stored as a CSV file with a header row and at least the columns
//! `x`, `z` and `y`. Any other columns are ignored. Points are returned as `(x, z, y)` vectors.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::Path;
use log::{info, warn};
use nalgebra::Vector3;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single row of the reference map file.
#[derive(Debug, Deserialize)]
struct RefMapRecord {
    x: f64,
    z: f64,
    y: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RefMapError {
    #[error("Could not read the reference map: {0}")]
    CsvError(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Load the reference points from the given CSV file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Vector3<f64>>, RefMapError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut points = Vec::new();
    for record in reader.deserialize() {
        let record: RefMapRecord = record?;
        points.push(Vector3::new(record.x, record.z, record.y));
    }

    Ok(points)
}

/// Load the reference points, falling back to [`fallback`] if the file can't be read.
pub fn load_or_fallback<P: AsRef<Path>>(path: P) -> Vec<Vector3<f64>> {
    match load(&path) {
        Ok(points) => {
            info!("Loaded {} reference points from {:?}", points.len(), path.as_ref());
            points
        },
        Err(e) => {
            warn!("{}, using the fallback reference points", e);
            fallback()
        }
    }
}

/// Reference points used when no map is available.
pub fn fallback() -> Vec<Vector3<f64>> {
    (0..4)
        .map(|i| {
            let v = 10.0 * i as f64;
            Vector3::new(v, v, v)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_ignores_extra_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "x,z,y,distance").unwrap();
        writeln!(file, "1.0,2.0,3.0,0.0").unwrap();
        writeln!(file, "4.5, -6.0, 0.5, 7.2").unwrap();

        let points = load(file.path()).unwrap();
        assert_eq!(points, vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.5, -6.0, 0.5)]);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path().join("missing.csv")).is_err());

        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "x,z,y\n1.0,two,3.0\n").unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let points = load_or_fallback(dir.path().join("missing.csv"));

        assert_eq!(points, vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(10.0, 10.0, 10.0),
            Vector3::new(20.0, 20.0, 20.0),
            Vector3::new(30.0, 30.0, 30.0),
        ]);
    }
}
