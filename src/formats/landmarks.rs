//! Landmark-set persistence: a JSON array of node ids, selected once and
//! reused across ALT preprocessing runs and queries so that two runs over
//! the same graph are comparable.

use std::path::Path;

use crate::error::ConfigError;
use crate::graph::NodeId;

pub fn save(path: &Path, landmarks: &[NodeId]) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(landmarks).expect("landmark ids always serialize");
    std::fs::write(path, json).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn load(path: &Path) -> Result<Vec<NodeId>, ConfigError> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ConfigError::MalformedLandmarkFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let landmarks = vec![3u32, 17, 42];
        save(file.path(), &landmarks).unwrap();
        let loaded = load(file.path()).unwrap();
        assert_eq!(loaded, landmarks);
    }

    #[test]
    fn rejects_malformed_json() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not json").unwrap();
        assert!(load(file.path()).is_err());
    }
}
