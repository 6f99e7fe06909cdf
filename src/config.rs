use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Recorder configuration. Interval and view capacity can also be
/// changed at runtime through the controller, subject to the same
/// lower bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderConfig {
    /// Seconds between samples.
    pub interval_secs: u64,
    /// Entries kept in the most-recent-first view.
    pub view_capacity: usize,
    /// Track artifact name inside the storage directory.
    pub file_name: String,
    /// Desired source accuracy in meters.
    pub desired_accuracy_m: f64,
    /// Minimum movement in meters between source updates.
    pub update_distance_m: f64,
    /// User-visible directory for the best-effort export copy.
    pub export_dir: Option<PathBuf>,
    /// Seconds to wait for the source to leave its initializing state.
    pub acquisition_wait_secs: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1,
            view_capacity: 10,
            file_name: "GPSData.csv".into(),
            desired_accuracy_m: 10.0,
            update_distance_m: 10.0,
            export_dir: None,
            acquisition_wait_secs: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_recording_contract() {
        let config = RecorderConfig::default();
        assert_eq!(config.interval_secs, 1);
        assert_eq!(config.view_capacity, 10);
        assert_eq!(config.file_name, "GPSData.csv");
        assert_eq!(config.acquisition_wait_secs, 20);
    }

    #[test]
    fn serde_round_trip() {
        let config = RecorderConfig {
            export_dir: Some(PathBuf::from("/tmp/downloads")),
            ..RecorderConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: RecorderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.view_capacity, config.view_capacity);
        assert_eq!(back.export_dir, config.export_dir);
    }
}
