//! Location source seam. The recorder only consumes this contract;
//! permission prompts and platform plumbing live behind it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod simulated;

pub use simulated::SimulatedSource;

/// A raw location reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceStatus {
    Initializing,
    Running,
    Failed,
}

/// Platform location service contract. The recording controller is the
/// single owner; no other component starts or stops the source.
pub trait LocationSource: Send + Sync {
    /// Whether the user has location enabled on the device at all.
    fn is_enabled(&self) -> bool;

    fn start(&self, desired_accuracy_m: f64, update_distance_m: f64);

    fn stop(&self);

    fn status(&self) -> SourceStatus;

    /// The most recent reading. Only meaningful while `status()` is
    /// `Running`.
    fn current_fix(&self) -> Fix;
}
