use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo;
use crate::source::Fix;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecorderStatus {
    Idle,
    Acquiring,
    Active,
}

impl Default for RecorderStatus {
    fn default() -> Self {
        RecorderStatus::Idle
    }
}

/// Controller snapshot a host UI can render.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderState {
    pub status: RecorderStatus,
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub samples_this_session: u64,
}

impl RecorderState {
    pub fn begin_session(&mut self, session_id: String, started_at: DateTime<Utc>) {
        *self = Self {
            status: RecorderStatus::Active,
            session_id: Some(session_id),
            started_at: Some(started_at),
            samples_this_session: 0,
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The previous fix, kept to derive the next speed value. One instance
/// per session; the first advance after a reset always reports 0.
#[derive(Debug, Default)]
pub struct SpeedState {
    last: Option<(f64, f64, DateTime<Utc>)>,
}

impl SpeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speed in m/s for the given fix relative to the previous one,
    /// which this call then replaces.
    pub fn advance(&mut self, fix: &Fix) -> f64 {
        let speed = match self.last {
            None => 0.0,
            Some((lat, lon, at)) => {
                let distance =
                    geo::haversine_distance(lat, lon, fix.latitude, fix.longitude);
                let elapsed = (fix.observed_at - at).num_milliseconds() as f64 / 1000.0;
                geo::speed_mps(distance, elapsed)
            }
        };
        self.last = Some((fix.latitude, fix.longitude, fix.observed_at));
        speed
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
