//! Periodic GPS track recorder: a sampling state machine that reads a
//! location source on a configurable cadence, derives instantaneous
//! speed from consecutive fixes, persists the track as a delimited log,
//! and keeps a bounded most-recent-first view for display.

mod config;
mod counter;
mod error;
mod geo;
mod recorder;
mod session_tests;
mod source;
mod storage;
mod track;
mod view;

pub use config::RecorderConfig;
pub use counter::SampleCounter;
pub use error::{AcquireError, ConfigError};
pub use geo::{haversine_distance, speed_mps};
pub use recorder::{RecorderController, RecorderState, RecorderStatus, SpeedState};
pub use source::{Fix, LocationSource, SimulatedSource, SourceStatus};
pub use storage::{FsTrackStorage, JsonKeyValueStore, KeyValueStore, TrackStorage};
pub use track::{Sample, TrackStore, TRACK_HEADER, TRACK_HEADER_ALTITUDE};
pub use view::RecentView;
