//! The persisted track: sample records and the append-only line log
//! behind them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::storage::TrackStorage;

/// Header row for speed-annotated tracks.
pub const TRACK_HEADER: &str = "Timestamp,Latitude,Longitude,Velocity";

/// Header row for the altitude variant, recorded when no speed is derived.
pub const TRACK_HEADER_ALTITUDE: &str = "Timestamp,Latitude,Longitude,Altitude";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One recorded point of a track. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Derived speed in m/s; 0 for the first sample of a session.
    pub speed_mps: f64,
}

impl Sample {
    /// Row as persisted: full float precision.
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.latitude,
            self.longitude,
            self.speed_mps
        )
    }

    /// Row as displayed: fixed precision for coordinates and speed.
    pub fn display_row(&self) -> String {
        format!(
            "{},{:.6},{:.6},{:.2}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.latitude,
            self.longitude,
            self.speed_mps
        )
    }
}

/// Append-only in-memory track with a durable backing artifact. Appends
/// are memory-only; durability happens on `export`, which snapshots the
/// whole track over the artifact.
pub struct TrackStore {
    storage: Box<dyn TrackStorage>,
    file_name: String,
    export_dir: Option<PathBuf>,
    header: String,
    lines: Vec<String>,
    loaded: bool,
}

impl TrackStore {
    pub fn new(
        storage: Box<dyn TrackStorage>,
        file_name: impl Into<String>,
        export_dir: Option<PathBuf>,
    ) -> Self {
        Self::with_header(storage, file_name, export_dir, TRACK_HEADER)
    }

    /// A store with an alternate header row, e.g. the altitude variant.
    pub fn with_header(
        storage: Box<dyn TrackStorage>,
        file_name: impl Into<String>,
        export_dir: Option<PathBuf>,
        header: &str,
    ) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
            export_dir,
            header: header.to_string(),
            lines: vec![header.to_string()],
            loaded: false,
        }
    }

    /// Adopt the durable artifact verbatim if it exists, otherwise keep
    /// the header-only seed. Repeat calls are no-ops so that re-starting
    /// a session cannot wipe rows that were appended but not yet
    /// exported.
    pub fn load(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }
        if self.storage.exists(&self.file_name) {
            self.lines = self
                .storage
                .read_all_lines(&self.file_name)
                .with_context(|| format!("failed to load track {}", self.file_name))?;
            info!("loaded track {} ({} rows)", self.file_name, self.row_count());
        }
        self.loaded = true;
        Ok(())
    }

    pub fn append(&mut self, sample: &Sample) {
        self.lines.push(sample.csv_row());
    }

    /// Overwrite the durable artifact with the entire track, then make a
    /// best-effort copy to the user-visible export directory.
    pub fn export(&self) -> Result<()> {
        self.storage
            .write_all_lines(&self.file_name, &self.lines)
            .with_context(|| format!("failed to export track {}", self.file_name))?;
        info!("exported track {} ({} rows)", self.file_name, self.row_count());

        if let Some(dir) = &self.export_dir {
            match self.storage.copy_to(&self.file_name, dir) {
                Ok(dest) => info!("copied track to {}", dest.display()),
                Err(err) => warn!("export copy failed: {err:#}"),
            }
        }

        Ok(())
    }

    /// Reset to header-only and remove the durable artifact if present.
    pub fn clear(&mut self) -> Result<()> {
        self.lines = vec![self.header.clone()];
        self.storage
            .delete(&self.file_name)
            .with_context(|| format!("failed to delete track {}", self.file_name))?;
        info!("cleared track {}", self.file_name);
        Ok(())
    }

    /// All lines including the header, in insertion order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Data rows, excluding the header.
    pub fn row_count(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }
}
