//! Durable storage seams: line-oriented track artifacts and integer
//! key-value persistence.

use std::path::{Path, PathBuf};

use anyhow::Result;

pub mod fs;
pub mod kv;

pub use fs::FsTrackStorage;
pub use kv::JsonKeyValueStore;

/// Named line-oriented durable storage backing a track.
pub trait TrackStorage: Send {
    fn exists(&self, name: &str) -> bool;

    /// All lines of the artifact, in file order.
    fn read_all_lines(&self, name: &str) -> Result<Vec<String>>;

    /// Full overwrite of the artifact with the given lines.
    fn write_all_lines(&self, name: &str, lines: &[String]) -> Result<()>;

    /// Remove the artifact. Absence is not an error.
    fn delete(&self, name: &str) -> Result<()>;

    /// Secondary copy to a user-visible location. Callers treat failures
    /// as best-effort and log them.
    fn copy_to(&self, name: &str, dest_dir: &Path) -> Result<PathBuf>;
}

/// Integer key-value persistence. Used by the sample counter.
pub trait KeyValueStore: Send {
    fn get_i64(&self, key: &str, default: i64) -> i64;

    fn set_i64(&mut self, key: &str, value: i64) -> Result<()>;
}
