use thiserror::Error;

/// Why a recording session could not be started. None of these are
/// fatal; the caller may invoke `start` again.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
    #[error("location is disabled on this device")]
    SourceUnavailable,

    #[error("location source did not become ready within {waited_secs}s")]
    Timeout { waited_secs: u64 },

    #[error("location source failed to start")]
    Failed,
}

/// Rejected runtime configuration input. The previous value stays in
/// effect.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sample interval must be greater than 1 second (got {0})")]
    Interval(u64),

    #[error("view capacity must be greater than 1 (got {0})")]
    Capacity(usize),
}
