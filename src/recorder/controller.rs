use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::RecorderConfig;
use crate::counter::SampleCounter;
use crate::error::{AcquireError, ConfigError};
use crate::source::{LocationSource, SourceStatus};
use crate::storage::{KeyValueStore, TrackStorage};
use crate::track::{Sample, TrackStore};
use crate::view::RecentView;

use super::loop_worker::{sampling_loop, SamplingContext};
use super::state::{RecorderState, RecorderStatus};

const ACQUISITION_POLL_INTERVAL: Duration = Duration::from_secs(1);
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// One recording session's worker task. The handle is absent while the
/// session is still acquiring the source.
struct SessionTask {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

/// How the acquisition wait ended.
enum Acquisition {
    Ready,
    Failed,
    TimedOut { waited_secs: u64 },
    Aborted,
}

/// State machine orchestrating source acquisition, the periodic
/// sampling loop, and the session lifecycle.
#[derive(Clone)]
pub struct RecorderController {
    source: Arc<dyn LocationSource>,
    state: Arc<Mutex<RecorderState>>,
    track: Arc<Mutex<TrackStore>>,
    view: Arc<Mutex<RecentView>>,
    counter: Arc<Mutex<SampleCounter>>,
    worker: Arc<Mutex<Option<SessionTask>>>,
    events: broadcast::Sender<Sample>,
    interval_tx: Arc<watch::Sender<Duration>>,
    // Kept so interval updates can be published while no loop is running.
    interval_rx: watch::Receiver<Duration>,
    desired_accuracy_m: f64,
    update_distance_m: f64,
    acquisition_wait_secs: u64,
}

impl RecorderController {
    pub fn new(
        source: Arc<dyn LocationSource>,
        storage: Box<dyn TrackStorage>,
        kv: Box<dyn KeyValueStore>,
        config: RecorderConfig,
    ) -> Self {
        let (interval_tx, interval_rx) =
            watch::channel(Duration::from_secs(config.interval_secs));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let track = TrackStore::new(storage, config.file_name, config.export_dir);

        Self {
            source,
            state: Arc::new(Mutex::new(RecorderState::default())),
            track: Arc::new(Mutex::new(track)),
            view: Arc::new(Mutex::new(RecentView::new(config.view_capacity))),
            counter: Arc::new(Mutex::new(SampleCounter::new(kv))),
            worker: Arc::new(Mutex::new(None)),
            events,
            interval_tx: Arc::new(interval_tx),
            interval_rx,
            desired_accuracy_m: config.desired_accuracy_m,
            update_distance_m: config.update_distance_m,
            acquisition_wait_secs: config.acquisition_wait_secs,
        }
    }

    /// Start a recording session. A no-op while a session is already
    /// acquiring or active. Reports why acquisition did not reach a
    /// ready state; none of those outcomes are fatal and the caller may
    /// simply call `start` again.
    pub async fn start(&self) -> Result<(), AcquireError> {
        {
            let mut state = self.state.lock().await;
            if state.status != RecorderStatus::Idle {
                info!("recording already active; ignoring start");
                return Ok(());
            }
            state.status = RecorderStatus::Acquiring;
        }

        if !self.source.is_enabled() {
            warn!("location is disabled on this device");
            self.state.lock().await.reset();
            return Err(AcquireError::SourceUnavailable);
        }

        let cancel_token = CancellationToken::new();
        {
            let mut worker = self.worker.lock().await;
            *worker = Some(SessionTask {
                cancel: cancel_token.clone(),
                handle: None,
            });
        }

        self.source
            .start(self.desired_accuracy_m, self.update_distance_m);

        match self.await_source_ready(&cancel_token).await {
            Acquisition::Ready => {}
            Acquisition::Aborted => {
                info!("acquisition aborted by stop request");
                self.abandon_acquisition().await;
                return Ok(());
            }
            Acquisition::TimedOut { waited_secs } => {
                warn!("location source still initializing after {waited_secs}s; giving up");
                self.abandon_acquisition().await;
                return Err(AcquireError::Timeout { waited_secs });
            }
            Acquisition::Failed => {
                warn!("location source reported failure during acquisition");
                self.abandon_acquisition().await;
                return Err(AcquireError::Failed);
            }
        }

        // Storage content only matters once samples exist to follow it.
        if let Err(err) = self.track.lock().await.load() {
            warn!("failed to load existing track: {err:#}");
        }

        let session_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        {
            let mut state = self.state.lock().await;
            state.begin_session(session_id.clone(), started_at);
        }

        let ctx = SamplingContext {
            session_id: session_id.clone(),
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
            track: Arc::clone(&self.track),
            view: Arc::clone(&self.view),
            counter: Arc::clone(&self.counter),
            events: self.events.clone(),
            interval_rx: self.interval_rx.clone(),
        };
        let handle = tokio::spawn(sampling_loop(ctx, cancel_token.clone()));

        {
            let mut worker = self.worker.lock().await;
            match worker.as_mut() {
                Some(task) => task.handle = Some(handle),
                None => {
                    // stop() won the race while the loop was being spawned.
                    cancel_token.cancel();
                    self.source.stop();
                    self.state.lock().await.reset();
                    return Ok(());
                }
            }
        }

        info!("recording session {session_id} started");
        Ok(())
    }

    /// Stop the active session, or abort one still acquiring. A no-op
    /// while idle. At most one extra sample may land after this is
    /// signaled; the loop never cancels mid-tick.
    pub async fn stop(&self) -> Result<()> {
        let task = self.worker.lock().await.take();
        let Some(task) = task else {
            info!("stop requested while idle");
            return Ok(());
        };

        task.cancel.cancel();
        if let Some(handle) = task.handle {
            handle
                .await
                .context("sampling loop task failed to join")?;
        }

        self.source.stop();
        self.state.lock().await.reset();
        info!("recording stopped");
        Ok(())
    }

    /// Change the sampling cadence. Values of 1 or below are rejected
    /// and the previous interval stays in effect. Accepted values apply
    /// from the next tick; an in-progress wait is not restarted.
    pub fn set_interval_secs(&self, secs: u64) -> Result<(), ConfigError> {
        if secs <= 1 {
            return Err(ConfigError::Interval(secs));
        }
        let _ = self.interval_tx.send(Duration::from_secs(secs));
        info!("sample interval set to {secs}s");
        Ok(())
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_rx.borrow().as_secs()
    }

    /// Change the view capacity. Values of 1 or below are rejected. On
    /// acceptance every buffered entry is discarded before the new
    /// capacity takes effect.
    pub async fn set_view_capacity(&self, capacity: usize) -> Result<(), ConfigError> {
        if capacity <= 1 {
            return Err(ConfigError::Capacity(capacity));
        }
        self.view.lock().await.reset(capacity);
        info!("view capacity set to {capacity}; buffered samples cleared");
        Ok(())
    }

    pub async fn view_capacity(&self) -> usize {
        self.view.lock().await.capacity()
    }

    /// Snapshot the whole track into durable storage, plus the
    /// best-effort copy to the user-visible export directory.
    pub async fn export(&self) -> Result<()> {
        self.track.lock().await.export()
    }

    /// Reset the track to header-only and drop the durable artifact.
    pub async fn clear(&self) -> Result<()> {
        self.track.lock().await.clear()
    }

    /// Per-sample notifications for a rendering layer.
    pub fn subscribe(&self) -> broadcast::Receiver<Sample> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> RecorderState {
        self.state.lock().await.clone()
    }

    /// Most recent samples, newest first, bounded by the view capacity.
    pub async fn recent(&self) -> Vec<Sample> {
        self.view.lock().await.snapshot()
    }

    /// Lifetime count of recorded samples.
    pub async fn samples_recorded(&self) -> i64 {
        self.counter.lock().await.count()
    }

    /// The in-memory track, header first.
    pub async fn track_lines(&self) -> Vec<String> {
        self.track.lock().await.lines().to_vec()
    }

    /// Poll the source once per second until it leaves `Initializing`,
    /// for at most the configured wait window.
    async fn await_source_ready(&self, cancel_token: &CancellationToken) -> Acquisition {
        let mut waited = 0u64;
        loop {
            match self.source.status() {
                SourceStatus::Running => return Acquisition::Ready,
                SourceStatus::Failed => return Acquisition::Failed,
                SourceStatus::Initializing => {}
            }
            if waited >= self.acquisition_wait_secs {
                return Acquisition::TimedOut { waited_secs: waited };
            }
            tokio::select! {
                _ = tokio::time::sleep(ACQUISITION_POLL_INTERVAL) => waited += 1,
                _ = cancel_token.cancelled() => return Acquisition::Aborted,
            }
        }
    }

    async fn abandon_acquisition(&self) {
        self.source.stop();
        self.worker.lock().await.take();
        self.state.lock().await.reset();
    }
}
