use std::sync::Arc;

use log::{info, warn};
use tokio::sync::{broadcast, watch, Mutex};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::counter::SampleCounter;
use crate::source::{LocationSource, SourceStatus};
use crate::track::{Sample, TrackStore};
use crate::view::RecentView;

use super::state::{RecorderState, SpeedState};

/// Shared handles the sampling loop works against.
pub(crate) struct SamplingContext {
    pub session_id: String,
    pub source: Arc<dyn LocationSource>,
    pub state: Arc<Mutex<RecorderState>>,
    pub track: Arc<Mutex<TrackStore>>,
    pub view: Arc<Mutex<RecentView>>,
    pub counter: Arc<Mutex<SampleCounter>>,
    pub events: broadcast::Sender<Sample>,
    pub interval_rx: watch::Receiver<Duration>,
}

/// Periodic sampling loop. Suspends for the configured interval between
/// ticks; interval changes take effect on the next tick without
/// restarting an in-progress wait. Cancellation is observed during the
/// suspension only, so a tick that has begun always runs to completion.
pub(crate) async fn sampling_loop(ctx: SamplingContext, cancel_token: CancellationToken) {
    // Dies with the loop, so every session starts with no previous fix.
    let mut speed_state = SpeedState::new();

    loop {
        let wait = *ctx.interval_rx.borrow();
        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                record_tick(&ctx, &mut speed_state).await;
            }
            _ = cancel_token.cancelled() => {
                info!("sampling loop for session {} shutting down", ctx.session_id);
                break;
            }
        }
    }
}

async fn record_tick(ctx: &SamplingContext, speed_state: &mut SpeedState) {
    if ctx.source.status() != SourceStatus::Running {
        warn!("location source not running; skipping sample");
        return;
    }

    let fix = ctx.source.current_fix();
    let speed = speed_state.advance(&fix);

    {
        let mut state = ctx.state.lock().await;
        state.samples_this_session += 1;
    }

    let sample = Sample {
        timestamp: fix.observed_at,
        latitude: fix.latitude,
        longitude: fix.longitude,
        speed_mps: speed,
    };

    ctx.track.lock().await.append(&sample);
    ctx.view.lock().await.push(sample.clone());

    if let Err(err) = ctx.counter.lock().await.increment() {
        warn!("failed to persist sample count: {err:#}");
    }

    info!("recorded {}", sample.display_row());

    // Nobody listening is fine; the notification is best-effort.
    let _ = ctx.events.send(sample);
}
