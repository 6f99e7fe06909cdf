//! End-to-end recording session tests driving the controller against a
//! scripted location source on tokio's paused clock.

#[cfg(test)]
mod session_tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;
    use tokio::time::Duration;

    use crate::config::RecorderConfig;
    use crate::error::{AcquireError, ConfigError};
    use crate::recorder::{RecorderController, RecorderStatus};
    use crate::source::{Fix, LocationSource, SimulatedSource};
    use crate::storage::{FsTrackStorage, JsonKeyValueStore};
    use crate::track::TRACK_HEADER;

    fn fix_at(lat: f64, lon: f64, secs: i64) -> Fix {
        Fix {
            latitude: lat,
            longitude: lon,
            altitude: None,
            observed_at: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
        }
    }

    fn controller_in(
        dir: &TempDir,
        source: Arc<SimulatedSource>,
        config: RecorderConfig,
    ) -> RecorderController {
        let storage = Box::new(FsTrackStorage::new(dir.path().to_path_buf()).unwrap());
        let kv = Box::new(JsonKeyValueStore::new(dir.path().join("counter.json")).unwrap());
        RecorderController::new(source as Arc<dyn LocationSource>, storage, kv, config)
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_source_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller_in(
            &dir,
            Arc::new(SimulatedSource::disabled()),
            RecorderConfig::default(),
        );

        assert_eq!(
            controller.start().await,
            Err(AcquireError::SourceUnavailable)
        );
        assert_eq!(controller.state().await.status, RecorderStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_source_reports_failed() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller_in(
            &dir,
            Arc::new(SimulatedSource::failing_after(2)),
            RecorderConfig::default(),
        );

        assert_eq!(controller.start().await, Err(AcquireError::Failed));
        assert_eq!(controller.state().await.status, RecorderStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn acquisition_times_out_after_the_bounded_wait() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller_in(
            &dir,
            Arc::new(SimulatedSource::never_ready()),
            RecorderConfig::default(),
        );

        assert_eq!(
            controller.start().await,
            Err(AcquireError::Timeout { waited_secs: 20 })
        );
        assert_eq!(controller.state().await.status, RecorderStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn source_becoming_ready_within_the_wait_window_starts_recording() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(SimulatedSource::ready_after(3, vec![fix_at(10.0, 10.0, 0)]));
        let controller = controller_in(&dir, source, RecorderConfig::default());

        controller.start().await.unwrap();
        assert_eq!(controller.state().await.status, RecorderStatus::Active);
        controller.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn session_records_samples_with_first_speed_zero() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(SimulatedSource::ready(vec![
            fix_at(10.0, 10.0, 0),
            fix_at(10.0, 10.0, 1),
            fix_at(10.001, 10.0, 2),
        ]));
        let controller = controller_in(&dir, Arc::clone(&source), RecorderConfig::default());
        let mut events = controller.subscribe();

        controller.start().await.unwrap();
        let state = controller.state().await;
        assert_eq!(state.status, RecorderStatus::Active);
        assert!(state.session_id.is_some());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        controller.stop().await.unwrap();

        let recent = controller.recent().await;
        assert_eq!(recent.len(), 3);
        // Newest first: the zero-displacement fix then the first fix.
        assert!((recent[0].speed_mps - 111.2).abs() < 0.5, "got {}", recent[0].speed_mps);
        assert_eq!(recent[1].speed_mps, 0.0);
        assert_eq!(recent[2].speed_mps, 0.0);

        let lines = controller.track_lines().await;
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], TRACK_HEADER);

        assert_eq!(controller.samples_recorded().await, 3);
        assert_eq!(controller.state().await.status, RecorderStatus::Idle);

        for _ in 0..3 {
            events.recv().await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_idle_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller_in(
            &dir,
            Arc::new(SimulatedSource::ready(Vec::new())),
            RecorderConfig::default(),
        );

        controller.stop().await.unwrap();
        assert_eq!(controller.state().await.status, RecorderStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_during_acquisition_aborts_the_wait() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller_in(
            &dir,
            Arc::new(SimulatedSource::never_ready()),
            RecorderConfig::default(),
        );

        let starter = controller.clone();
        let start_task = tokio::spawn(async move { starter.start().await });

        tokio::time::sleep(Duration::from_millis(2500)).await;
        controller.stop().await.unwrap();

        assert_eq!(start_task.await.unwrap(), Ok(()));
        assert_eq!(controller.state().await.status, RecorderStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_interval_is_rejected_and_prior_value_retained() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller_in(
            &dir,
            Arc::new(SimulatedSource::ready(Vec::new())),
            RecorderConfig::default(),
        );

        assert_eq!(controller.set_interval_secs(0), Err(ConfigError::Interval(0)));
        assert_eq!(controller.set_interval_secs(1), Err(ConfigError::Interval(1)));
        assert_eq!(controller.interval_secs(), 1);

        controller.set_interval_secs(5).unwrap();
        assert_eq!(controller.interval_secs(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_change_applies_to_the_next_tick() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(SimulatedSource::ready(vec![fix_at(10.0, 10.0, 0)]));
        let controller = controller_in(&dir, Arc::clone(&source), RecorderConfig::default());

        controller.start().await.unwrap();

        // Ticks at 1s and 2s on the default interval.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        controller.set_interval_secs(3).unwrap();

        // The in-progress 1s wait still fires at 3s; the next gap is 3s,
        // so by 6.5s exactly two more samples landed.
        tokio::time::sleep(Duration::from_millis(4000)).await;
        controller.stop().await.unwrap();

        assert_eq!(controller.samples_recorded().await, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_capacity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller_in(
            &dir,
            Arc::new(SimulatedSource::ready(Vec::new())),
            RecorderConfig::default(),
        );

        assert_eq!(
            controller.set_view_capacity(0).await,
            Err(ConfigError::Capacity(0))
        );
        assert_eq!(
            controller.set_view_capacity(1).await,
            Err(ConfigError::Capacity(1))
        );
        assert_eq!(controller.view_capacity().await, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn capacity_change_clears_buffered_samples() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(SimulatedSource::ready(vec![
            fix_at(10.0, 10.0, 0),
            fix_at(10.0, 10.0, 1),
        ]));
        let controller = controller_in(&dir, Arc::clone(&source), RecorderConfig::default());

        controller.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        controller.stop().await.unwrap();
        assert_eq!(controller.recent().await.len(), 2);

        controller.set_view_capacity(5).await.unwrap();
        assert!(controller.recent().await.is_empty());
        assert_eq!(controller.view_capacity().await, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn second_session_starts_from_zero_speed_again() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(SimulatedSource::ready(vec![
            fix_at(10.0, 10.0, 0),
            fix_at(10.001, 10.0, 1),
        ]));
        let controller = controller_in(&dir, Arc::clone(&source), RecorderConfig::default());

        controller.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        controller.stop().await.unwrap();
        assert_eq!(controller.recent().await.len(), 2);

        // Movement continues across the session boundary, but the new
        // session has no previous fix to compare against.
        source.push_fix(fix_at(10.002, 10.0, 10));
        controller.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        controller.stop().await.unwrap();

        let recent = controller.recent().await;
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].speed_mps, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_reloads_exported_rows_and_counter() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(SimulatedSource::ready(vec![
            fix_at(10.0, 10.0, 0),
            fix_at(10.0, 10.0, 1),
        ]));
        let controller = controller_in(&dir, Arc::clone(&source), RecorderConfig::default());

        controller.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        controller.stop().await.unwrap();
        controller.export().await.unwrap();
        let exported = controller.track_lines().await;

        // A fresh process over the same storage adopts the exported
        // track at session start and keeps counting where it left off.
        let source2 = Arc::new(SimulatedSource::ready(vec![fix_at(10.001, 10.0, 20)]));
        let controller2 = controller_in(&dir, source2, RecorderConfig::default());
        assert_eq!(controller2.samples_recorded().await, 2);

        controller2.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        controller2.stop().await.unwrap();

        let lines = controller2.track_lines().await;
        assert_eq!(lines.len(), exported.len() + 1);
        assert_eq!(&lines[..exported.len()], exported.as_slice());
        assert_eq!(controller2.samples_recorded().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_resets_track_but_not_counter() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(SimulatedSource::ready(vec![fix_at(10.0, 10.0, 0)]));
        let controller = controller_in(&dir, Arc::clone(&source), RecorderConfig::default());

        controller.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        controller.stop().await.unwrap();
        controller.export().await.unwrap();

        controller.clear().await.unwrap();
        assert_eq!(controller.track_lines().await, [TRACK_HEADER.to_string()]);
        assert_eq!(controller.samples_recorded().await, 1);
    }
}
