//! Demo shell: records a short walk from a simulated location source
//! and exports the resulting track.

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use log::info;
use tokio::time::Duration;

use geotrack::{
    Fix, FsTrackStorage, JsonKeyValueStore, LocationSource, RecorderConfig,
    RecorderController, SimulatedSource,
};

fn walking_fixes(count: usize) -> Vec<Fix> {
    let start = Utc::now();
    (0..count)
        .map(|i| Fix {
            // Roughly 1.4 m/s due north.
            latitude: 47.3769 + i as f64 * 0.0000126,
            longitude: 8.5417,
            altitude: Some(408.0),
            observed_at: start + ChronoDuration::seconds(i as i64),
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let data_dir = std::env::temp_dir().join("geotrack-demo");
    let storage = Box::new(FsTrackStorage::new(data_dir.clone())?);
    let kv = Box::new(JsonKeyValueStore::new(data_dir.join("counter.json"))?);

    let source = Arc::new(SimulatedSource::ready(walking_fixes(6)));
    let controller = RecorderController::new(
        source as Arc<dyn LocationSource>,
        storage,
        kv,
        RecorderConfig::default(),
    );

    let mut events = controller.subscribe();
    tokio::spawn(async move {
        while let Ok(sample) = events.recv().await {
            info!("sample: {}", sample.display_row());
        }
    });

    controller.start().await?;
    tokio::time::sleep(Duration::from_millis(5500)).await;
    controller.stop().await?;

    controller.export().await?;
    info!(
        "recorded {} samples this run, {} lifetime; track at {}",
        controller.recent().await.len(),
        controller.samples_recorded().await,
        data_dir.join("GPSData.csv").display()
    );

    Ok(())
}
