use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::detector::Detector;

/// Polls until `cancel` fires. Each tick runs to completion before the
/// next one starts; ticks missed while a slow tick was in flight are
/// skipped rather than replayed back to back.
pub async fn run_poll_loop(detector: Detector, every: Duration, cancel: CancellationToken) {
    info!(every = ?every, "poll_loop: started");

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match detector.tick().await {
            Ok(out) => debug!(prev = ?out.prev, state = %out.curr, notified = ?out.notified, "poll_loop: tick ok"),
            Err(e) => error!("poll_loop: tick failed: {e:#}"),
        }
    }

    info!("poll_loop: stopped");
}
