// Periodic hatch leaderboard post.
//
// One task owns the `ChangeDetector` and runs cycles back to back from a
// single interval, so a cycle is never interleaved with itself. A slow cycle
// makes the interval skip missed ticks rather than queue them up.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::commands::{rank_by, to_entries, ListingKind, LEADERBOARD_SIZE};
use crate::detector::ChangeDetector;
use crate::error::FetchError;
use crate::fields::Field;
use crate::metrics;
use crate::normalize::{extract_records, Record};
use crate::notifier::Notifier;
use crate::render::Renderer;
use crate::upstream::{Endpoint, RecordSource};

/// Result of one leaderboard evaluation.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub changed: bool,
    /// Ranked top-N eggs, most expensive first.
    pub top: Vec<Record>,
}

/// Fetch the egg list, rank it by cost, and run it past the detector.
///
/// On a fetch failure the detector is not consulted, so its state is left
/// exactly as it was.
pub async fn run_cycle<S: RecordSource>(
    source: &S,
    detector: &mut ChangeDetector,
) -> Result<CycleOutcome, FetchError> {
    let payload = source.fetch(Endpoint::Eggs).await?;
    let top = rank_by(extract_records(&payload), Field::Cost, LEADERBOARD_SIZE);
    metrics::HATCH_LEADERBOARD_SIZE.set(top.len() as i64);
    let changed = detector.evaluate(&top);
    Ok(CycleOutcome { changed, top })
}

/// Drives `run_cycle` on an interval and posts changed leaderboards.
pub struct HatchPoster<S, N> {
    source: S,
    notifier: N,
    renderer: Renderer,
    detector: ChangeDetector,
    interval_minutes: u64,
}

impl<S, N> HatchPoster<S, N>
where
    S: RecordSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, renderer: Renderer, interval_minutes: u64) -> Self {
        Self {
            source,
            notifier,
            renderer,
            detector: ChangeDetector::new(Field::Cost),
            interval_minutes,
        }
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// One tick: evaluate, and post if the leaderboard changed.
    /// Failures are logged and swallowed so the schedule keeps running.
    pub async fn tick(&mut self) {
        let outcome = match run_cycle(&self.source, &mut self.detector).await {
            Ok(outcome) => outcome,
            Err(e) => {
                metrics::HATCH_CYCLES_TOTAL.with_label_values(&["failed"]).inc();
                tracing::error!("Hatch cycle failed: {e}");
                return;
            }
        };

        if !outcome.changed {
            metrics::HATCH_CYCLES_TOTAL.with_label_values(&["unchanged"]).inc();
            tracing::debug!("Hatch leaderboard unchanged, skipping post");
            return;
        }
        metrics::HATCH_CYCLES_TOTAL.with_label_values(&["changed"]).inc();

        let entries = to_entries(&outcome.top, ListingKind::Hatches);
        let message = self.renderer.auto_hatch(&entries, self.interval_minutes);
        match self.notifier.notify(&message).await {
            Ok(()) => {
                metrics::HATCH_POSTS_TOTAL.inc();
                tracing::info!(eggs = entries.len(), "Posted hatch leaderboard update");
            }
            Err(e) => {
                metrics::HATCH_POST_FAILURES_TOTAL.inc();
                tracing::error!("Failed to post hatch leaderboard: {e}");
            }
        }
    }

    /// Run forever, ticking immediately and then every `period`.
    pub async fn run(mut self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }
}

/// Spawn the hatch poster as a background task.
pub fn spawn_hatch_poster<S, N>(poster: HatchPoster<S, N>, period: Duration) -> JoinHandle<()>
where
    S: RecordSource + 'static,
    N: Notifier + 'static,
{
    tracing::info!(
        interval_secs = period.as_secs(),
        "Starting hatch leaderboard poster"
    );
    tokio::spawn(poster.run(period))
}
