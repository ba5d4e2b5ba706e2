//! Wall-clock window roll-over
//!
//! The tracker has no notion of time. `WindowRoller` is the scheduler that
//! resets each window on a fixed cadence.

use super::tracker::UsageTracker;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Shortest period the roller accepts; shorter periods are raised to this
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Background task resetting the usage windows
///
/// The first reset of each window happens one full period after the roller
/// starts. The task stops on [`WindowRoller::shutdown`] or when the handle is
/// dropped.
#[derive(Debug)]
pub struct WindowRoller {
    handle: JoinHandle<()>,
}

impl WindowRoller {
    /// Spawn the roller on the current tokio runtime
    pub fn spawn(
        tracker: Arc<UsageTracker>,
        short_period: Duration,
        daily_period: Duration,
    ) -> Self {
        let short_period = short_period.max(MIN_PERIOD);
        let daily_period = daily_period.max(MIN_PERIOD);

        let handle = tokio::spawn(async move {
            let start = Instant::now();
            let mut short = interval_at(start + short_period, short_period);
            let mut daily = interval_at(start + daily_period, daily_period);
            short.set_missed_tick_behavior(MissedTickBehavior::Delay);
            daily.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = short.tick() => {
                        tracker.reset_short_window();
                        debug!("Short usage window rolled over");
                    }
                    _ = daily.tick() => {
                        tracker.reset_daily_window();
                        debug!("Daily usage window rolled over");
                    }
                }
            }
        });

        Self { handle }
    }

    /// Stop resetting the windows
    pub fn shutdown(&self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for WindowRoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
