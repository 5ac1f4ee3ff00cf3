//! Background scheduler for the weekly winner.
//!
//! A single long-lived task wakes at the configured selection time on each
//! business day and asks a [`WinnerSelector`] to resolve the current week.
//! Failures are logged and followed by a backoff sleep. Only the stop signal
//! ends the loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use teamlunch_common::{AppResult, Clock, config::ScheduleConfig};
use teamlunch_core::{Schedule, SelectionOutcome, WeeklyWinnerService};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Resolves the week containing a given local date.
#[async_trait::async_trait]
pub trait WinnerSelector: Send + Sync {
    /// Attempt to resolve the week containing `today`.
    async fn select_weekly_winner(&self, today: NaiveDate) -> AppResult<SelectionOutcome>;
}

#[async_trait::async_trait]
impl WinnerSelector for WeeklyWinnerService {
    async fn select_weekly_winner(&self, today: NaiveDate) -> AppResult<SelectionOutcome> {
        Self::select_weekly_winner(self, today).await
    }
}

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Sleep after a failed selection attempt (default: 1 hour).
    pub failure_backoff: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            failure_backoff: Duration::from_secs(3600),
        }
    }
}

impl From<&ScheduleConfig> for SchedulerConfig {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            failure_backoff: Duration::from_secs(config.failure_backoff_secs),
        }
    }
}

/// Periodic weekly winner selection.
pub struct WeeklyWinnerScheduler<S, C> {
    selector: Arc<S>,
    clock: C,
    schedule: Schedule,
    config: SchedulerConfig,
}

impl<S, C> WeeklyWinnerScheduler<S, C>
where
    S: WinnerSelector + 'static,
    C: Clock + 'static,
{
    /// Create a scheduler.
    #[must_use]
    pub const fn new(
        selector: Arc<S>,
        clock: C,
        schedule: Schedule,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            selector,
            clock,
            schedule,
            config,
        }
    }

    /// Run the loop on a new task.
    pub fn spawn(self, stop: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(stop))
    }

    /// Run until `stop` turns true or its sender is dropped.
    pub async fn run(self, mut stop: watch::Receiver<bool>) {
        tracing::info!(
            winner_time = %self.schedule.winner_time(),
            timezone = %self.schedule.timezone(),
            "Weekly winner scheduler started"
        );

        loop {
            if *stop.borrow() {
                break;
            }

            let now = self.clock.now();
            let next = self.schedule.next_check(now);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            tracing::info!(
                next_check = %next,
                wait_secs = wait.as_secs(),
                "Next winner check scheduled"
            );

            if !sleep_or_stop(wait, &mut stop).await {
                break;
            }

            let now = self.clock.now();
            if !self.schedule.is_selection_time(now) {
                tracing::debug!(now = %now, "Woke outside the selection minute, rescheduling");
                continue;
            }

            let today = self.schedule.local_date(now);
            match self.selector.select_weekly_winner(today).await {
                Ok(outcome) => log_outcome(&outcome),
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        %today,
                        backoff_secs = self.config.failure_backoff.as_secs(),
                        "Weekly winner selection failed"
                    );
                    if !sleep_or_stop(self.config.failure_backoff, &mut stop).await {
                        break;
                    }
                }
            }
        }

        tracing::info!("Weekly winner scheduler stopped");
    }
}

fn log_outcome(outcome: &SelectionOutcome) {
    match outcome {
        SelectionOutcome::Created { winner } => tracing::info!(
            week_start = %winner.week_start_date,
            restaurant_id = winner.restaurant_id,
            vote_count = winner.vote_count,
            "Scheduled run recorded a weekly winner"
        ),
        SelectionOutcome::AlreadyResolved { week_start, .. } => {
            tracing::debug!(%week_start, "Scheduled run found the week already resolved");
        }
        SelectionOutcome::NoVotes { week_start } => {
            tracing::info!(%week_start, "Scheduled run found no votes");
        }
        SelectionOutcome::Tie {
            week_start,
            vote_count,
            restaurant_ids,
        } => tracing::info!(
            %week_start,
            vote_count,
            ?restaurant_ids,
            "Scheduled run found a tie"
        ),
    }
}

/// Sleep for `duration`. Returns false if stopped first.
async fn sleep_or_stop(duration: Duration, stop: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(duration);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            () = &mut sleep => return true,
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    return false;
                }
            }
        }
    }
}
