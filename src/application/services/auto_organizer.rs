// src/application/services/auto_organizer.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::organizer::Organizer;
use crate::domain::reconciliation::{OrganizeOptions, ReconciliationResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};

/// Periodic reconciliation.
///
/// The first pass runs one interval after start, then once per interval.
/// A pass that overruns the interval delays the next one instead of
/// triggering a burst.
#[derive(Debug)]
pub struct AutoOrganizer {
    organizer: Arc<Organizer>,
    options: OrganizeOptions,
    period: Duration,
}

/// Longest accepted interval, one week
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

impl AutoOrganizer {
    /// `interval_minutes == 0` means auto-organization is switched off,
    /// anything above `MAX_INTERVAL_MINUTES` is rejected
    pub fn new(
        organizer: Arc<Organizer>,
        options: OrganizeOptions,
        interval_minutes: u64,
    ) -> ApplicationResult<Self> {
        if interval_minutes == 0 {
            return Err(ApplicationError::Validation(
                "auto-organization is disabled (interval is 0 minutes)".to_string(),
            ));
        }
        if interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(ApplicationError::Validation(format!(
                "interval of {} minutes is out of range (max {})",
                interval_minutes, MAX_INTERVAL_MINUTES
            )));
        }
        Ok(Self {
            organizer,
            options,
            period: Duration::from_secs(interval_minutes * 60),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Runs passes until `shutdown` resolves, handing every result to
    /// `on_result`. Returns the number of completed passes.
    ///
    /// A pass in progress is finished before shutdown is observed.
    #[instrument(skip(self, shutdown, on_result), fields(period_secs = self.period.as_secs()))]
    pub async fn run_until<F, C>(&self, shutdown: F, mut on_result: C) -> usize
    where
        F: Future<Output = ()>,
        C: FnMut(&ReconciliationResult),
    {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            "Auto-organization scheduled every {} minutes",
            self.period.as_secs() / 60
        );
        let mut runs = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Auto-organization stopped after {} runs", runs);
                    break;
                }
                _ = ticker.tick() => {
                    debug!("Scheduled organization triggered");
                    let result = self.organizer.run_organization(&self.options).await;
                    runs += 1;
                    on_result(&result);
                }
            }
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collation::PrimaryCollator;
    use crate::infrastructure::stores::MemoryBookmarkStore;

    fn organizer() -> Arc<Organizer> {
        let store = Arc::new(MemoryBookmarkStore::with_default_roots());
        Arc::new(Organizer::new(store, Arc::new(PrimaryCollator)))
    }

    #[test]
    fn given_zero_interval_when_creating_then_validation_error() {
        let result = AutoOrganizer::new(organizer(), OrganizeOptions::default(), 0);
        assert!(matches!(result, Err(ApplicationError::Validation(_))));
    }

    #[test]
    fn given_interval_beyond_a_week_when_creating_then_validation_error() {
        let result = AutoOrganizer::new(organizer(), OrganizeOptions::default(), u64::MAX);
        assert!(matches!(result, Err(ApplicationError::Validation(_))));

        let result = AutoOrganizer::new(
            organizer(),
            OrganizeOptions::default(),
            MAX_INTERVAL_MINUTES + 1,
        );
        assert!(matches!(result, Err(ApplicationError::Validation(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn given_one_week_interval_when_shut_down_early_then_no_pass() {
        let auto =
            AutoOrganizer::new(organizer(), OrganizeOptions::default(), MAX_INTERVAL_MINUTES)
                .unwrap();
        assert_eq!(auto.period(), Duration::from_secs(7 * 24 * 60 * 60));

        let runs = auto
            .run_until(tokio::time::sleep(Duration::from_secs(60)), |_| {})
            .await;

        assert_eq!(runs, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn given_five_minute_interval_when_eleven_minutes_pass_then_runs_twice() {
        // Arrange
        let auto = AutoOrganizer::new(organizer(), OrganizeOptions::default(), 5).unwrap();
        let mut results = Vec::new();

        // Act
        let runs = auto
            .run_until(tokio::time::sleep(Duration::from_secs(11 * 60)), |r| {
                results.push(r.clone())
            })
            .await;

        // Assert
        assert_eq!(runs, 2);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
    }

    #[tokio::test(start_paused = true)]
    async fn given_shutdown_before_first_interval_when_running_then_no_pass() {
        let auto = AutoOrganizer::new(organizer(), OrganizeOptions::default(), 1).unwrap();

        let runs = auto
            .run_until(tokio::time::sleep(Duration::from_secs(30)), |_| {})
            .await;

        assert_eq!(runs, 0);
        assert_eq!(auto.period(), Duration::from_secs(60));
    }
}
