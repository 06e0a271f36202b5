//! # Mood Scheduler
//!
//! Runs the engine's startup bootstrap, then one background task per timer:
//! daily baseline, weather refresh and mood recompute. Each timer is created here
//! explicitly, so what runs and how often is decided in one place.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::application::mood::MoodEngine;
use crate::domain::config::ScheduleConfig;
use crate::strings::logs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub daily: Duration,
    pub weather: Duration,
    pub recompute: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::from(&ScheduleConfig::default())
    }
}

impl From<&ScheduleConfig> for Schedule {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            daily: config.daily(),
            weather: config.weather(),
            recompute: config.recompute(),
        }
    }
}

/// Aborts the timer tasks when shut down or dropped.
pub struct SchedulerHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn shutdown(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub struct MoodScheduler;

impl MoodScheduler {
    /// Bootstraps the engine, then starts the steady-state timers.
    pub async fn start(engine: Arc<MoodEngine>, schedule: Schedule) -> SchedulerHandle {
        engine.bootstrap().await;
        Self::spawn(engine, schedule)
    }

    /// Starts the timers without bootstrapping. The first tick of each timer fires one
    /// period from now.
    pub fn spawn(engine: Arc<MoodEngine>, schedule: Schedule) -> SchedulerHandle {
        tracing::info!("{}", logs::scheduler_started(&schedule));
        let tasks = vec![
            spawn_periodic("daily", schedule.daily, engine.clone(), |engine| async move {
                engine.refresh_daily().await;
            }),
            spawn_periodic("weather", schedule.weather, engine.clone(), |engine| async move {
                // Failures are logged by the engine; the previous score stays.
                let _ = engine.refresh_weather().await;
            }),
            spawn_periodic("recompute", schedule.recompute, engine, |engine| async move {
                engine.apply_current_mood().await;
            }),
        ];
        SchedulerHandle { tasks }
    }
}

fn spawn_periodic<F, Fut>(
    name: &'static str,
    period: Duration,
    engine: Arc<MoodEngine>,
    job: F,
) -> JoinHandle<()>
where
    F: Fn(Arc<MoodEngine>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            tracing::debug!("Timer '{}' fired", name);
            job(engine.clone()).await;
        }
    })
}
