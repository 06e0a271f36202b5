//! # Mood Engine
//!
//! Owns the rolling mood signals and applies the derived mood to the bot's presentation.
//! Each trigger (daily redraw, weather refresh, message arrival, recompute) is an explicit
//! method; the scheduler and the chat event loop call them.
//!
//! Signal state sits behind one mutex that is never held across an external call.
//! A second mutex serializes applies, so a change is presented at most once even if
//! two recomputes race. The displayed mood lives in a watch cell that readers can
//! borrow while an apply is still waiting on the presentation.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

use crate::application::mood::activity::{MessageWindow, activity_points};
use crate::application::mood::weather::weather_score;
use crate::domain::traits::{Clock, MoodSink, PresentationSink, RosterProvider, SystemClock, WeatherProvider};
use crate::domain::types::{Mood, MoodReading, MoodRecord, RosterSnapshot};
use crate::strings::logs;

/// Divisor used while the process is still bootstrapping.
pub const STARTUP_NORMALIZER: f64 = 3.0;
/// Divisor used once the bootstrap finished.
pub const STEADY_NORMALIZER: f64 = 5.0;

pub type BaselineSource = Box<dyn FnMut() -> f64 + Send>;

/// Combined score of all signals.
pub fn mood_points(
    daily_baseline: f64,
    weather_score: f64,
    presence_ratio: f64,
    voice_active: bool,
    messages_last_minute: usize,
    starting: bool,
) -> f64 {
    let voice = if voice_active { 1.0 } else { 0.0 };
    let normalizer = if starting { STARTUP_NORMALIZER } else { STEADY_NORMALIZER };
    (daily_baseline + weather_score + presence_ratio + voice + activity_points(messages_last_minute))
        / normalizer
}

struct Signals {
    daily_baseline: f64,
    weather_score: f64,
    messages: MessageWindow,
    starting: bool,
    baseline_source: BaselineSource,
}

pub struct MoodEngine {
    weather: Arc<dyn WeatherProvider>,
    roster: Arc<dyn RosterProvider>,
    presentation: Arc<dyn PresentationSink>,
    history: Arc<dyn MoodSink>,
    clock: Arc<dyn Clock>,
    signals: Mutex<Signals>,
    apply_lock: Mutex<()>,
    displayed: watch::Sender<Option<Mood>>,
}

impl MoodEngine {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        roster: Arc<dyn RosterProvider>,
        presentation: Arc<dyn PresentationSink>,
        history: Arc<dyn MoodSink>,
    ) -> Self {
        let mut rng = StdRng::from_entropy();
        let (displayed, _) = watch::channel(None);
        Self {
            weather,
            roster,
            presentation,
            history,
            clock: Arc::new(SystemClock),
            signals: Mutex::new(Signals {
                daily_baseline: 0.0,
                weather_score: 0.0,
                messages: MessageWindow::new(),
                starting: true,
                baseline_source: Box::new(move || rng.r#gen::<f64>()),
            }),
            apply_lock: Mutex::new(()),
            displayed,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the random draw used for the daily baseline. Values should lie in [0, 1).
    pub fn with_baseline_source(mut self, source: BaselineSource) -> Self {
        self.signals.get_mut().baseline_source = source;
        self
    }

    /// Startup sequence: baseline and weather first, then the first apply with the
    /// startup normalizer, then steady state.
    pub async fn bootstrap(&self) -> Option<Mood> {
        tracing::info!("{}", logs::MOOD_BOOTSTRAP);
        self.refresh_daily().await;
        let _ = self.refresh_weather().await;
        let applied = self.apply_current_mood().await;
        self.signals.lock().await.starting = false;
        applied
    }

    #[cfg(test)]
    pub async fn is_starting(&self) -> bool {
        self.signals.lock().await.starting
    }

    /// Redraws the daily baseline.
    pub async fn refresh_daily(&self) -> f64 {
        let mut signals = self.signals.lock().await;
        let value = (signals.baseline_source)();
        signals.daily_baseline = value;
        tracing::info!("{}", logs::daily_baseline(value));
        value
    }

    /// Fetches the weather and recomputes its score. On failure the previous score is kept.
    pub async fn refresh_weather(&self) -> Result<f64> {
        match self.weather.current().await {
            Ok(report) => {
                let score = weather_score(&report);
                self.signals.lock().await.weather_score = score;
                tracing::info!("{}", logs::weather_score(score, &report));
                Ok(score)
            }
            Err(e) => {
                let kept = self.signals.lock().await.weather_score;
                tracing::warn!("{}", logs::weather_fetch_failed(&e.to_string(), kept));
                Err(e)
            }
        }
    }

    /// Current weather score, without touching the roster.
    pub async fn weather_score(&self) -> f64 {
        self.signals.lock().await.weather_score
    }

    /// Records an inbound message sent at `at`.
    pub async fn record_message(&self, at: DateTime<Utc>) {
        let now = self.clock.now();
        self.signals.lock().await.messages.record(at, now);
    }

    /// Derives the current mood without applying it.
    pub async fn reading(&self) -> MoodReading {
        let roster = match self.roster.snapshot().await {
            Ok(roster) => roster,
            Err(e) => {
                tracing::warn!("{}", logs::roster_failed(&e.to_string()));
                RosterSnapshot::default()
            }
        };
        let presence_ratio = roster.presence_ratio();
        let voice_active = roster.voice_active();

        let now = self.clock.now();
        let mut signals = self.signals.lock().await;
        signals.messages.prune(now);
        let messages_last_minute = signals.messages.count_recent(now);

        let score = mood_points(
            signals.daily_baseline,
            signals.weather_score,
            presence_ratio,
            voice_active,
            messages_last_minute,
            signals.starting,
        );

        MoodReading {
            mood: Mood::from_score(score),
            score,
            daily_baseline: signals.daily_baseline,
            weather_score: signals.weather_score,
            presence_ratio,
            voice_active,
            messages_last_minute,
            normalizer: if signals.starting { STARTUP_NORMALIZER } else { STEADY_NORMALIZER },
        }
    }

    /// Derives the mood and applies it if it differs from the displayed one.
    /// Returns the newly presented mood, or `None` if nothing changed or presentation failed.
    /// History is only written once the new mood has been presented.
    pub async fn apply_current_mood(&self) -> Option<Mood> {
        let _apply = self.apply_lock.lock().await;
        let reading = self.reading().await;
        let previous = self.displayed();

        if previous == Some(reading.mood) {
            tracing::debug!("{}", logs::mood_unchanged(reading.mood, reading.score));
            return None;
        }

        if let Err(e) = self.presentation.present(reading.mood).await {
            tracing::error!("{}", logs::mood_present_failed(reading.mood, &e.to_string()));
            return None;
        }
        tracing::info!("{}", logs::mood_changed(previous, reading.mood, reading.score));
        self.displayed.send_replace(Some(reading.mood));

        let record = MoodRecord {
            at: self.clock.now(),
            mood: reading.mood,
            score: reading.score,
        };
        if let Err(e) = self.history.record(&record).await {
            tracing::warn!("{}", logs::mood_history_failed(&e.to_string()));
        }
        Some(reading.mood)
    }

    /// The last mood that was successfully presented.
    pub fn displayed(&self) -> Option<Mood> {
        *self.displayed.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{
        FakeRoster, FakeWeather, HangingPresentation, ManualClock, RecordingHistory,
        RecordingPresentation, member,
    };
    use crate::domain::types::WeatherReport;
    use chrono::Duration;

    const EPS: f64 = 1e-9;

    /// Weather worth exactly 0.6: temperature at optimum, everything else one width off.
    fn mild_weather() -> WeatherReport {
        WeatherReport {
            temperature: 20.0,
            humidity: 60.0,
            wind_speed: 14.0,
            cloud_cover: 60.0,
            rain_1h: Some(2.5),
            snow_1h: Some(2.5),
        }
    }

    struct Harness {
        engine: MoodEngine,
        weather: Arc<FakeWeather>,
        roster: Arc<FakeRoster>,
        presentation: Arc<RecordingPresentation>,
        history: Arc<RecordingHistory>,
        clock: Arc<ManualClock>,
    }

    fn harness(baseline: f64) -> Harness {
        let weather = Arc::new(FakeWeather::new(Ok(mild_weather())));
        let roster = Arc::new(FakeRoster::new(vec![
            member("@a:x", true, false),
            member("@b:x", false, false),
        ]));
        let presentation = Arc::new(RecordingPresentation::default());
        let history = Arc::new(RecordingHistory::default());
        let clock = Arc::new(ManualClock::default());
        let engine = MoodEngine::new(
            weather.clone(),
            roster.clone(),
            presentation.clone(),
            history.clone(),
        )
        .with_clock(clock.clone())
        .with_baseline_source(Box::new(move || baseline));
        Harness {
            engine,
            weather,
            roster,
            presentation,
            history,
            clock,
        }
    }

    #[test]
    fn test_mood_points_normalizers() {
        assert!((mood_points(0.5, 0.5, 1.0, true, 0, true) - 1.0).abs() < EPS);
        assert!((mood_points(0.5, 0.5, 1.0, true, 0, false) - 0.6).abs() < EPS);
        assert!((mood_points(0.0, 0.0, 0.0, false, 1, false) - 0.1).abs() < EPS);
    }

    #[tokio::test]
    async fn test_bootstrap_uses_startup_normalizer_then_steady() {
        let h = harness(0.3);
        assert!(h.engine.is_starting().await);

        // (0.3 + 0.6 + 0.5 + 0 + 0) / 3 ≈ 0.467
        let applied = h.engine.bootstrap().await;
        assert_eq!(applied, Some(Mood::Meh));
        assert!(!h.engine.is_starting().await);
        assert_eq!(h.presentation.calls(), vec![Mood::Meh]);

        // (0.3 + 0.6 + 0.5 + 0 + 0) / 5 = 0.28
        let reading = h.engine.reading().await;
        assert!((reading.score - 0.28).abs() < EPS);
        assert_eq!(reading.normalizer, STEADY_NORMALIZER);
        assert_eq!(reading.mood, Mood::Meh);
    }

    #[tokio::test]
    async fn test_apply_is_idempotent() {
        let h = harness(0.3);
        h.engine.bootstrap().await;

        assert_eq!(h.engine.apply_current_mood().await, None);
        assert_eq!(h.engine.apply_current_mood().await, None);
        assert_eq!(h.presentation.calls().len(), 1);
        assert_eq!(h.history.records().len(), 1);
        assert_eq!(h.engine.displayed(), Some(Mood::Meh));
    }

    #[tokio::test]
    async fn test_change_is_presented_and_recorded() {
        let h = harness(0.3);
        h.engine.bootstrap().await;

        // Everyone online, one in voice: (0.3 + 0.6 + 1 + 1 + 0) / 5 = 0.58
        h.roster.set(vec![member("@a:x", true, true), member("@b:x", true, false)]);
        assert_eq!(h.engine.apply_current_mood().await, Some(Mood::Happy));
        assert_eq!(h.presentation.calls(), vec![Mood::Meh, Mood::Happy]);

        let records = h.history.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].mood, Mood::Happy);
        assert!((records[1].score - 0.58).abs() < EPS);
        assert_eq!(records[1].at, h.clock.now());
    }

    #[tokio::test]
    async fn test_failed_presentation_is_retried_next_cycle() {
        let h = harness(0.3);
        h.presentation.fail(true);
        assert_eq!(h.engine.bootstrap().await, None);
        assert_eq!(h.engine.displayed(), None);

        h.presentation.fail(false);
        assert_eq!(h.engine.apply_current_mood().await, Some(Mood::Meh));
        assert_eq!(h.engine.displayed(), Some(Mood::Meh));
        assert_eq!(h.presentation.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_presentations_are_not_recorded() {
        let h = harness(0.3);
        h.presentation.fail(true);
        h.engine.bootstrap().await;
        h.engine.apply_current_mood().await;
        h.engine.apply_current_mood().await;
        assert_eq!(h.presentation.calls().len(), 3);
        assert!(h.history.records().is_empty());

        h.presentation.fail(false);
        assert_eq!(h.engine.apply_current_mood().await, Some(Mood::Meh));
        assert_eq!(h.engine.apply_current_mood().await, None);
        let records = h.history.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mood, Mood::Meh);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_applies_present_once() {
        let h = harness(0.3);
        let engine = Arc::new(h.engine);
        engine.refresh_daily().await;
        engine.refresh_weather().await.unwrap();

        // (0.3 + 0.6 + 0.5 + 0 + 0) / 3 ≈ 0.467
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.apply_current_mood().await })
            })
            .collect();
        let mut applied = Vec::new();
        for task in tasks {
            if let Some(mood) = task.await.unwrap() {
                applied.push(mood);
            }
        }

        assert_eq!(applied, vec![Mood::Meh]);
        assert_eq!(h.presentation.calls().len(), 1);
        assert_eq!(h.history.records().len(), 1);
        assert_eq!(engine.displayed(), Some(Mood::Meh));
    }

    #[tokio::test]
    async fn test_hung_presentation_does_not_block_readers() {
        let h = harness(0.3);
        let presentation = Arc::new(HangingPresentation::default());
        let engine = Arc::new(
            MoodEngine::new(
                h.weather.clone(),
                h.roster.clone(),
                presentation.clone(),
                h.history.clone(),
            )
            .with_clock(h.clock.clone())
            .with_baseline_source(Box::new(|| 0.3)),
        );
        engine.refresh_weather().await.unwrap();

        let pending = tokio::spawn({
            let engine = engine.clone();
            async move { engine.apply_current_mood().await }
        });
        while presentation.calls() == 0 {
            tokio::task::yield_now().await;
        }

        let limit = std::time::Duration::from_secs(5);
        assert_eq!(engine.displayed(), None);
        let score = tokio::time::timeout(limit, engine.weather_score()).await.unwrap();
        assert!((score - 0.6).abs() < EPS);
        let reading = tokio::time::timeout(limit, engine.reading()).await.unwrap();
        assert_eq!(reading.mood, Mood::Meh);
        assert!(h.history.records().is_empty());

        pending.abort();
    }

    #[tokio::test]
    async fn test_history_failure_does_not_block_presentation() {
        let h = harness(0.3);
        h.history.fail(true);
        assert_eq!(h.engine.bootstrap().await, Some(Mood::Meh));
        assert!(h.history.records().is_empty());
    }

    #[tokio::test]
    async fn test_weather_failure_keeps_previous_score() {
        let h = harness(0.3);
        h.engine.bootstrap().await;

        h.weather.set(Err("service down".to_string()));
        assert!(h.engine.refresh_weather().await.is_err());
        let reading = h.engine.reading().await;
        assert!((reading.weather_score - 0.6).abs() < EPS);
    }

    #[tokio::test]
    async fn test_weather_failure_before_first_success_is_zero() {
        let h = harness(0.3);
        h.weather.set(Err("no network".to_string()));
        h.engine.bootstrap().await;
        assert_eq!(h.engine.reading().await.weather_score, 0.0);
    }

    #[tokio::test]
    async fn test_messages_only_count_inside_window() {
        let h = harness(0.3);
        h.engine.bootstrap().await;
        let now = h.clock.now();

        h.engine.record_message(now - Duration::minutes(6)).await;
        h.engine.record_message(now - Duration::minutes(2)).await;
        assert_eq!(h.engine.reading().await.messages_last_minute, 0);

        h.engine.record_message(now - Duration::seconds(10)).await;
        let reading = h.engine.reading().await;
        assert_eq!(reading.messages_last_minute, 1);
        // (0.3 + 0.6 + 0.5 + 0 + 0.5) / 5 = 0.38
        assert!((reading.score - 0.38).abs() < EPS);

        h.clock.advance(Duration::minutes(1));
        assert_eq!(h.engine.reading().await.messages_last_minute, 0);
    }

    #[tokio::test]
    async fn test_roster_failure_counts_as_empty() {
        let h = harness(0.3);
        h.roster.fail(true);
        let reading = h.engine.reading().await;
        assert_eq!(reading.presence_ratio, 0.0);
        assert!(!reading.voice_active);
    }

    #[tokio::test]
    async fn test_daily_refresh_redraws_baseline() {
        let values = std::sync::Mutex::new(vec![0.9, 0.1]);
        let h = harness(0.0);
        let engine = h.engine.with_baseline_source(Box::new(move || {
            values.lock().map(|mut v| v.pop().unwrap_or(0.0)).unwrap_or(0.0)
        }));
        assert_eq!(engine.refresh_daily().await, 0.1);
        assert_eq!(engine.refresh_daily().await, 0.9);
        assert_eq!(engine.reading().await.daily_baseline, 0.9);
    }

    #[tokio::test]
    async fn test_default_baseline_is_unit_interval() {
        let engine = MoodEngine::new(
            Arc::new(FakeWeather::new(Ok(mild_weather()))),
            Arc::new(FakeRoster::new(vec![])),
            Arc::new(RecordingPresentation::default()),
            Arc::new(RecordingHistory::default()),
        );
        for _ in 0..100 {
            let value = engine.refresh_daily().await;
            assert!((0.0..1.0).contains(&value));
        }
    }
}
