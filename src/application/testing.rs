//! In-memory fakes for the domain traits, shared by unit tests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::traits::{ChatProvider, Clock, MoodSink, PresentationSink, RosterProvider, WeatherProvider};
use crate::domain::types::{MemberStatus, Mood, MoodRecord, RosterSnapshot, WeatherReport};

pub fn member(user_id: &str, online: bool, in_voice: bool) -> MemberStatus {
    MemberStatus {
        user_id: user_id.to_string(),
        online,
        in_voice,
    }
}

pub struct FakeWeather {
    next: Mutex<Result<WeatherReport, String>>,
    fetches: AtomicUsize,
}

impl FakeWeather {
    pub fn new(next: Result<WeatherReport, String>) -> Self {
        Self {
            next: Mutex::new(next),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, next: Result<WeatherReport, String>) {
        *self.next.lock().unwrap() = next;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self) -> Result<WeatherReport> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.next.lock().unwrap().clone().map_err(|e| anyhow!(e))
    }
}

/// Weather service that never answers.
#[derive(Default)]
pub struct HangingWeather {
    fetches: AtomicUsize,
}

impl HangingWeather {
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for HangingWeather {
    async fn current(&self) -> Result<WeatherReport> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

pub struct FakeRoster {
    members: Mutex<Vec<MemberStatus>>,
    failing: Mutex<bool>,
    snapshots: AtomicUsize,
}

impl FakeRoster {
    pub fn new(members: Vec<MemberStatus>) -> Self {
        Self {
            members: Mutex::new(members),
            failing: Mutex::new(false),
            snapshots: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, members: Vec<MemberStatus>) {
        *self.members.lock().unwrap() = members;
    }

    pub fn fail(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn snapshots(&self) -> usize {
        self.snapshots.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RosterProvider for FakeRoster {
    async fn snapshot(&self) -> Result<RosterSnapshot> {
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() {
            return Err(anyhow!("roster unavailable"));
        }
        Ok(RosterSnapshot {
            members: self.members.lock().unwrap().clone(),
        })
    }
}

#[derive(Default)]
pub struct RecordingPresentation {
    calls: Mutex<Vec<Mood>>,
    failing: Mutex<bool>,
}

impl RecordingPresentation {
    pub fn calls(&self) -> Vec<Mood> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl PresentationSink for RecordingPresentation {
    async fn present(&self, mood: Mood) -> Result<()> {
        self.calls.lock().unwrap().push(mood);
        if *self.failing.lock().unwrap() {
            return Err(anyhow!("status update rejected"));
        }
        Ok(())
    }
}

/// Presentation whose status update never completes.
#[derive(Default)]
pub struct HangingPresentation {
    calls: AtomicUsize,
}

impl HangingPresentation {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PresentationSink for HangingPresentation {
    async fn present(&self, _mood: Mood) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

#[derive(Default)]
pub struct RecordingHistory {
    records: Mutex<Vec<MoodRecord>>,
    failing: Mutex<bool>,
}

impl RecordingHistory {
    pub fn records(&self) -> Vec<MoodRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn fail(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl MoodSink for RecordingHistory {
    async fn record(&self, record: &MoodRecord) -> Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(anyhow!("disk full"));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Clone, Default)]
pub struct FakeChat {
    sent: std::sync::Arc<Mutex<Vec<String>>>,
}

impl FakeChat {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatProvider for FakeChat {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(content.to_string());
        Ok(format!("$event{}", sent.len()))
    }

    fn room_id(&self) -> String {
        "!test:example.org".to_string()
    }
}
