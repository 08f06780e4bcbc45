use std::error::Error;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tokio::sync::watch;

use crate::event::{Event, EventId};
use crate::task::TaskRecord;
use crate::class::ClassRecord;

/// A store of personal tasks (usually a thin adapter over a cloud database)
#[async_trait]
pub trait TaskSource {
    /// Returns a receiver that always holds the current list of tasks, and is notified whenever it changes
    fn subscribe(&self) -> watch::Receiver<Vec<TaskRecord>>;

    /// Insert a task, or replace the task that has the same ID
    async fn save(&self, task: TaskRecord) -> Result<(), Box<dyn Error>>;
    /// Delete a task. Returns whether it existed
    async fn delete(&self, id: &EventId) -> Result<bool, Box<dyn Error>>;
    /// Returns the task with this ID
    async fn get_by_id(&self, id: &EventId) -> Result<Option<TaskRecord>, Box<dyn Error>>;
    /// Returns every task
    async fn get_all(&self) -> Result<Vec<TaskRecord>, Box<dyn Error>>;
}

/// A read-only source of the classes that take place today
pub trait ClassSource {
    /// Returns a receiver that always holds the current list of today's classes, and is notified whenever it changes
    fn subscribe(&self) -> watch::Receiver<Vec<ClassRecord>>;
}

/// What the plan adjuster needs from an event store
#[async_trait]
pub trait EventRepository {
    /// Returns every event dated in `[start, end]` (both bounds included)
    fn get_events_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<Event>;

    /// Move a task to another date.
    /// Returns `Ok(false)` in case there is no task with this ID
    async fn move_event_date(&self, id: &EventId, new_date: NaiveDate) -> Result<bool, Box<dyn Error>>;

    /// Move a task to an earlier date, and remember it has been pulled forward.
    /// Returns `Ok(false)` in case there is no task with this ID
    async fn pull_event_forward(&self, id: &EventId, new_date: NaiveDate) -> Result<bool, Box<dyn Error>>;

    /// Move a missed task to a later date, and remember it has been postponed.
    /// Returns `Ok(false)` in case there is no task with this ID
    async fn postpone_event(&self, id: &EventId, new_date: NaiveDate) -> Result<bool, Box<dyn Error>>;
}

/// Tells what "today" is
pub trait Clock: Send + Sync {
    /// The current local wall-clock date
    fn today(&self) -> NaiveDate;
}

/// The local clock of this machine
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that is stuck on a given date
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}
