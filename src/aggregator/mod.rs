//! This module merges the task source and the class source into a single virtual source of [`Event`]s
//!
//! Only tasks can be modified through it: classes come from a read-only timetable.

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::event::{Event, EventId, SourceTag};
use crate::task::TaskRecord;
use crate::class::ClassRecord;
use crate::traits::{ClassSource, Clock, EventRepository, TaskSource};
use crate::planner::{week_end, week_start};
use crate::mapper;

pub mod merge;


/// A source of events that combines a [`TaskSource`] and a [`ClassSource`].
///
/// The merged events can be observed with [`EventAggregator::subscribe`], or read synchronously with the `get_events_*` functions.
/// An aggregator must be created from within a tokio runtime, because it spawns the task that keeps the merged events up to date.
pub struct EventAggregator<T, C>
where
    T: TaskSource,
    C: ClassSource,
{
    tasks: Arc<T>,
    classes: Arc<C>,
    clock: Arc<dyn Clock>,

    tasks_rx: watch::Receiver<Vec<TaskRecord>>,
    classes_rx: watch::Receiver<Vec<ClassRecord>>,
    merged_rx: watch::Receiver<Vec<Event>>,
    merge_handle: JoinHandle<()>,
}

impl<T, C> EventAggregator<T, C>
where
    T: TaskSource,
    C: ClassSource,
{
    /// Create an aggregator. `clock` tells the date classes are mapped to.
    pub fn new(tasks: Arc<T>, classes: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        let tasks_rx = tasks.subscribe();
        let classes_rx = classes.subscribe();

        let initial = merge::merge_snapshots(&tasks_rx.borrow(), &classes_rx.borrow(), clock.today());
        let (merged_tx, merged_rx) = watch::channel(initial);
        let merge_handle = merge::spawn_merge(tasks_rx.clone(), classes_rx.clone(), clock.clone(), merged_tx);

        Self { tasks, classes, clock, tasks_rx, classes_rx, merged_rx, merge_handle }
    }

    /// Returns the task source
    pub fn tasks(&self) -> &T { &self.tasks }
    /// Returns the class source
    pub fn classes(&self) -> &C { &self.classes }

    /// Returns a receiver that is notified with the merged events whenever a source changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<Event>> {
        self.merged_rx.clone()
    }

    /// The current merged events, in chronological order
    pub fn events(&self) -> Vec<Event> {
        let tasks = self.tasks_rx.borrow();
        let classes = self.classes_rx.borrow();
        merge::merge_snapshots(&tasks, &classes, self.clock.today())
    }

    /// Returns the first event that has this ID, if any
    pub fn get_by_id(&self, id: &EventId) -> Option<Event> {
        self.events().into_iter().find(|event| event.id() == id)
    }

    /// Returns every event dated in `[start, end]` (both bounds included)
    pub fn get_events_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<Event> {
        self.events().into_iter()
            .filter(|event| event.is_between(start, end))
            .collect()
    }

    pub fn get_events_for_date(&self, date: NaiveDate) -> Vec<Event> {
        self.get_events_between(date, date)
    }

    /// Returns the events of the Monday-to-Sunday week `date` belongs to
    pub fn get_events_for_week(&self, date: NaiveDate) -> Vec<Event> {
        self.get_events_between(week_start(date), week_end(date))
    }

    /// Insert or replace a task event.
    ///
    /// Class events cannot be saved through an aggregator: this returns an error for them.
    pub async fn save(&self, event: &Event) -> Result<(), Box<dyn Error>> {
        if event.source_tag() != SourceTag::Task {
            return Err(format!("Unsupported mutation: {} is not a task and cannot be saved", event.id()).into());
        }

        let existing = self.tasks.get_by_id(event.id()).await?;
        self.save_task_event(event, existing.as_ref()).await
    }

    /// Replace an existing task event. Returns `Ok(false)` in case there is no such task.
    ///
    /// Class events cannot be updated through an aggregator: this returns an error for them.
    pub async fn update(&self, event: &Event) -> Result<bool, Box<dyn Error>> {
        if event.source_tag() != SourceTag::Task {
            return Err(format!("Unsupported mutation: {} is not a task and cannot be updated", event.id()).into());
        }

        let existing = match self.tasks.get_by_id(event.id()).await? {
            None => {
                log::debug!("No task {} to update", event.id());
                return Ok(false);
            },
            Some(task) => task,
        };
        self.save_task_event(event, Some(&existing)).await?;
        Ok(true)
    }

    async fn save_task_event(&self, event: &Event, existing: Option<&TaskRecord>) -> Result<(), Box<dyn Error>> {
        let task = match mapper::merge_event_into_task(event, existing) {
            None => return Err(format!("Unable to map event {} into a task", event.id()).into()),
            Some(task) => task,
        };
        self.tasks.save(task).await
    }

    /// Delete a task. Returns whether such a task existed.
    ///
    /// Classes cannot be deleted: their IDs are never found.
    pub async fn delete(&self, id: &EventId) -> Result<bool, Box<dyn Error>> {
        let deleted = self.tasks.delete(id).await?;
        if deleted == false && self.classes_rx.borrow().iter().any(|class| class.id() == id) {
            log::warn!("{} is a class, it cannot be deleted", id);
        }
        Ok(deleted)
    }

    /// Move a task to another date. Returns `Ok(false)` in case there is no such task
    pub async fn move_event_date(&self, id: &EventId, new_date: NaiveDate) -> Result<bool, Box<dyn Error>> {
        let mut task = match self.tasks.get_by_id(id).await? {
            None => {
                log::debug!("No task {} to move", id);
                return Ok(false);
            },
            Some(task) => task,
        };
        log::debug!("Moving task {} from {} to {}", id, task.date(), new_date);
        task.set_date(new_date);
        self.tasks.save(task).await?;
        Ok(true)
    }

    /// Move a task to an earlier date, remembering it has been pulled forward.
    /// Returns `Ok(false)` in case there is no such task
    pub async fn pull_event_forward(&self, id: &EventId, new_date: NaiveDate) -> Result<bool, Box<dyn Error>> {
        let mut task = match self.tasks.get_by_id(id).await? {
            None => {
                log::debug!("No task {} to pull forward", id);
                return Ok(false);
            },
            Some(task) => task,
        };
        log::debug!("Pulling task {} from {} to {}", id, task.date(), new_date);
        task.pull_to(new_date);
        self.tasks.save(task).await?;
        Ok(true)
    }

    /// Move a missed task to a later date, remembering it has been postponed.
    /// Returns `Ok(false)` in case there is no such task
    pub async fn postpone_event(&self, id: &EventId, new_date: NaiveDate) -> Result<bool, Box<dyn Error>> {
        let mut task = match self.tasks.get_by_id(id).await? {
            None => {
                log::debug!("No task {} to postpone", id);
                return Ok(false);
            },
            Some(task) => task,
        };
        log::debug!("Postponing task {} from {} to {}", id, task.date(), new_date);
        task.postpone_to(new_date);
        self.tasks.save(task).await?;
        Ok(true)
    }

    /// Returns the events of the week after the week `date` belongs to
    pub fn get_events_for_next_week(&self, date: NaiveDate) -> Vec<Event> {
        let next = date + Duration::days(7);
        self.get_events_for_week(next)
    }
}

impl<T, C> Drop for EventAggregator<T, C>
where
    T: TaskSource,
    C: ClassSource,
{
    fn drop(&mut self) {
        self.merge_handle.abort();
    }
}

#[async_trait]
impl<T, C> EventRepository for EventAggregator<T, C>
where
    T: TaskSource + Send + Sync,
    C: ClassSource + Send + Sync,
{
    fn get_events_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<Event> {
        EventAggregator::get_events_between(self, start, end)
    }

    async fn move_event_date(&self, id: &EventId, new_date: NaiveDate) -> Result<bool, Box<dyn Error>> {
        EventAggregator::move_event_date(self, id, new_date).await
    }

    async fn pull_event_forward(&self, id: &EventId, new_date: NaiveDate) -> Result<bool, Box<dyn Error>> {
        EventAggregator::pull_event_forward(self, id, new_date).await
    }

    async fn postpone_event(&self, id: &EventId, new_date: NaiveDate) -> Result<bool, Box<dyn Error>> {
        EventAggregator::postpone_event(self, id, new_date).await
    }
}
