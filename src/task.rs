//! Personal to-do tasks, as stored by the task source

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::event::EventId;

/// A task can be completed at a known time, or be completed without any known completion time (e.g. when it has been marked as completed from an [`Event`](crate::Event)).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CompletionStatus {
    Completed(Option<DateTime<Utc>>),
    Uncompleted,
}
impl CompletionStatus {
    pub fn is_completed(&self) -> bool {
        match self {
            CompletionStatus::Completed(_) => true,
            _ => false,
        }
    }
}

/// Priority levels, as the task source stores them
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// The category the user filed a task into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    Study,
    Work,
    Personal,
    Activity,
}

impl TaskCategory {
    /// Coursework and jobs
    pub fn is_work_like(&self) -> bool {
        match self {
            TaskCategory::Study | TaskCategory::Work => true,
            _ => false,
        }
    }

    /// Free-time activities
    pub fn is_activity_like(&self) -> bool {
        match self {
            TaskCategory::Personal | TaskCategory::Activity => true,
            _ => false,
        }
    }
}

impl Default for TaskCategory {
    fn default() -> Self {
        TaskCategory::Study
    }
}

/// A to-do task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    id: EventId,

    title: String,
    description: Option<String>,
    date: NaiveDate,
    time: Option<NaiveTime>,
    duration_minutes: Option<u32>,
    /// The completion status of this task
    completion_status: CompletionStatus,
    priority: TaskPriority,
    category: TaskCategory,

    /// The date this task had before being pulled forward by the planner
    #[serde(default)]
    pulled_from: Option<NaiveDate>,
    /// The date this task had before the planner postponed it
    #[serde(default)]
    postponed_from: Option<NaiveDate>,

    /// The time this item was created.
    /// This can be None for tasks that were created from an existing event
    creation_date: Option<DateTime<Utc>>,
    /// The last time this item was modified
    last_modified: DateTime<Utc>,
}


impl TaskRecord {
    /// Create a brand new task.
    /// This will pick a new (random) task ID.
    pub fn new(title: String, date: NaiveDate, category: TaskCategory) -> Self {
        let new_id = EventId::random();
        let new_creation_date = Some(Utc::now());
        let new_last_modified = Utc::now();
        Self::new_with_parameters(new_id, title, None, date, None, None,
            CompletionStatus::Uncompleted, TaskPriority::Medium, category,
            None, None, new_creation_date, new_last_modified)
    }

    /// Create a new task instance, that may already exist in the task source
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_parameters(id: EventId, title: String, description: Option<String>,
                               date: NaiveDate, time: Option<NaiveTime>, duration_minutes: Option<u32>,
                               completion_status: CompletionStatus, priority: TaskPriority, category: TaskCategory,
                               pulled_from: Option<NaiveDate>, postponed_from: Option<NaiveDate>,
                               creation_date: Option<DateTime<Utc>>, last_modified: DateTime<Utc>,
                            ) -> Self
    {
        Self {
            id,
            title,
            description,
            date,
            time,
            duration_minutes,
            completion_status,
            priority,
            category,
            pulled_from,
            postponed_from,
            creation_date,
            last_modified,
        }
    }

    pub fn id(&self) -> &EventId    { &self.id          }
    pub fn title(&self) -> &str     { &self.title       }
    pub fn date(&self) -> NaiveDate { self.date         }
    pub fn time(&self) -> Option<NaiveTime>         { self.time }
    pub fn duration_minutes(&self) -> Option<u32>   { self.duration_minutes }
    pub fn completed(&self) -> bool { self.completion_status.is_completed() }
    pub fn priority(&self) -> TaskPriority          { self.priority }
    pub fn category(&self) -> TaskCategory          { self.category }
    pub fn pulled_from(&self) -> Option<NaiveDate>  { self.pulled_from }
    pub fn postponed_from(&self) -> Option<NaiveDate> { self.postponed_from }
    pub fn description(&self) -> Option<&str>       { self.description.as_deref() }
    pub fn last_modified(&self) -> &DateTime<Utc>   { &self.last_modified }
    pub fn creation_date(&self) -> Option<&DateTime<Utc>>   { self.creation_date.as_ref() }
    pub fn completion_status(&self) -> &CompletionStatus    { &self.completion_status }

    fn update_last_modified(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Rename a task.
    /// This updates its "last modified" field
    pub fn set_title(&mut self, new_title: String) {
        self.update_last_modified();
        self.title = new_title;
    }

    pub fn set_description(&mut self, new_description: Option<String>) {
        self.update_last_modified();
        self.description = new_description;
    }

    pub fn set_time(&mut self, new_time: Option<NaiveTime>) {
        self.update_last_modified();
        self.time = new_time;
    }

    pub fn set_priority(&mut self, new_priority: TaskPriority) {
        self.update_last_modified();
        self.priority = new_priority;
    }

    pub fn set_category(&mut self, new_category: TaskCategory) {
        self.update_last_modified();
        self.category = new_category;
    }

    /// Move a task to another date.
    /// This forgets whether the planner had moved it before
    pub fn set_date(&mut self, new_date: NaiveDate) {
        self.update_last_modified();
        self.date = new_date;
        self.pulled_from = None;
        self.postponed_from = None;
    }

    /// Move a task to an earlier date, remembering the date it had before
    pub fn pull_to(&mut self, new_date: NaiveDate) {
        self.update_last_modified();
        self.pulled_from = Some(self.date);
        self.postponed_from = None;
        self.date = new_date;
    }

    /// Move a missed task to a later date, remembering the date it had before
    pub fn postpone_to(&mut self, new_date: NaiveDate) {
        self.update_last_modified();
        self.postponed_from = Some(self.date);
        self.pulled_from = None;
        self.date = new_date;
    }

    /// Set the completion status
    pub fn set_completion_status(&mut self, new_completion_status: CompletionStatus) {
        self.update_last_modified();
        self.completion_status = new_completion_status;
    }
}
