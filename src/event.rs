//! Schedulable events, the normalized view over tasks and timetabled classes

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, NaiveTime};
use bitflags::bitflags;


/// The unique identifier of an [`Event`].
///
/// It is generated once when the underlying record is created, and survives mapping round-trips.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId {
    content: String,
}

impl EventId {
    /// Generate a random EventId.
    pub fn random() -> Self {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for EventId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for EventId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl FromStr for EventId {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("An event ID cannot be empty".to_string());
        }
        Ok(Self::from(s))
    }
}
impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}



bitflags! {
    /// Groups of [`EventKind`]s, used to describe sets of kinds (e.g. the kinds the planner prefers to pull forward)
    #[derive(Serialize, Deserialize)]
    pub struct KindFamily: u8 {
        /// Lectures, labs and exercise sessions
        const CLASS = 1;
        /// Midterms and finals
        const EXAM = 2;
        const PROJECT = 4;
        /// Milestones, weekly hand-ins and project deadlines
        const SUBMISSION = 8;
        /// Sport and associations
        const ACTIVITY = 16;
        const STUDY = 32;
    }
}

impl Default for KindFamily {
    /// Learning and assessment work, that a student can productively front-load
    fn default() -> Self {
        KindFamily::EXAM | KindFamily::STUDY
    }
}


/// The category of an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ClassLecture,
    ClassLab,
    ClassExercise,
    ExamMidterm,
    ExamFinal,
    Project,
    SubmissionMilestone,
    SubmissionWeekly,
    SubmissionProject,
    ActivitySport,
    ActivityAssociation,
    Study,
}

impl EventKind {
    pub fn family(&self) -> KindFamily {
        match self {
            EventKind::ClassLecture | EventKind::ClassLab | EventKind::ClassExercise => KindFamily::CLASS,
            EventKind::ExamMidterm | EventKind::ExamFinal => KindFamily::EXAM,
            EventKind::Project => KindFamily::PROJECT,
            EventKind::SubmissionMilestone | EventKind::SubmissionWeekly | EventKind::SubmissionProject => KindFamily::SUBMISSION,
            EventKind::ActivitySport | EventKind::ActivityAssociation => KindFamily::ACTIVITY,
            EventKind::Study => KindFamily::STUDY,
        }
    }

    /// Whether this kind belongs to any family of `families`
    pub fn is_in(&self, families: KindFamily) -> bool {
        families.intersects(self.family())
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}


/// Where an event comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTag {
    /// A personal task, created by the user. It can be modified, deleted and rescheduled
    Task,
    /// A slot of the (read-only) timetable. It is only used as calendar context
    Class,
}


/// A schedulable item, either a personal task or a timetabled class
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    title: String,
    /// Local wall-clock date
    date: NaiveDate,
    /// `None` means "all day"
    time: Option<NaiveTime>,
    duration_minutes: Option<u32>,
    kind: EventKind,
    description: Option<String>,
    completed: bool,
    priority: Priority,
    course_code: Option<String>,
    location: Option<String>,
    source_tag: SourceTag,

    /// The date this event had before the planner pulled it forward (if it did)
    pulled_from: Option<NaiveDate>,
    /// The date this event had before the planner postponed it (if it did)
    postponed_from: Option<NaiveDate>,
}

impl Event {
    /// Create a brand new event, with a random ID
    pub fn new(title: String, date: NaiveDate, kind: EventKind, source_tag: SourceTag) -> Self {
        Self::new_with_id(EventId::random(), title, date, kind, source_tag)
    }

    /// Create an event for an already existing ID (e.g. when mapping a source record)
    pub fn new_with_id(id: EventId, title: String, date: NaiveDate, kind: EventKind, source_tag: SourceTag) -> Self {
        Self {
            id,
            title,
            date,
            time: None,
            duration_minutes: None,
            kind,
            description: None,
            completed: false,
            priority: Priority::default(),
            course_code: None,
            location: None,
            source_tag,
            pulled_from: None,
            postponed_from: None,
        }
    }

    pub fn with_time(mut self, time: Option<NaiveTime>) -> Self {
        self.time = time;
        self
    }
    pub fn with_duration_minutes(mut self, duration_minutes: Option<u32>) -> Self {
        self.duration_minutes = duration_minutes;
        self
    }
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
    pub fn with_course_code(mut self, course_code: Option<String>) -> Self {
        self.course_code = course_code;
        self
    }
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }
    pub fn with_pulled_from(mut self, pulled_from: Option<NaiveDate>) -> Self {
        self.pulled_from = pulled_from;
        self
    }
    pub fn with_postponed_from(mut self, postponed_from: Option<NaiveDate>) -> Self {
        self.postponed_from = postponed_from;
        self
    }

    pub fn id(&self) -> &EventId                { &self.id              }
    pub fn title(&self) -> &str                 { &self.title           }
    pub fn date(&self) -> NaiveDate             { self.date             }
    pub fn time(&self) -> Option<NaiveTime>     { self.time             }
    pub fn duration_minutes(&self) -> Option<u32> { self.duration_minutes }
    pub fn kind(&self) -> EventKind             { self.kind             }
    pub fn description(&self) -> Option<&str>   { self.description.as_deref() }
    pub fn completed(&self) -> bool             { self.completed        }
    pub fn priority(&self) -> Priority          { self.priority         }
    pub fn course_code(&self) -> Option<&str>   { self.course_code.as_deref() }
    pub fn location(&self) -> Option<&str>      { self.location.as_deref() }
    pub fn source_tag(&self) -> SourceTag       { self.source_tag       }
    pub fn pulled_from(&self) -> Option<NaiveDate> { self.pulled_from   }
    pub fn postponed_from(&self) -> Option<NaiveDate> { self.postponed_from }

    pub fn is_task(&self) -> bool {
        self.source_tag == SourceTag::Task
    }

    pub fn is_class(&self) -> bool {
        self.source_tag == SourceTag::Class
    }

    /// Whether this event is dated in `[start, end]` (both bounds included)
    pub fn is_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.date && self.date <= end
    }

    pub fn set_title(&mut self, new_title: String) {
        self.title = new_title;
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Move this event to another date.
    /// This forgets about any previous pull or postponement.
    pub fn set_date(&mut self, new_date: NaiveDate) {
        self.date = new_date;
        self.pulled_from = None;
        self.postponed_from = None;
    }

    pub fn set_time(&mut self, new_time: Option<NaiveTime>) {
        self.time = new_time;
    }
}
