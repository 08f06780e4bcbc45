//! Conversions between source records ([`TaskRecord`], [`ClassRecord`]) and [`Event`]s
//!
//! Mapping a task into an event infers its [`EventKind`] from its title and category.
//! The kind is not stored back into the task: it is inferred again at the next mapping.

use chrono::{Duration, NaiveDate, Utc};

use crate::class::{ClassRecord, ClassType};
use crate::event::{Event, EventKind, Priority, SourceTag};
use crate::task::{CompletionStatus, TaskCategory, TaskPriority, TaskRecord};

/// Words that make an activity a sport
pub const SPORT_KEYWORDS: &[&str] = &[
    "gym", "sport", "football", "soccer", "basketball", "tennis", "swim", "run", "yoga", "training",
];

/// A kind inference rule: if `matches` returns true for a (lowercase title, category), the task has kind `kind`
pub struct KindRule {
    pub name: &'static str,
    pub matches: fn(&str, TaskCategory) -> bool,
    pub kind: EventKind,
}

/// The kind inference rules, evaluated in order. The first matching rule wins
pub const KIND_RULES: &[KindRule] = &[
    KindRule { name: "midterm",     matches: is_midterm,     kind: EventKind::ExamMidterm },
    KindRule { name: "final",       matches: is_final,       kind: EventKind::ExamFinal },
    KindRule { name: "project",     matches: is_project,     kind: EventKind::Project },
    KindRule { name: "milestone",   matches: is_milestone,   kind: EventKind::SubmissionMilestone },
    KindRule { name: "weekly",      matches: is_weekly,      kind: EventKind::SubmissionWeekly },
    KindRule { name: "due",         matches: is_due,         kind: EventKind::SubmissionProject },
    KindRule { name: "sport",       matches: is_sport,       kind: EventKind::ActivitySport },
    KindRule { name: "association", matches: is_association, kind: EventKind::ActivityAssociation },
    KindRule { name: "activity",    matches: is_activity,    kind: EventKind::ActivityAssociation },
];

/// The kind of tasks that match no rule
pub const DEFAULT_KIND: EventKind = EventKind::Study;

fn is_midterm(title: &str, _: TaskCategory) -> bool     { title.contains("midterm") }
fn is_final(title: &str, _: TaskCategory) -> bool       { title.contains("final") }
fn is_milestone(title: &str, _: TaskCategory) -> bool   { title.contains("milestone") }
fn is_weekly(title: &str, _: TaskCategory) -> bool      { title.contains("weekly") }
fn is_due(title: &str, _: TaskCategory) -> bool         { title.contains("due") }
fn is_activity(_: &str, category: TaskCategory) -> bool { category.is_activity_like() }

fn is_project(title: &str, category: TaskCategory) -> bool {
    category.is_work_like() && title.contains("project")
}

fn is_sport(title: &str, category: TaskCategory) -> bool {
    category.is_activity_like() && SPORT_KEYWORDS.iter().any(|kw| title.contains(kw))
}

fn is_association(title: &str, category: TaskCategory) -> bool {
    category.is_activity_like() && title.contains("association")
}

/// Guess the kind of a task, from its title and category
pub fn infer_kind(title: &str, category: TaskCategory) -> EventKind {
    let title = title.to_lowercase();
    match KIND_RULES.iter().find(|rule| (rule.matches)(&title, category)) {
        Some(rule) => {
            log::trace!("Task {:?} matches kind rule {:?}", title, rule.name);
            rule.kind
        },
        None => DEFAULT_KIND,
    }
}

/// The category a task should be filed into when it is created from an event
pub fn category_for_kind(kind: EventKind) -> TaskCategory {
    match kind {
        EventKind::ActivitySport | EventKind::ActivityAssociation => TaskCategory::Activity,
        EventKind::Project => TaskCategory::Work,
        _ => TaskCategory::Study,
    }
}

pub fn priority_to_event(priority: TaskPriority) -> Priority {
    match priority {
        TaskPriority::Low => Priority::Low,
        TaskPriority::Medium => Priority::Medium,
        TaskPriority::High => Priority::High,
    }
}

pub fn priority_to_task(priority: Priority) -> TaskPriority {
    match priority {
        Priority::Low => TaskPriority::Low,
        Priority::Medium => TaskPriority::Medium,
        Priority::High => TaskPriority::High,
    }
}

pub fn task_to_event(task: &TaskRecord) -> Event {
    let kind = infer_kind(task.title(), task.category());
    Event::new_with_id(task.id().clone(), task.title().to_string(), task.date(), kind, SourceTag::Task)
        .with_description(task.description().map(String::from))
        .with_time(task.time())
        .with_duration_minutes(task.duration_minutes())
        .with_completed(task.completed())
        .with_priority(priority_to_event(task.priority()))
        .with_pulled_from(task.pulled_from())
        .with_postponed_from(task.postponed_from())
}

/// Turn a task event back into a task. Returns `None` for events that are not tasks.
pub fn event_to_task(event: &Event) -> Option<TaskRecord> {
    merge_event_into_task(event, None)
}

/// Turn a task event back into a task, keeping the data `existing` holds that events do not carry (category, completion date, creation date).
/// Returns `None` for events that are not tasks.
pub fn merge_event_into_task(event: &Event, existing: Option<&TaskRecord>) -> Option<TaskRecord> {
    if event.source_tag() != SourceTag::Task {
        return None;
    }

    let category = existing
        .map(|task| task.category())
        .unwrap_or_else(|| category_for_kind(event.kind()));
    let completion_status = match (event.completed(), existing.map(|task| task.completion_status())) {
        (true, Some(status)) if status.is_completed() => status.clone(),
        (true, _) => CompletionStatus::Completed(None),
        (false, _) => CompletionStatus::Uncompleted,
    };
    let creation_date = existing.and_then(|task| task.creation_date().cloned());

    Some(TaskRecord::new_with_parameters(
        event.id().clone(),
        event.title().to_string(),
        event.description().map(String::from),
        event.date(),
        event.time(),
        event.duration_minutes(),
        completion_status,
        priority_to_task(event.priority()),
        category,
        event.pulled_from(),
        event.postponed_from(),
        creation_date,
        Utc::now(),
    ))
}

pub fn class_kind(class_type: ClassType) -> EventKind {
    match class_type {
        ClassType::Lecture => EventKind::ClassLecture,
        ClassType::Lab => EventKind::ClassLab,
        ClassType::Exercise => EventKind::ClassExercise,
    }
}

fn class_type_of(kind: EventKind) -> Option<ClassType> {
    match kind {
        EventKind::ClassLecture => Some(ClassType::Lecture),
        EventKind::ClassLab => Some(ClassType::Lab),
        EventKind::ClassExercise => Some(ClassType::Exercise),
        _ => None,
    }
}

/// Map a class into an event dated `today`.
///
/// Every class is stamped with `today`, whatever day it actually recurs on.
pub fn class_to_event(class: &ClassRecord, today: NaiveDate) -> Event {
    let description = format!("{} at {} with {}", class.class_type(), class.room(), class.instructor());
    Event::new_with_id(class.id().clone(), class.course_name().to_string(), today, class_kind(class.class_type()), SourceTag::Class)
        .with_time(Some(class.start()))
        .with_duration_minutes(Some(class.duration_minutes()))
        .with_description(Some(description))
        .with_course_code(class.course_code().map(String::from))
        .with_location(Some(class.room().to_string()))
}

/// Split a `"{TYPE} at {room} with {instructor}"` description
fn parse_class_description(description: &str) -> Option<(ClassType, String, String)> {
    let (class_type, rest) = description.split_once(" at ")?;
    let (room, instructor) = rest.rsplit_once(" with ")?;
    let class_type = class_type.parse().ok()?;
    Some((class_type, room.to_string(), instructor.to_string()))
}

/// Turn a class event back into a class. Returns `None` for events that are not classes.
pub fn event_to_class(event: &Event) -> Option<ClassRecord> {
    if event.source_tag() != SourceTag::Class {
        return None;
    }

    let parsed = event.description().and_then(parse_class_description);
    let (class_type, room, instructor) = match parsed {
        Some(parsed) => parsed,
        None => {
            log::debug!("Unable to parse the description of class {}, using its other fields", event.id());
            let class_type = class_type_of(event.kind()).unwrap_or(ClassType::Lecture);
            (class_type, event.location().unwrap_or_default().to_string(), String::new())
        },
    };

    let start = match event.time() {
        Some(time) => time,
        None => {
            log::warn!("Class event {} has no start time", event.id());
            return None;
        }
    };
    let duration = Duration::minutes(i64::from(event.duration_minutes().unwrap_or(0)));
    let (end, _) = start.overflowing_add_signed(duration);

    Some(ClassRecord::new_with_id(
        event.id().clone(),
        event.title().to_string(),
        event.course_code().map(String::from),
        class_type,
        start,
        end,
        room,
        instructor,
    ))
}
