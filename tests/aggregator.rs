//! Tests of the event aggregator, over in-memory stores

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use edumon_planner::store::{TaskStore, Timetable};
use edumon_planner::traits::{Clock, FixedClock, TaskSource};
use edumon_planner::{ClassRecord, ClassType, Event, EventAggregator, EventId, EventKind, SourceTag, TaskCategory, TaskRecord};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Thursday, March 6th 2025
fn today() -> NaiveDate {
    ymd(2025, 3, 6)
}

fn lecture() -> ClassRecord {
    ClassRecord::new(
        "Operating systems".to_string(),
        ClassType::Lecture,
        NaiveTime::from_hms_opt(10, 15, 0).unwrap(),
        NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        "INM 202".to_string(),
        "Dr. Moreau".to_string(),
    )
}

fn new_aggregator(classes: Vec<ClassRecord>) -> EventAggregator<TaskStore, Timetable> {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(today()));
    EventAggregator::new(
        Arc::new(TaskStore::new(Path::new("unused_aggregator_store.json"))),
        Arc::new(Timetable::new(classes)),
        clock,
    )
}

#[tokio::test]
async fn test_merged_events() {
    let _ = env_logger::builder().is_test(true).try_init();

    let class = lecture();
    let aggregator = new_aggregator(vec![class.clone()]);

    let mut task = TaskRecord::new("Midterm revision".to_string(), today(), TaskCategory::Study);
    task.set_time(NaiveTime::from_hms_opt(8, 0, 0));
    aggregator.tasks().save(task.clone()).await.unwrap();
    aggregator.tasks().save(TaskRecord::new("Gym".to_string(), ymd(2025, 3, 8), TaskCategory::Personal)).await.unwrap();

    let events = aggregator.events();
    assert_eq!(events.len(), 3);
    // Chronological order: the 8:00 task, the 10:15 class, then Saturday's gym
    assert_eq!(events[0].id(), task.id());
    assert_eq!(events[0].kind(), EventKind::ExamMidterm);
    assert_eq!(events[1].id(), class.id());
    assert_eq!(events[1].source_tag(), SourceTag::Class);
    assert_eq!(events[1].date(), today());
    assert_eq!(events[2].kind(), EventKind::ActivitySport);

    assert_eq!(aggregator.get_events_for_date(today()).len(), 2);
    assert_eq!(aggregator.get_events_for_week(today()).len(), 3);
    assert!(aggregator.get_events_for_next_week(today()).is_empty());
    // Both bounds are included
    assert_eq!(aggregator.get_events_between(today(), ymd(2025, 3, 8)).len(), 3);
    assert_eq!(aggregator.get_events_between(ymd(2025, 3, 7), ymd(2025, 3, 8)).len(), 1);

    assert_eq!(aggregator.get_by_id(class.id()).map(|e| e.title().to_string()), Some("Operating systems".to_string()));
    assert!(aggregator.get_by_id(&EventId::from("does-not-exist")).is_none());
}

#[tokio::test]
async fn test_subscription() {
    let _ = env_logger::builder().is_test(true).try_init();

    let aggregator = new_aggregator(Vec::new());
    let mut receiver = aggregator.subscribe();
    assert!(receiver.borrow_and_update().is_empty());

    let event = Event::new("Read chapter 5".to_string(), ymd(2025, 3, 7), EventKind::Study, SourceTag::Task);
    aggregator.save(&event).await.unwrap();
    receiver.changed().await.unwrap();
    assert_eq!(receiver.borrow_and_update().len(), 1);

    aggregator.classes().add_class(lecture());
    receiver.changed().await.unwrap();
    let merged = receiver.borrow_and_update().clone();
    assert_eq!(merged.len(), 2);
    assert!(merged.iter().any(|e| e.is_class()));
    assert!(merged.iter().any(|e| e.id() == event.id()));

    aggregator.classes().set_classes(Vec::new());
    receiver.changed().await.unwrap();
    let merged = receiver.borrow_and_update().clone();
    assert_eq!(merged.len(), 1);
    assert!(merged.iter().all(|e| e.is_task()));
    assert!(aggregator.classes().classes().is_empty());
}

#[tokio::test]
async fn test_task_mutations() {
    let _ = env_logger::builder().is_test(true).try_init();

    let aggregator = new_aggregator(Vec::new());

    let mut event = Event::new("Weekly sheet 4".to_string(), ymd(2025, 3, 7), EventKind::Study, SourceTag::Task);
    aggregator.save(&event).await.unwrap();
    // The kind is inferred again from the title
    assert_eq!(aggregator.get_by_id(event.id()).unwrap().kind(), EventKind::SubmissionWeekly);

    event.set_completed(true);
    assert!(aggregator.update(&event).await.unwrap());
    assert!(aggregator.get_by_id(event.id()).unwrap().completed());
    let stored = aggregator.tasks().get_by_id(event.id()).await.unwrap().unwrap();
    assert!(stored.completed());

    let unknown = Event::new("Never saved".to_string(), today(), EventKind::Study, SourceTag::Task);
    assert!(aggregator.update(&unknown).await.unwrap() == false);

    assert!(aggregator.move_event_date(event.id(), ymd(2025, 3, 14)).await.unwrap());
    assert_eq!(aggregator.get_by_id(event.id()).unwrap().date(), ymd(2025, 3, 14));
    assert!(aggregator.move_event_date(unknown.id(), ymd(2025, 3, 14)).await.unwrap() == false);

    assert!(aggregator.pull_event_forward(event.id(), today()).await.unwrap());
    let pulled = aggregator.get_by_id(event.id()).unwrap();
    assert_eq!(pulled.date(), today());
    assert_eq!(pulled.pulled_from(), Some(ymd(2025, 3, 14)));

    assert!(aggregator.delete(event.id()).await.unwrap());
    assert!(aggregator.delete(event.id()).await.unwrap() == false);
    assert!(aggregator.events().is_empty());
}

#[tokio::test]
async fn test_classes_are_read_only() {
    let _ = env_logger::builder().is_test(true).try_init();

    let class = lecture();
    let aggregator = new_aggregator(vec![class.clone()]);
    let class_event = aggregator.get_by_id(class.id()).unwrap();

    assert!(aggregator.save(&class_event).await.is_err());
    assert!(aggregator.update(&class_event).await.is_err());
    assert!(aggregator.delete(class.id()).await.unwrap() == false);
    assert!(aggregator.move_event_date(class.id(), ymd(2025, 3, 13)).await.unwrap() == false);

    assert!(aggregator.tasks().get_all().await.unwrap().is_empty());
    assert_eq!(aggregator.classes().classes(), vec![class]);
}
