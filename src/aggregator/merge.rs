//! A "latest of both" combinator that merges the task and class streams into one event stream

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::event::Event;
use crate::task::TaskRecord;
use crate::class::ClassRecord;
use crate::traits::Clock;
use crate::mapper;
use crate::utils::comparison::compare_events_chronologically;

/// Map both snapshots into events, and concatenate them in chronological order.
///
/// No deduplication happens: tasks and classes live in disjoint ID namespaces.
pub fn merge_snapshots(tasks: &[TaskRecord], classes: &[ClassRecord], today: NaiveDate) -> Vec<Event> {
    let mut events: Vec<Event> = tasks.iter()
        .map(mapper::task_to_event)
        .chain(classes.iter().map(|class| mapper::class_to_event(class, today)))
        .collect();
    events.sort_by(compare_events_chronologically);
    events
}

/// Spawn a tokio task that republishes the merged events on `output` whenever either input changes.
///
/// It stops once both inputs are closed, or once nobody listens to `output` anymore.
pub fn spawn_merge(
    mut tasks_rx: watch::Receiver<Vec<TaskRecord>>,
    mut classes_rx: watch::Receiver<Vec<ClassRecord>>,
    clock: Arc<dyn Clock>,
    output: watch::Sender<Vec<Event>>,
) -> JoinHandle<()>
{
    tokio::spawn(async move {
        let mut tasks_open = true;
        let mut classes_open = true;

        loop {
            tokio::select! {
                changed = tasks_rx.changed(), if tasks_open => {
                    if changed.is_err() {
                        log::debug!("Task source closed");
                        tasks_open = false;
                        continue;
                    }
                },
                changed = classes_rx.changed(), if classes_open => {
                    if changed.is_err() {
                        log::debug!("Class source closed");
                        classes_open = false;
                        continue;
                    }
                },
                _ = output.closed(), if tasks_open || classes_open => {
                    log::debug!("Nobody listens to merged events anymore");
                    break;
                },
                else => break,
            }

            let merged = {
                let tasks = tasks_rx.borrow_and_update();
                let classes = classes_rx.borrow_and_update();
                merge_snapshots(&tasks, &classes, clock.today())
            };
            log::trace!("Publishing {} merged events", merged.len());
            output.send_replace(merged);
        }
        log::debug!("Event merge stopped");
    })
}
