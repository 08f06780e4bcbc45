//! Adjust the plan of the current week, for tasks stored in a local JSON file
//!
//! Usage: `edumon-rebalance <tasks.json> [timetable.json] [planner-config.json]`

use std::path::Path;
use std::sync::Arc;

use edumon_planner::adjuster::progress::{feedback_channel, AdjustEvent, FeedbackReceiver};
use edumon_planner::config::PlannerConfig;
use edumon_planner::store::{TaskStore, Timetable};
use edumon_planner::traits::{Clock, SystemClock};
use edumon_planner::{AdaptivePlanner, EventAggregator, PlanAdjuster};

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let tasks_path = match args.get(1) {
        Some(path) => Path::new(path),
        None => {
            eprintln!("Usage: {} <tasks.json> [timetable.json] [planner-config.json]", args[0]);
            std::process::exit(1);
        }
    };

    let tasks = match TaskStore::open_or_create(tasks_path) {
        Ok(store) => store,
        Err(err) => {
            log::error!("Invalid task file {:?}: {}. Leaving it untouched", tasks_path, err);
            std::process::exit(1);
        }
    };
    let timetable = match args.get(2) {
        None => Timetable::default(),
        Some(path) => Timetable::from_file(Path::new(path)).unwrap_or_else(|err| {
            log::warn!("Invalid timetable file: {}. Using an empty timetable", err);
            Timetable::default()
        }),
    };
    let config = match args.get(3) {
        None => PlannerConfig::default(),
        Some(path) => PlannerConfig::from_file(Path::new(path)).unwrap_or_else(|err| {
            log::warn!("Invalid planner configuration: {}. Using the default one", err);
            PlannerConfig::default()
        }),
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let today = clock.today();
    let aggregator = Arc::new(EventAggregator::new(Arc::new(tasks), Arc::new(timetable), clock));

    println!("---- This week, before adjustment -----");
    edumon_planner::utils::print_event_list(&aggregator.get_events_for_week(today));

    let adjuster = PlanAdjuster::new(aggregator.clone(), AdaptivePlanner::new(config));
    let (sender, receiver) = feedback_channel();
    let feedback = tokio::spawn(display_feedback(receiver));
    let report = adjuster.rebalance_with_feedback(today, sender).await;
    if let Err(err) = feedback.await {
        log::warn!("Unable to display the progress: {}", err);
    }
    if report.is_success() == false {
        log::warn!("{} task(s) could not be moved, see the previous log lines for more info. You can safely run this again.", report.failed.len());
    }
    for moved in &report.moved {
        println!("Moved {} from {} to {}", moved.id, moved.from, moved.to);
    }
    if let Some(pulled) = &report.pulled {
        println!("Pulled {} from {} to {}", pulled.id, pulled.from, pulled.to);
    }

    if let Err(err) = aggregator.tasks().save_to_file() {
        log::error!("Unable to save the tasks: {}", err);
    }

    println!("---- This week, after adjustment -----");
    edumon_planner::utils::print_event_list(&aggregator.get_events_for_week(today));
}

async fn display_feedback(mut receiver: FeedbackReceiver) {
    loop {
        if receiver.changed().await.is_err() {
            break;
        }
        let event = receiver.borrow_and_update().clone();
        println!("  [{}]", event);
        if let AdjustEvent::Finished{ .. } = event {
            break;
        }
    }
}
