//! This module applies the decisions of the [`AdaptivePlanner`] to an [`EventRepository`]
//!
//! This is a best-effort process: a move that fails is logged and skipped, and never aborts the other moves.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use crate::event::EventId;
use crate::planner::{self, AdaptivePlanner};
use crate::traits::EventRepository;

pub mod progress;
use progress::AdjustProgress;
use progress::{AdjustEvent, FeedbackSender};


/// A task that has been moved
#[derive(Clone, Debug, PartialEq)]
pub struct Move {
    pub id: EventId,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// What a plan adjustment has done
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjustReport {
    /// Missed tasks that have been moved one week forward
    pub moved: Vec<Move>,
    /// The task that has been pulled into the current week, if any
    pub pulled: Option<Move>,
    /// Tasks the planner wanted to move, but that could not be moved
    pub failed: Vec<EventId>,
}

impl AdjustReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Whether nothing has been moved
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.pulled.is_none()
    }
}


/// Drives an [`AdaptivePlanner`] against an [`EventRepository`] (usually an [`EventAggregator`](crate::aggregator::EventAggregator))
pub struct PlanAdjuster<R>
where
    R: EventRepository,
{
    repository: Arc<R>,
    planner: AdaptivePlanner,
}

impl<R> PlanAdjuster<R>
where
    R: EventRepository,
{
    pub fn new(repository: Arc<R>, planner: AdaptivePlanner) -> Self {
        Self { repository, planner }
    }

    pub fn repository(&self) -> &R { &self.repository }
    pub fn planner(&self) -> &AdaptivePlanner { &self.planner }

    /// Adjust the plan of the week `today` belongs to, and provide feedback to the user about the progress.
    ///
    /// See [`Self::rebalance`]
    pub async fn rebalance_with_feedback(&self, today: NaiveDate, feedback_sender: FeedbackSender) -> AdjustReport {
        let mut progress = AdjustProgress::new_with_feedback_channel(feedback_sender);
        self.run_adjustment(today, &mut progress).await
    }

    /// Adjust the plan of the week `today` belongs to:
    /// * missed tasks are moved one week forward
    /// * in case the user has completed tasks earlier than planned, a task of next week is pulled into the current week
    ///
    /// Running it again without any user edit in between does not move anything.
    /// Moves that fail are logged and listed in the returned report. Running this function again will retry them.
    pub async fn rebalance(&self, today: NaiveDate) -> AdjustReport {
        let mut progress = AdjustProgress::new();
        self.run_adjustment(today, &mut progress).await
    }

    async fn run_adjustment(&self, today: NaiveDate, progress: &mut AdjustProgress) -> AdjustReport {
        progress.info(&format!("Adjusting the plan for {}", today));
        progress.feedback(AdjustEvent::Started);

        let start = planner::week_start(today);
        let end = planner::week_end(today);
        let next_start = start + Duration::days(7);
        let next_end = end + Duration::days(7);

        let current_week = self.repository.get_events_between(start, end);
        let next_week = self.repository.get_events_between(next_start, next_end);
        progress.debug(&format!("{} events from {} to {}, {} events the week after", current_week.len(), start, end, next_week.len()));

        let plan = self.planner.plan(today, &current_week, &next_week);
        let mut report = AdjustReport::default();

        for missed in plan.moved_missed {
            let new_date = planner::rescheduled_date(&missed);
            progress.debug(&format!("> Moving missed task {} ({}) from {} to {}", missed.id(), missed.title(), missed.date(), new_date));
            progress.feedback(AdjustEvent::InProgress{
                moves_done_already: progress.counter(),
                details: missed.title().to_string(),
            });

            match self.repository.postpone_event(missed.id(), new_date).await {
                Err(err) => {
                    progress.error(&format!("Unable to move task {}: {}. Skipping it this time", missed.id(), err));
                    report.failed.push(missed.id().clone());
                },
                Ok(false) => {
                    progress.warn(&format!("Task {} has vanished, it cannot be moved", missed.id()));
                    report.failed.push(missed.id().clone());
                },
                Ok(true) => {
                    report.moved.push(Move { id: missed.id().clone(), from: missed.date(), to: new_date });
                },
            }
            progress.increment_counter(1);
        }

        if let Some(pulled) = plan.pulled_earlier {
            let new_date = self.planner.target_date_for_pull(today, &current_week);
            progress.debug(&format!("> Pulling task {} ({}) from {} to {}", pulled.id(), pulled.title(), pulled.date(), new_date));
            progress.feedback(AdjustEvent::InProgress{
                moves_done_already: progress.counter(),
                details: pulled.title().to_string(),
            });

            match self.repository.pull_event_forward(pulled.id(), new_date).await {
                Err(err) => {
                    progress.error(&format!("Unable to pull task {}: {}. Skipping it this time", pulled.id(), err));
                    report.failed.push(pulled.id().clone());
                },
                Ok(false) => {
                    progress.warn(&format!("Task {} has vanished, it cannot be pulled", pulled.id()));
                    report.failed.push(pulled.id().clone());
                },
                Ok(true) => {
                    report.pulled = Some(Move { id: pulled.id().clone(), from: pulled.date(), to: new_date });
                },
            }
            progress.increment_counter(1);
        }

        progress.info(&format!("Plan adjusted: {} task(s) moved forward, {} pulled, {} failure(s)",
            report.moved.len(), report.pulled.iter().count(), report.failed.len()));
        progress.feedback(AdjustEvent::Finished{ success: progress.is_success() });
        report
    }
}
