//! The adaptive weekly planner
//!
//! Given "today" and the events of the current and the next week, it decides
//! * which missed tasks should move one week forward
//! * which task of next week should be pulled into the current week, when the user has finished something early
//!
//! This is pure computation: applying the decisions is the job of the [`PlanAdjuster`](crate::adjuster::PlanAdjuster).

use chrono::{Datelike, Duration, NaiveDate};

use crate::config::{PlannerConfig, PullTarget};
use crate::event::Event;
use crate::utils::comparison::compare_events_by_date_and_time;

/// How far a missed task is moved
pub const MISSED_TASK_SHIFT_DAYS: i64 = 7;

/// The Monday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The Sunday of the week `date` belongs to
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// The date a missed task should be moved to
pub fn rescheduled_date(missed: &Event) -> NaiveDate {
    missed.date() + Duration::days(MISSED_TASK_SHIFT_DAYS)
}

/// A missed task: still pending, and dated strictly before today
pub fn is_missed(event: &Event, today: NaiveDate) -> bool {
    event.is_task() && event.completed() == false && event.date() < today
}

/// A task finished early: completed, yet dated strictly after today
pub fn is_completed_early(event: &Event, today: NaiveDate) -> bool {
    event.is_task() && event.completed() && event.date() > today
}

/// The moves the planner wants to apply
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanAdjustment {
    /// Missed tasks, that should be moved one week forward
    pub moved_missed: Vec<Event>,
    /// A task of next week, that should be pulled into the current week
    pub pulled_earlier: Option<Event>,
}

impl PlanAdjustment {
    pub fn is_empty(&self) -> bool {
        self.moved_missed.is_empty() && self.pulled_earlier.is_none()
    }
}


/// Decides how to adapt the plan of the current week
#[derive(Clone, Debug, Default)]
pub struct AdaptivePlanner {
    config: PlannerConfig,
}

impl AdaptivePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Compute the adjustments for the current week.
    ///
    /// `current_week` and `next_week` are used as given: they are not filtered by date.
    pub fn plan(&self, today: NaiveDate, current_week: &[Event], next_week: &[Event]) -> PlanAdjustment {
        let moved_missed: Vec<Event> = current_week.iter()
            .filter(|event| is_missed(event, today))
            .cloned()
            .collect();

        let pulled_earlier = if self.spare_capacity(today, current_week) > 0 {
            self.pick_pull_candidate(next_week)
        } else {
            None
        };

        log::debug!("Plan for {}: {} missed task(s), pulling {:?}",
            today, moved_missed.len(), pulled_earlier.as_ref().map(|event| event.title()));
        PlanAdjustment { moved_missed, pulled_earlier }
    }

    /// How many tasks can still be pulled into the current week.
    ///
    /// Every task finished early frees one slot. Every task already pulled into this week uses one.
    pub fn spare_capacity(&self, today: NaiveDate, current_week: &[Event]) -> usize {
        let freed = current_week.iter()
            .filter(|event| is_completed_early(event, today))
            .count();
        let used = current_week.iter()
            .filter(|event| event.is_task() && event.pulled_from().is_some())
            .count();
        freed.saturating_sub(used)
    }

    /// Pick the pending task of `next_week` to pull, preferring the configured kinds, then the earliest one.
    ///
    /// Tasks the planner has postponed into next week are never pulled back.
    pub fn pick_pull_candidate(&self, next_week: &[Event]) -> Option<Event> {
        let candidates: Vec<&Event> = next_week.iter()
            .filter(|event| event.is_task() && event.completed() == false)
            .filter(|event| event.postponed_from().is_none())
            .collect();

        let preferred: Vec<&Event> = candidates.iter()
            .filter(|event| event.kind().is_in(self.config.preferred_kinds))
            .cloned()
            .collect();

        let pool = if preferred.is_empty() { candidates } else { preferred };
        pool.into_iter()
            .min_by(|l, r| compare_events_by_date_and_time(l, r))
            .cloned()
    }

    /// The date a pulled task should land on. This always is in `[today, week_end(today)]`
    pub fn target_date_for_pull(&self, today: NaiveDate, current_week: &[Event]) -> NaiveDate {
        match self.config.pull_target {
            PullTarget::Today => today,
            PullTarget::FirstFreeDay => {
                let end = week_end(today);
                let mut day = today;
                while day <= end {
                    let busy = current_week.iter()
                        .any(|event| event.is_task() && event.completed() == false && event.date() == day);
                    if busy == false {
                        return day;
                    }
                    day = day + Duration::days(1);
                }
                today
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};
    use crate::event::{EventKind, KindFamily, SourceTag};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Thursday, March 6th 2025
    fn today() -> NaiveDate {
        ymd(2025, 3, 6)
    }

    fn task(title: &str, date: NaiveDate, kind: EventKind) -> Event {
        Event::new(title.to_string(), date, kind, SourceTag::Task)
    }

    fn at(event: Event, hour: u32, minute: u32) -> Event {
        event.with_time(NaiveTime::from_hms_opt(hour, minute, 0))
    }

    #[test]
    fn week_boundaries() {
        let mut date = ymd(2024, 12, 20);
        for _ in 0..30 {
            let start = week_start(date);
            let end = week_end(date);
            assert_eq!(start.weekday(), Weekday::Mon);
            assert_eq!(end.weekday(), Weekday::Sun);
            assert_eq!(end - start, Duration::days(6));
            assert!(start <= date && date <= end);
            date = date + Duration::days(1);
        }

        assert_eq!(week_start(today()), ymd(2025, 3, 3));
        assert_eq!(week_end(today()), ymd(2025, 3, 9));
        // Across a year boundary
        assert_eq!(week_start(ymd(2025, 1, 1)), ymd(2024, 12, 30));
    }

    #[test]
    fn missed_tasks_move_forward() {
        let missed = task("Weekly sheet 2", ymd(2025, 3, 5), EventKind::SubmissionWeekly);
        let planner = AdaptivePlanner::default();

        let plan = planner.plan(today(), &[missed.clone()], &[]);
        assert_eq!(plan.moved_missed, vec![missed.clone()]);
        assert_eq!(plan.pulled_earlier, None);
        assert_eq!(rescheduled_date(&missed), ymd(2025, 3, 12));
    }

    #[test]
    fn only_pending_past_tasks_are_missed() {
        let planner = AdaptivePlanner::default();
        let current_week = vec![
            task("Pending, yesterday", ymd(2025, 3, 5), EventKind::Study),
            task("Pending, Monday", ymd(2025, 3, 3), EventKind::Project),
            task("Done, yesterday", ymd(2025, 3, 5), EventKind::Study).with_completed(true),
            task("Pending, today", today(), EventKind::Study),
            task("Pending, tomorrow", ymd(2025, 3, 7), EventKind::Study),
            Event::new("Lecture".to_string(), ymd(2025, 3, 4), EventKind::ClassLecture, SourceTag::Class),
        ];

        let plan = planner.plan(today(), &current_week, &[]);
        let titles: Vec<&str> = plan.moved_missed.iter().map(|e| e.title()).collect();
        assert_eq!(titles, vec!["Pending, yesterday", "Pending, Monday"]);
        assert!(plan.moved_missed.iter().all(|e| e.is_task() && e.completed() == false));
    }

    #[test]
    fn no_pull_without_early_completion() {
        let planner = AdaptivePlanner::default();
        let next_week = vec![
            task("Read chapter 5", ymd(2025, 3, 10), EventKind::Study),
            task("Midterm", ymd(2025, 3, 11), EventKind::ExamMidterm),
        ];
        let current_weeks = vec![
            vec![],
            vec![task("Done today", today(), EventKind::Study).with_completed(true)],
            vec![task("Done, past", ymd(2025, 3, 4), EventKind::Study).with_completed(true)],
            vec![task("Pending, future", ymd(2025, 3, 8), EventKind::Study)],
            vec![Event::new("Lab".to_string(), ymd(2025, 3, 8), EventKind::ClassLab, SourceTag::Class).with_completed(true)],
        ];

        for current_week in current_weeks {
            let plan = planner.plan(today(), &current_week, &next_week);
            assert_eq!(plan.pulled_earlier, None);
        }
    }

    #[test]
    fn pull_prefers_study_and_exams() {
        let planner = AdaptivePlanner::default();
        let current_week = vec![task("Weekly sheet 3", ymd(2025, 3, 7), EventKind::SubmissionWeekly).with_completed(true)];
        let lab = task("Prepare the lab", ymd(2025, 3, 10), EventKind::ClassLab);
        let study = task("Read chapter 5", ymd(2025, 3, 12), EventKind::Study);

        let plan = planner.plan(today(), &current_week, &[lab, study.clone()]);
        assert_eq!(plan.pulled_earlier, Some(study));
        assert!(plan.moved_missed.is_empty());
    }

    #[test]
    fn pull_earliest_when_nothing_is_preferred() {
        let planner = AdaptivePlanner::default();
        let current_week = vec![task("Weekly sheet 3", ymd(2025, 3, 7), EventKind::SubmissionWeekly).with_completed(true)];
        let late = at(task("Team project", ymd(2025, 3, 11), EventKind::Project), 16, 0);
        let early = at(task("Gym", ymd(2025, 3, 11), EventKind::ActivitySport), 9, 0);

        let plan = planner.plan(today(), &current_week, &[late, early.clone()]);
        assert_eq!(plan.pulled_earlier, Some(early));
    }

    #[test]
    fn tie_breaks() {
        let planner = AdaptivePlanner::default();
        let all_day = task("All day", ymd(2025, 3, 10), EventKind::Study);
        let morning = at(task("Morning", ymd(2025, 3, 10), EventKind::Study), 8, 0);
        let evening = at(task("Evening", ymd(2025, 3, 10), EventKind::ExamFinal), 20, 0);
        let earlier_day = task("Earlier day", ymd(2025, 3, 9), EventKind::Study);

        assert_eq!(planner.pick_pull_candidate(&[all_day.clone(), evening.clone(), morning.clone()]), Some(morning.clone()));
        assert_eq!(planner.pick_pull_candidate(&[all_day.clone(), evening.clone()]), Some(evening));
        assert_eq!(planner.pick_pull_candidate(&[morning, all_day, earlier_day.clone()]), Some(earlier_day));
        assert_eq!(planner.pick_pull_candidate(&[]), None);
    }

    #[test]
    fn classes_and_completed_tasks_are_never_pulled() {
        let planner = AdaptivePlanner::default();
        let class = Event::new("Lecture".to_string(), ymd(2025, 3, 10), EventKind::ClassLecture, SourceTag::Class);
        let done = task("Already done", ymd(2025, 3, 10), EventKind::Study).with_completed(true);
        assert_eq!(planner.pick_pull_candidate(&[class.clone(), done.clone()]), None);

        let sport = task("Gym", ymd(2025, 3, 12), EventKind::ActivitySport);
        assert_eq!(planner.pick_pull_candidate(&[class, done, sport.clone()]), Some(sport));
    }

    #[test]
    fn postponed_tasks_are_never_pulled_back() {
        let planner = AdaptivePlanner::default();
        let current_week = vec![task("Weekly sheet 3", ymd(2025, 3, 7), EventKind::SubmissionWeekly).with_completed(true)];
        let postponed = task("Read chapter 4", ymd(2025, 3, 12), EventKind::Study).with_postponed_from(Some(ymd(2025, 3, 5)));
        assert!(planner.plan(today(), &current_week, &[postponed.clone()]).is_empty());

        let gym = task("Gym", ymd(2025, 3, 13), EventKind::ActivitySport);
        let plan = planner.plan(today(), &current_week, &[postponed, gym.clone()]);
        assert_eq!(plan.pulled_earlier, Some(gym));
    }

    #[test]
    fn custom_preferred_kinds() {
        let planner = AdaptivePlanner::new(PlannerConfig::new().with_preferred_kinds(KindFamily::PROJECT));
        let study = task("Read chapter 5", ymd(2025, 3, 10), EventKind::Study);
        let project = task("Team project", ymd(2025, 3, 14), EventKind::Project);
        assert_eq!(planner.pick_pull_candidate(&[study, project.clone()]), Some(project));
    }

    #[test]
    fn pulls_consume_spare_capacity() {
        let planner = AdaptivePlanner::default();
        let done_early = task("Weekly sheet 3", ymd(2025, 3, 7), EventKind::SubmissionWeekly).with_completed(true);
        let pulled = task("Read chapter 5", today(), EventKind::Study).with_pulled_from(Some(ymd(2025, 3, 10)));
        let next_week = vec![task("Midterm", ymd(2025, 3, 11), EventKind::ExamMidterm)];

        assert_eq!(planner.spare_capacity(today(), &[done_early.clone()]), 1);
        assert_eq!(planner.spare_capacity(today(), &[done_early.clone(), pulled.clone()]), 0);
        assert!(planner.plan(today(), &[done_early.clone(), pulled.clone()], &next_week).is_empty());

        let also_done_early = task("Milestone 1", ymd(2025, 3, 8), EventKind::SubmissionMilestone).with_completed(true);
        let plan = planner.plan(today(), &[done_early, pulled, also_done_early], &next_week);
        assert_eq!(plan.pulled_earlier.map(|e| e.title().to_string()), Some("Midterm".to_string()));
    }

    #[test]
    fn pull_targets() {
        let current_week = vec![
            task("Pending today", today(), EventKind::Study),
            task("Done tomorrow", ymd(2025, 3, 7), EventKind::Study).with_completed(true),
        ];

        let planner = AdaptivePlanner::default();
        assert_eq!(planner.target_date_for_pull(today(), &current_week), today());

        let planner = AdaptivePlanner::new(PlannerConfig::new().with_pull_target(PullTarget::FirstFreeDay));
        assert_eq!(planner.target_date_for_pull(today(), &current_week), ymd(2025, 3, 7));

        let busy_week: Vec<Event> = (6..=9)
            .map(|day| task("Busy", ymd(2025, 3, day), EventKind::Study))
            .collect();
        assert_eq!(planner.target_date_for_pull(today(), &busy_week), today());
    }

    #[test]
    fn empty_inputs() {
        let plan = AdaptivePlanner::default().plan(today(), &[], &[]);
        assert!(plan.is_empty());
    }
}
