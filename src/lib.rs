//! This crate provides the adaptive weekly planning core of a student planner.
//!
//! Personal tasks and timetabled classes come from two different sources ([`traits::TaskSource`] and [`traits::ClassSource`]). \
//! They are normalized into [`Event`]s by the [`mapper`] module, and merged into a single, continuously updated
//! view by an [`EventAggregator`](aggregator::EventAggregator).
//!
//! The [`planner`] module decides how the plan of the current week should adapt (missed tasks move one week forward,
//! and a task of next week is pulled in when the user finished something early). \
//! The [`adjuster`] module applies these decisions back to the task source.

pub mod traits;

mod event;
pub use event::{Event, EventId, EventKind, KindFamily, Priority, SourceTag};
mod task;
pub use task::{CompletionStatus, TaskCategory, TaskPriority, TaskRecord};
mod class;
pub use class::{ClassRecord, ClassType};

pub mod mapper;
pub mod aggregator;
pub use aggregator::EventAggregator;
pub mod planner;
pub use planner::{AdaptivePlanner, PlanAdjustment};
pub mod adjuster;
pub use adjuster::PlanAdjuster;

pub mod store;
pub mod config;
pub mod mock_behaviour;
pub mod utils;
