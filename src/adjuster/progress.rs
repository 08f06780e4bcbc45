//! Utilities to track the progression of a plan adjustment

use std::fmt::{Display, Error, Formatter};

/// An event that happens during a plan adjustment
#[derive(Clone, Debug, PartialEq)]
pub enum AdjustEvent {
    /// Adjustment has not started
    NotStarted,
    /// Adjustment has just started, nothing has been moved yet
    Started,
    /// Adjustment is in progress.
    InProgress{ moves_done_already: usize, details: String },
    /// Adjustment is finished
    Finished{ success: bool },
}

impl Display for AdjustEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            AdjustEvent::NotStarted => write!(f, "Not started"),
            AdjustEvent::Started => write!(f, "Plan adjustment has started..."),
            AdjustEvent::InProgress{moves_done_already, details} => write!(f, "{} ({} moves done)...", details, moves_done_already),
            AdjustEvent::Finished{success} => match success {
                true => write!(f, "Plan adjustment successfully finished"),
                false => write!(f, "Plan adjustment finished with errors"),
            }
        }
    }
}

impl Default for AdjustEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<AdjustEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<AdjustEvent>;

/// Create a feeback channel, that can be used to retrieve the current progress of a plan adjustment
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(AdjustEvent::default())
}




/// A structure that tracks the progression and the errors that happen during a plan adjustment
#[derive(Default)]
pub struct AdjustProgress {
    n_errors: u32,
    counter: usize,
    feedback_channel: Option<FeedbackSender>,
}
impl AdjustProgress {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { n_errors: 0, counter: 0, feedback_channel: Some(channel) }
    }

    pub fn counter(&self) -> usize {
        self.counter
    }
    pub fn increment_counter(&mut self, increment: usize) {
        self.counter += increment;
    }

    pub fn is_success(&self) -> bool {
        self.n_errors == 0
    }

    /// Log an error
    pub fn error(&mut self, text: &str) {
        log::error!("{}", text);
        self.n_errors += 1;
    }
    /// Log a warning
    pub fn warn(&mut self, text: &str) {
        log::warn!("{}", text);
        self.n_errors += 1;
    }
    /// Log an info
    pub fn info(&mut self, text: &str) {
        log::info!("{}", text);
    }
    /// Log a debug message
    pub fn debug(&mut self, text: &str) {
        log::debug!("{}", text);
    }
    /// Send an event as a feedback to the listener (if any).
    pub fn feedback(&mut self, event: AdjustEvent) {
        if let Some(sender) = &self.feedback_channel {
            sender.send_replace(event);
        }
    }
}
