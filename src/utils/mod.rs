//! Some utility functions

use crate::event::{Event, SourceTag};

pub mod comparison;

/// A debug utility that pretty-prints events
pub fn print_event_list(events: &[Event]) {
    let mut current_date = None;
    for event in events {
        if current_date != Some(event.date()) {
            current_date = Some(event.date());
            println!("{} ({})", event.date(), event.date().format("%A"));
        }
        print_event(event);
    }
}

pub fn print_event(event: &Event) {
    let completion = if event.completed() { "✓" } else { " " };
    let source = match event.source_tag() {
        SourceTag::Task => "T",
        SourceTag::Class => "C",
    };
    let time = match event.time() {
        Some(time) => time.format("%H:%M").to_string(),
        None => String::from("--:--"),
    };
    let pulled = match (event.pulled_from(), event.postponed_from()) {
        (Some(date), _) => format!(" (pulled from {})", date),
        (None, Some(date)) => format!(" (postponed from {})", date),
        (None, None) => String::new(),
    };
    println!("    {}{} {} {}\t{:?}\t{}{}", completion, source, time, event.title(), event.kind(), event.id(), pulled);
}
