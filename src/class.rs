//! Timetabled classes

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::NaiveTime;

use crate::event::EventId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassType {
    Lecture,
    Lab,
    Exercise,
}

impl Display for ClassType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            ClassType::Lecture => write!(f, "LECTURE"),
            ClassType::Lab => write!(f, "LAB"),
            ClassType::Exercise => write!(f, "EXERCISE"),
        }
    }
}

impl FromStr for ClassType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LECTURE" => Ok(ClassType::Lecture),
            "LAB" => Ok(ClassType::Lab),
            "EXERCISE" => Ok(ClassType::Exercise),
            other => Err(format!("Unknown class type {:?}", other)),
        }
    }
}

/// A daily slot of the timetable.
///
/// Classes carry no date: a record stands for "today's" occurrence of the class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    id: EventId,
    course_name: String,
    course_code: Option<String>,
    start: NaiveTime,
    end: NaiveTime,
    room: String,
    instructor: String,
    class_type: ClassType,
}

impl ClassRecord {
    /// Create a brand new class, with a random ID
    pub fn new(course_name: String, class_type: ClassType, start: NaiveTime, end: NaiveTime, room: String, instructor: String) -> Self {
        Self::new_with_id(EventId::random(), course_name, None, class_type, start, end, room, instructor)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new_with_id(id: EventId, course_name: String, course_code: Option<String>, class_type: ClassType,
                       start: NaiveTime, end: NaiveTime, room: String, instructor: String) -> Self
    {
        Self { id, course_name, course_code, start, end, room, instructor, class_type }
    }

    pub fn with_course_code(mut self, course_code: Option<String>) -> Self {
        self.course_code = course_code;
        self
    }

    pub fn id(&self) -> &EventId            { &self.id }
    pub fn course_name(&self) -> &str       { &self.course_name }
    pub fn course_code(&self) -> Option<&str> { self.course_code.as_deref() }
    pub fn start(&self) -> NaiveTime        { self.start }
    pub fn end(&self) -> NaiveTime          { self.end }
    pub fn room(&self) -> &str              { &self.room }
    pub fn instructor(&self) -> &str        { &self.instructor }
    pub fn class_type(&self) -> ClassType   { self.class_type }

    /// The length of this class, or 0 if it ends before it starts
    pub fn duration_minutes(&self) -> u32 {
        let minutes = self.end.signed_duration_since(self.start).num_minutes();
        if minutes < 0 {
            log::warn!("Class {} ends before it starts", self.id);
            return 0;
        }
        minutes as u32
    }
}
