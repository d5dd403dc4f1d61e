//! Domain-level results produced by the projector.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Events placed into rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAssignment {
    /// Event to room.
    pub assignment: BTreeMap<i64, i64>,
    /// Rooms marked active, ascending.
    pub rooms: Vec<i64>,
    /// Number of candidate rooms the model was built with.
    pub room_bound: usize,
}

impl RoomAssignment {
    pub fn rooms_used(&self) -> usize {
        self.rooms.len()
    }
}

/// An ordered source-to-sink route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub nodes: Vec<i64>,
    /// Distance along `nodes`.
    pub distance: f64,
    /// Fuel along `nodes`.
    pub fuel: f64,
    pub budget: f64,
    /// Selected arcs off the route. They form balanced cycles and are not
    /// part of the trip.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detached: Vec<(i64, i64)>,
}

/// Tasks matched one-to-one with employees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    /// Task to employee.
    pub assignment: BTreeMap<i64, i64>,
    pub cost: f64,
}

/// One scheduled lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lesson {
    pub day: i64,
    pub slot: i64,
    pub period: i64,
    pub room: i64,
    pub teacher: i64,
    pub class: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    /// Lessons ordered by day, slot, room, teacher and class.
    pub lessons: Vec<Lesson>,
}

impl Timetable {
    /// Lessons held in one room, in time order.
    pub fn room_schedule(&self, room: i64) -> impl Iterator<Item = &Lesson> + '_ {
        self.lessons.iter().filter(move |lesson| lesson.room == room)
    }
}

/// Subsets chosen by a set partitioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetSelection {
    /// Chosen subset indices, ascending.
    pub chosen: Vec<usize>,
    pub cost: f64,
}

/// Projected result of any problem family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum DomainResult {
    RoomAssignment(RoomAssignment),
    Path(PathResult),
    TaskAssignment(TaskAssignment),
    Timetable(Timetable),
    SubsetSelection(SubsetSelection),
}

impl DomainResult {
    pub fn problem(&self) -> &'static str {
        match self {
            DomainResult::RoomAssignment(_) => "room_assignment",
            DomainResult::Path(_) => "path",
            DomainResult::TaskAssignment(_) => "task_assignment",
            DomainResult::Timetable(_) => "timetable",
            DomainResult::SubsetSelection(_) => "subset_selection",
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
