//! The five problem families.

mod assignment;
mod partition;
mod path;
mod room;
mod timetable;

pub use assignment::AssignmentInstance;
pub use partition::{PartitionInstance, Subset};
pub use path::{Connection, PathInstance};
pub use room::RoomInstance;
pub use timetable::TimetableInstance;
