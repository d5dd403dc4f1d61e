//! Room assignment: place events into as few rooms as possible so that no
//! two conflicting events share a room.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tessera_core::templates::{
    at_least_one_active, capacity_coupling, exact_cover, mutual_exclusion,
};
use tessera_core::{
    Adjacency, ConflictSet, Model, Sense, VarKey, clique_lower_bound, estimate_bound,
};
use tessera_solver::SolveResult;

use crate::domain::RoomAssignment;
use crate::error::ProblemError;
use crate::family::{ProblemFamily, ensure_solved};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInstance {
    pub events: Vec<i64>,
    pub conflicts: ConflictSet,
    /// Explicit number of rooms; `None` uses the greedy coloring bound.
    #[serde(default)]
    pub room_bound: Option<usize>,
}

fn x(event: i64, room: i64) -> VarKey {
    VarKey::new("x", [event, room])
}

fn y(room: i64) -> VarKey {
    VarKey::new("y", [room])
}

impl RoomInstance {
    pub fn new(events: impl IntoIterator<Item = i64>, conflicts: ConflictSet) -> Self {
        Self {
            events: events.into_iter().collect(),
            conflicts,
            room_bound: None,
        }
    }

    pub fn with_room_bound(mut self, rooms: usize) -> Self {
        self.room_bound = Some(rooms);
        self
    }

    fn adjacency(&self) -> Adjacency {
        self.conflicts.adjacency(self.events.iter().copied())
    }

    fn validate(&self) -> Result<(), ProblemError> {
        let mut seen = BTreeSet::new();
        if let Some(event) = self.events.iter().find(|event| !seen.insert(**event)) {
            return Err(ProblemError::InvalidInstance(format!(
                "event {event} is listed twice"
            )));
        }
        for (a, b) in self.conflicts.iter() {
            if !seen.contains(&a) || !seen.contains(&b) {
                return Err(ProblemError::InvalidInstance(format!(
                    "conflict ({a}, {b}) names an unknown event"
                )));
            }
        }
        Ok(())
    }

    /// Number of candidate rooms.
    ///
    /// An explicit bound below the clique lower bound can never be feasible
    /// and is rejected with [`ProblemError::InsufficientBound`].
    pub fn rooms(&self) -> Result<usize, ProblemError> {
        let adjacency = self.adjacency();
        match self.room_bound {
            None => Ok(estimate_bound(&adjacency)),
            Some(available) => {
                let required = clique_lower_bound(&adjacency);
                if available < required {
                    return Err(ProblemError::InsufficientBound {
                        required,
                        available,
                    });
                }
                Ok(available)
            }
        }
    }

    fn room_ids(&self) -> Result<Vec<i64>, ProblemError> {
        Ok((0..self.rooms()? as i64).collect())
    }
}

impl ProblemFamily for RoomInstance {
    type Output = RoomAssignment;

    fn name(&self) -> &'static str {
        "room_assignment"
    }

    fn build(&self) -> Result<Model, ProblemError> {
        self.validate()?;
        let rooms = self.room_ids()?;

        let mut model = Model::new();
        model.declare_index_set("events", self.events.iter().copied())?;
        model.declare_index_set("rooms", rooms.iter().copied())?;
        model.declare_family("x", &["events", "rooms"])?;
        model.declare_family("y", &["rooms"])?;
        for &event in &self.events {
            for &room in &rooms {
                model.add_binary(x(event, room))?;
            }
        }
        for &room in &rooms {
            model.add_binary(y(room))?;
        }

        exact_cover(&mut model, "one_room", &self.events, &rooms, |e, r| Some(x(e, r)))?;
        mutual_exclusion(&mut model, "conflict", &self.conflicts, &rooms, |e, r| {
            Some(x(e, r))
        })?;
        capacity_coupling(
            &mut model,
            "room_used",
            &self.events,
            &rooms,
            |e, r| Some(x(e, r)),
            |r| Some(y(r)),
        )?;
        if !self.events.is_empty() {
            at_least_one_active(&mut model, "any_room", &rooms, |r| Some(y(r)))?;
        }

        model.set_objective(rooms.iter().map(|&room| (y(room), 1.0)), Sense::Minimize)?;
        Ok(model)
    }

    fn project(&self, result: &SolveResult) -> Result<RoomAssignment, ProblemError> {
        ensure_solved(result)?;
        let rooms = self.room_ids()?;

        let mut assignment = BTreeMap::new();
        for &event in &self.events {
            let chosen: Vec<i64> = rooms
                .iter()
                .copied()
                .filter(|&room| result.is_selected(&x(event, room)))
                .collect();
            let [room] = chosen.as_slice() else {
                return Err(ProblemError::Validation(format!(
                    "event {event} is placed in {} rooms",
                    chosen.len()
                )));
            };
            assignment.insert(event, *room);
        }

        for (a, b) in self.conflicts.iter() {
            if assignment.get(&a) == assignment.get(&b) {
                return Err(ProblemError::Validation(format!(
                    "conflicting events {a} and {b} share a room"
                )));
            }
        }

        let active: Vec<i64> = rooms
            .iter()
            .copied()
            .filter(|&room| result.is_selected(&y(room)))
            .collect();
        if let Some((event, room)) = assignment.iter().find(|(_, room)| !active.contains(room)) {
            return Err(ProblemError::Validation(format!(
                "event {event} uses inactive room {room}"
            )));
        }

        Ok(RoomAssignment {
            assignment,
            rooms: active,
            room_bound: rooms.len(),
        })
    }

    fn objective_of(&self, output: &RoomAssignment) -> f64 {
        output.rooms_used() as f64
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn triangle_with_isolated() -> RoomInstance {
        let conflicts = ConflictSet::from_pairs([(1, 2), (2, 3), (1, 3)]).unwrap();
        RoomInstance::new([1, 2, 3, 4], conflicts)
    }

    #[test]
    fn test_rooms_default_to_greedy_bound() {
        assert_eq!(triangle_with_isolated().rooms().unwrap(), 3);
    }

    #[test]
    fn test_explicit_bound_below_clique_is_rejected() {
        let err = triangle_with_isolated().with_room_bound(2).build().unwrap_err();
        assert_eq!(
            err,
            ProblemError::InsufficientBound {
                required: 3,
                available: 2
            }
        );
    }

    #[test]
    fn test_unknown_conflict_event_is_invalid() {
        let conflicts = ConflictSet::from_pairs([(1, 9)]).unwrap();
        let err = RoomInstance::new([1, 2], conflicts).build().unwrap_err();
        assert_eq!(err.code(), "INSTANCE_INVALID");
    }

    #[test]
    fn test_build_shape() {
        let model = triangle_with_isolated().build().unwrap();
        // 4 events x 3 rooms plus 3 room indicators
        assert_eq!(model.num_variables(), 15);
        // 4 cover rows, 3 pairs x 3 rooms, 12 coupling rows, 1 activity row
        assert_eq!(model.num_constraints(), 4 + 9 + 12 + 1);
        assert!(model.constraint_by_name("one_room[4]").is_some());
        assert!(model.constraint_by_name("any_room").is_some());
    }

    #[test]
    fn test_project_reads_selected_rooms() {
        let instance = triangle_with_isolated();
        let values = [
            (x(1, 0), 1.0),
            (x(2, 1), 1.0),
            (x(3, 2), 1.0),
            (x(4, 0), 1.0),
            (y(0), 1.0),
            (y(1), 1.0),
            (y(2), 1.0),
        ];
        let result = SolveResult::optimal(3.0, values.into_iter().collect());
        let output = instance.project(&result).unwrap();
        assert_eq!(output.assignment[&4], 0);
        assert_eq!(output.rooms, vec![0, 1, 2]);
        assert_eq!(instance.objective_of(&output), 3.0);
    }

    #[test]
    fn test_project_rejects_shared_room() {
        let instance = triangle_with_isolated();
        let values = [
            (x(1, 0), 1.0),
            (x(2, 0), 1.0),
            (x(3, 2), 1.0),
            (x(4, 0), 1.0),
            (y(0), 1.0),
            (y(2), 1.0),
        ];
        let result = SolveResult::optimal(2.0, values.into_iter().collect());
        let err = instance.project(&result).unwrap_err();
        assert!(matches!(err, ProblemError::Validation(_)));
    }
}
