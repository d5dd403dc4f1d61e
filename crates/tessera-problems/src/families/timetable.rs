//! Timetable scheduling: place every required lesson into a period without
//! double booking a room, a teacher or a class.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tessera_core::templates::{at_most_one, demand_cover};
use tessera_core::{Model, Sense, VarKey};
use tessera_solver::SolveResult;

use crate::domain::{Lesson, Timetable};
use crate::error::ProblemError;
use crate::family::{ProblemFamily, ensure_solved};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableInstance {
    pub teachers: usize,
    pub classes: usize,
    pub rooms: usize,
    pub days: usize,
    pub periods_per_day: usize,
    /// Lessons required, indexed `[room][class][teacher]`.
    pub requirements: Vec<Vec<Vec<u32>>>,
}

fn x(teacher: i64, room: i64, class: i64, period: i64) -> VarKey {
    VarKey::new("x", [teacher, room, class, period])
}

fn range(count: usize) -> Vec<i64> {
    (0..count as i64).collect()
}

impl TimetableInstance {
    pub fn periods(&self) -> usize {
        self.days * self.periods_per_day
    }

    fn validate(&self) -> Result<(), ProblemError> {
        if self.periods_per_day == 0 {
            return Err(ProblemError::InvalidInstance(
                "periods_per_day must be positive".to_string(),
            ));
        }
        if self.requirements.len() != self.rooms {
            return Err(ProblemError::InvalidInstance(format!(
                "requirements cover {} rooms, expected {}",
                self.requirements.len(),
                self.rooms
            )));
        }
        for (room, by_class) in self.requirements.iter().enumerate() {
            if by_class.len() != self.classes {
                return Err(ProblemError::InvalidInstance(format!(
                    "room {room} lists {} classes, expected {}",
                    by_class.len(),
                    self.classes
                )));
            }
            if let Some(class) = by_class.iter().position(|row| row.len() != self.teachers) {
                return Err(ProblemError::InvalidInstance(format!(
                    "room {room}, class {class} does not list {} teachers",
                    self.teachers
                )));
            }
        }
        Ok(())
    }

    /// Required lessons for a (teacher, room, class) triple.
    pub fn requirement(&self, teacher: i64, room: i64, class: i64) -> u32 {
        self.requirements
            .get(room as usize)
            .and_then(|by_class| by_class.get(class as usize))
            .and_then(|row| row.get(teacher as usize))
            .copied()
            .unwrap_or(0)
    }

    fn triples(&self) -> Vec<(i64, i64, i64)> {
        let mut triples = Vec::new();
        for teacher in range(self.teachers) {
            for room in range(self.rooms) {
                for class in range(self.classes) {
                    triples.push((teacher, room, class));
                }
            }
        }
        triples
    }
}

impl ProblemFamily for TimetableInstance {
    type Output = Timetable;

    fn name(&self) -> &'static str {
        "timetable"
    }

    fn build(&self) -> Result<Model, ProblemError> {
        self.validate()?;
        let teachers = range(self.teachers);
        let rooms = range(self.rooms);
        let classes = range(self.classes);
        let periods = range(self.periods());
        let triples = self.triples();

        let mut model = Model::new();
        model.declare_index_set("teachers", teachers.iter().copied())?;
        model.declare_index_set("rooms", rooms.iter().copied())?;
        model.declare_index_set("classes", classes.iter().copied())?;
        model.declare_index_set("periods", periods.iter().copied())?;
        model.declare_family("x", &["teachers", "rooms", "classes", "periods"])?;
        for &(teacher, room, class) in &triples {
            for &period in &periods {
                model.add_binary(x(teacher, room, class, period))?;
            }
        }

        demand_cover(
            &mut model,
            "requirement",
            &triples,
            &periods,
            |(t, r, c), p| Some(x(t, r, c, p)),
            |(t, r, c)| f64::from(self.requirement(t, r, c)),
        )?;
        at_most_one(&mut model, "room_busy", &rooms, &periods, |r, p| {
            teachers
                .iter()
                .flat_map(|&t| classes.iter().map(move |&c| x(t, r, c, p)))
                .collect()
        })?;
        at_most_one(&mut model, "teacher_busy", &teachers, &periods, |t, p| {
            rooms
                .iter()
                .flat_map(|&r| classes.iter().map(move |&c| x(t, r, c, p)))
                .collect()
        })?;
        at_most_one(&mut model, "class_busy", &classes, &periods, |c, p| {
            teachers
                .iter()
                .flat_map(|&t| rooms.iter().map(move |&r| x(t, r, c, p)))
                .collect()
        })?;

        let lessons = triples.iter().flat_map(|&(t, r, c)| {
            periods.iter().map(move |&p| (x(t, r, c, p), 1.0))
        });
        model.set_objective(lessons, Sense::Maximize)?;
        Ok(model)
    }

    fn project(&self, result: &SolveResult) -> Result<Timetable, ProblemError> {
        ensure_solved(result)?;
        let periods_per_day = self.periods_per_day.max(1) as i64;

        let mut lessons = Vec::new();
        for (teacher, room, class) in self.triples() {
            for period in range(self.periods()) {
                if result.is_selected(&x(teacher, room, class, period)) {
                    lessons.push(Lesson {
                        day: period / periods_per_day,
                        slot: period % periods_per_day,
                        period,
                        room,
                        teacher,
                        class,
                    });
                }
            }
        }
        lessons.sort();

        let mut scheduled: BTreeMap<(i64, i64, i64), u32> = BTreeMap::new();
        let mut rooms_busy = BTreeSet::new();
        let mut teachers_busy = BTreeSet::new();
        let mut classes_busy = BTreeSet::new();
        for lesson in &lessons {
            *scheduled
                .entry((lesson.teacher, lesson.room, lesson.class))
                .or_default() += 1;
            if !rooms_busy.insert((lesson.room, lesson.period)) {
                return Err(ProblemError::Validation(format!(
                    "room {} is double booked in period {}",
                    lesson.room, lesson.period
                )));
            }
            if !teachers_busy.insert((lesson.teacher, lesson.period)) {
                return Err(ProblemError::Validation(format!(
                    "teacher {} is double booked in period {}",
                    lesson.teacher, lesson.period
                )));
            }
            if !classes_busy.insert((lesson.class, lesson.period)) {
                return Err(ProblemError::Validation(format!(
                    "class {} is double booked in period {}",
                    lesson.class, lesson.period
                )));
            }
        }

        for (teacher, room, class) in self.triples() {
            let required = self.requirement(teacher, room, class);
            let held = scheduled.get(&(teacher, room, class)).copied().unwrap_or(0);
            if held != required {
                return Err(ProblemError::Validation(format!(
                    "teacher {teacher}, room {room}, class {class}: {held} lessons, {required} required"
                )));
            }
        }

        Ok(Timetable { lessons })
    }

    fn objective_of(&self, output: &Timetable) -> f64 {
        output.lessons.len() as f64
    }
}
