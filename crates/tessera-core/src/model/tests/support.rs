use crate::key::VarKey;
use crate::model::Model;
use crate::types::Sense;
use tessera_expr::ComparisonSense;

pub(super) fn x(item: i64) -> VarKey {
    VarKey::new("x", [item])
}

/// 2x2 assignment model: x[t,e] binary, one row per task and per employee.
pub(super) fn assignment_model() -> Model {
    let mut model = Model::new();
    model.declare_index_set("tasks", 0..2).unwrap();
    model.declare_index_set("employees", 0..2).unwrap();
    model.declare_family("x", &["tasks", "employees"]).unwrap();
    for task in 0..2 {
        for employee in 0..2 {
            model.add_binary(VarKey::new("x", [task, employee])).unwrap();
        }
    }
    for task in 0..2 {
        model
            .add_constraint(
                format!("task[{task}]"),
                (0..2).map(|employee| (VarKey::new("x", [task, employee]), 1.0)),
                ComparisonSense::Equal,
                1.0,
            )
            .unwrap();
    }
    for employee in 0..2 {
        model
            .add_constraint(
                format!("employee[{employee}]"),
                (0..2).map(|task| (VarKey::new("x", [task, employee]), 1.0)),
                ComparisonSense::Equal,
                1.0,
            )
            .unwrap();
    }
    model
}

pub(super) fn assignment_model_with_costs(costs: [[f64; 2]; 2]) -> Model {
    let mut model = assignment_model();
    let terms = (0..2).flat_map(|task| {
        (0..2).map(move |employee| {
            (
                VarKey::new("x", [task, employee]),
                costs[task as usize][employee as usize],
            )
        })
    });
    model.set_objective(terms, Sense::Minimize).unwrap();
    model
}
