use super::support::{assignment_model, assignment_model_with_costs};
use super::*;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn build_from_rows(rows: &[(i64, i64)], cost_order: &[(i64, i64)]) -> Model {
    let mut model = Model::new();
    model.declare_index_set("tasks", 0..3).unwrap();
    model.declare_index_set("employees", 0..3).unwrap();
    model.declare_family("x", &["tasks", "employees"]).unwrap();
    for (task, employee) in rows {
        model.add_binary(VarKey::new("x", [*task, *employee])).unwrap();
    }
    for task in 0..3 {
        model
            .add_constraint(
                format!("task[{task}]"),
                (0..3).rev().map(|employee| (VarKey::new("x", [task, employee]), 1.0)),
                ComparisonSense::Equal,
                1.0,
            )
            .unwrap();
    }
    model
        .set_objective(
            cost_order
                .iter()
                .map(|(task, employee)| (VarKey::new("x", [*task, *employee]), (task + employee) as f64)),
            Sense::Minimize,
        )
        .unwrap();
    model
}

fn all_pairs() -> Vec<(i64, i64)> {
    (0..3)
        .flat_map(|task| (0..3).map(move |employee| (task, employee)))
        .collect()
}

#[test]
fn test_snapshot_is_key_addressed() {
    let model = assignment_model();
    let snapshot = model.inspect(InspectOptions::default());

    assert_eq!(snapshot.metadata.variables, 4);
    assert_eq!(snapshot.metadata.constraints, 4);
    assert_eq!(snapshot.metadata.coefficients, 8);
    assert!(snapshot.objective.is_none());

    let names: Vec<&str> = snapshot.constraints.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["employee[0]", "employee[1]", "task[0]", "task[1]"]);
    assert_eq!(
        snapshot.constraints[2].terms,
        vec![
            (VarKey::new("x", [0, 0]), 1.0),
            (VarKey::new("x", [0, 1]), 1.0)
        ]
    );
}

#[test]
fn test_snapshot_without_terms() {
    let model = assignment_model();
    let snapshot = model.inspect(InspectOptions {
        include_terms: false,
        family_filter: None,
    });
    assert!(snapshot.constraints.iter().all(|c| c.terms.is_empty()));
    assert!(snapshot.constraints.iter().all(|c| c.nnz == 2));
}

#[test]
fn test_snapshot_family_filter() {
    let mut model = assignment_model();
    model.declare_index_set("single", [0]).unwrap();
    model.declare_family("y", &["single"]).unwrap();
    model.add_binary(VarKey::new("y", [0])).unwrap();

    let snapshot = model.inspect(InspectOptions {
        include_terms: true,
        family_filter: Some(vec!["y".to_string()]),
    });
    assert_eq!(snapshot.variables.len(), 1);
    assert_eq!(snapshot.variables[0].key, VarKey::new("y", [0]));
    assert_eq!(snapshot.metadata.variables, 5);
}

#[test]
fn test_snapshot_json() {
    let model = assignment_model_with_costs([[4.0, 1.0], [2.0, 0.0]]);
    let json = model.inspect(InspectOptions::default()).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["objective"]["sense"], "minimize");
    assert_eq!(value["variables"][0]["key"]["family"], "x");
    assert_eq!(value["constraints"][0]["sense"], "eq");
}

#[test]
fn test_evaluate_objective_and_violations() {
    let model = assignment_model_with_costs([[4.0, 1.0], [2.0, 0.0]]);

    let mut values = BTreeMap::new();
    values.insert(VarKey::new("x", [0, 1]), 1.0);
    values.insert(VarKey::new("x", [1, 0]), 1.0);
    assert_eq!(model.evaluate_objective(&values), 3.0);
    assert!(model.constraint_violations(&values, 1e-9).is_empty());

    values.insert(VarKey::new("x", [1, 1]), 1.0);
    let violations = model.constraint_violations(&values, 1e-9);
    let names: Vec<&str> = violations.iter().map(|v| v.constraint.as_str()).collect();
    assert_eq!(names, vec!["task[1]", "employee[1]"]);
    assert_eq!(violations[0].activity, 2.0);
    assert_eq!(violations[0].to_string(), "task[1]: 2 == 1");
}

#[test]
fn test_dense_values_follow_variable_ids() {
    let model = assignment_model();
    let mut values = BTreeMap::new();
    values.insert(VarKey::new("x", [1, 1]), 1.0);
    assert_eq!(model.dense_values(&values), vec![0.0, 0.0, 0.0, 1.0]);
}

proptest! {
    #[test]
    fn snapshot_ignores_insertion_order(
        rows in Just(all_pairs()).prop_shuffle(),
        costs in Just(all_pairs()).prop_shuffle(),
    ) {
        let reference = build_from_rows(&all_pairs(), &all_pairs());
        let shuffled = build_from_rows(&rows, &costs);
        prop_assert_eq!(
            reference.inspect(InspectOptions::default()),
            shuffled.inspect(InspectOptions::default())
        );
    }
}
