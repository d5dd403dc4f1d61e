use super::support::x;
use super::*;

fn items_model() -> Model {
    let mut model = Model::new();
    model.declare_index_set("items", [1, 2, 3]).unwrap();
    model.declare_family("x", &["items"]).unwrap();
    model
}

#[test]
fn test_duplicate_key_rejected() {
    let mut model = items_model();
    model.add_binary(x(1)).unwrap();
    let err = model.add_binary(x(1)).unwrap_err();
    assert_eq!(err, ModelError::DuplicateKey(x(1)));
    assert_eq!(err.code(), "VARIABLE_DUPLICATE_KEY");
    assert_eq!(model.num_variables(), 1);
}

#[test]
fn test_unknown_family_rejected() {
    let mut model = items_model();
    let err = model.add_binary(VarKey::new("y", [1])).unwrap_err();
    assert_eq!(err, ModelError::UnknownFamily("y".to_string()));
}

#[test]
fn test_key_arity_checked() {
    let mut model = items_model();
    let err = model.add_binary(VarKey::new("x", [1, 2])).unwrap_err();
    assert_eq!(
        err,
        ModelError::KeyArity {
            key: VarKey::new("x", [1, 2]),
            expected: 1,
        }
    );
}

#[test]
fn test_index_outside_domain_rejected() {
    let mut model = items_model();
    let err = model.add_binary(x(7)).unwrap_err();
    assert_eq!(
        err,
        ModelError::IndexOutOfDomain {
            key: x(7),
            index_set: "items".to_string(),
            value: 7,
        }
    );
}

#[test]
fn test_index_set_and_family_declarations() {
    let mut model = items_model();
    assert_eq!(
        model.declare_index_set("items", [4]),
        Err(ModelError::DuplicateIndexSet("items".to_string()))
    );
    assert_eq!(
        model.declare_family("x", &["items"]),
        Err(ModelError::DuplicateFamily("x".to_string()))
    );
    assert_eq!(
        model.declare_family("z", &["items", "slots"]),
        Err(ModelError::UnknownIndexSet("slots".to_string()))
    );
    assert_eq!(model.index_set("items").map(|set| set.len()), Some(3));
    assert_eq!(model.family_dims("x"), Some(&["items".to_string()][..]));
}

#[test]
fn test_constraint_with_undeclared_key_fails() {
    let mut model = items_model();
    model.add_binary(x(1)).unwrap();
    let err = model
        .add_constraint(
            "cover",
            [(x(1), 1.0), (x(2), 1.0)],
            ComparisonSense::Equal,
            1.0,
        )
        .unwrap_err();
    assert_eq!(err, ModelError::UnknownVariable(x(2)));
    assert_eq!(model.num_constraints(), 0);
}

#[test]
fn test_duplicate_constraint_name_rejected() {
    let mut model = items_model();
    model.add_binary(x(1)).unwrap();
    model
        .add_constraint("limit", [(x(1), 1.0)], ComparisonSense::LessEqual, 1.0)
        .unwrap();
    let err = model
        .add_constraint("limit", [(x(1), 2.0)], ComparisonSense::LessEqual, 1.0)
        .unwrap_err();
    assert_eq!(err, ModelError::DuplicateConstraintName("limit".to_string()));
    assert_eq!(err.to_string(), "[CONSTRAINT_DUPLICATE_NAME] Constraint 'limit' already exists");
}

#[test]
fn test_non_finite_coefficient_rejected() {
    let mut model = items_model();
    model.add_binary(x(1)).unwrap();
    let err = model
        .add_constraint(
            "limit",
            [(x(1), f64::INFINITY)],
            ComparisonSense::LessEqual,
            1.0,
        )
        .unwrap_err();
    assert!(matches!(err, ModelError::InvalidCoefficient { .. }));
}

#[test]
fn test_variables_iterate_in_insertion_order() {
    let mut model = items_model();
    model.add_binary(x(3)).unwrap();
    model.add_binary(x(1)).unwrap();
    let keys: Vec<String> = model.variables().map(|(_, key, _)| key.to_string()).collect();
    assert_eq!(keys, vec!["x[3]", "x[1]"]);
}
