use crate::{
    index::ConstraintIndex,
    plan::{PlanError, UpsertPlanner},
    record::Record,
    value::Value,
};
use graft_schema::{catalog::Catalog, node::Table};
use std::sync::Arc;

fn planner() -> UpsertPlanner {
    let catalog = Catalog::new()
        .with_table(
            Table::new("bikes")
                .with_column("id", false)
                .with_column("weight", true)
                .with_column("make", true)
                .with_column("model", true)
                .with_column("serial_key", true)
                .with_primary_key(["id"])
                .with_unique(["serial_key", "weight"]),
        )
        .with_table(
            Table::new("pk_only")
                .with_column("id", false)
                .with_column("label", true)
                .with_primary_key(["id"]),
        )
        .with_table(Table::new("no_primary_keys").with_column("name", true));

    UpsertPlanner::new(Arc::new(ConstraintIndex::build(&catalog)))
}

#[test]
fn empty_where_defaults_to_the_primary_key() {
    let input = Record::new().with("make", "kona").with("model", "cool-ie deluxe");
    let op = planner().plan("bikes", &Record::new(), &input).unwrap();

    assert_eq!(op.conflict_columns, vec!["id".to_string()]);
    assert_eq!(op.record, input);
    assert_eq!(
        op.update_columns,
        vec!["make".to_string(), "model".to_string()]
    );
}

#[test]
fn where_matching_a_unique_constraint_selects_it() {
    let where_ = Record::new()
        .with("weight", Value::float(0.0).unwrap())
        .with("serial_key", "123");
    let input = Record::new()
        .with("weight", Value::float(0.0).unwrap())
        .with("serial_key", "123")
        .with("model", "cool-ie deluxe v2");

    let op = planner().plan("bikes", &where_, &input).unwrap();

    assert_eq!(op.conflict_columns, vec!["serial_key".to_string(), "weight".to_string()]);
    assert_eq!(op.update_columns, vec!["model".to_string()]);
    // zero-valued weight survives reconciliation
    assert_eq!(op.record.get("weight"), Some(&Value::float(0.0).unwrap()));
}

#[test]
fn where_not_matching_any_constraint_fails() {
    let where_ = Record::new().with("make", "kona");
    let err = planner().plan("bikes", &where_, &Record::new()).unwrap_err();

    assert!(matches!(err, PlanError::NoMatchingConstraint { .. }));
    assert!(err.to_string().contains("bikes"));
    assert!(err.to_string().contains("make"));
}

#[test]
fn subset_of_a_constraint_is_rejected() {
    let where_ = Record::new().with("serial_key", "123");
    let err = planner().plan("bikes", &where_, &Record::new()).unwrap_err();

    assert!(matches!(err, PlanError::NoMatchingConstraint { .. }));
}

#[test]
fn pk_only_table_accepts_only_the_primary_key_selector() {
    let p = planner();

    let by_pk = Record::new().with("id", 7u64);
    assert!(p.plan("pk_only", &by_pk, &Record::new().with("label", "x")).is_ok());

    let by_other = Record::new().with("label", "x");
    assert!(matches!(
        p.plan("pk_only", &by_other, &Record::new()),
        Err(PlanError::NoMatchingConstraint { .. })
    ));
}

#[test]
fn ineligible_table_is_a_planner_error() {
    let err = planner()
        .plan("no_primary_keys", &Record::new(), &Record::new())
        .unwrap_err();

    assert!(matches!(err, PlanError::IneligibleTable { .. }));
}

#[test]
fn value_mismatch_names_the_offending_column() {
    let where_ = Record::new()
        .with("weight", Value::float(0.0).unwrap())
        .with("serial_key", "123");
    let input = Record::new()
        .with("weight", Value::float(0.0).unwrap())
        .with("serial_key", "1234");

    let err = planner().plan("bikes", &where_, &input).unwrap_err();
    assert_eq!(
        err,
        PlanError::ValueMismatch {
            column: "serial_key".to_string()
        }
    );
    assert_eq!(
        err.to_string(),
        "value passed in the input for serial_key does not match the where clause value"
    );
}

#[test]
fn zero_values_are_not_treated_as_absent_in_mismatch_checks() {
    // input carries weight 0.0 and where carries weight 1.0: a real mismatch
    let where_ = Record::new()
        .with("weight", Value::float(1.0).unwrap())
        .with("serial_key", "123");
    let input = Record::new()
        .with("weight", Value::float(0.0).unwrap())
        .with("serial_key", "123");

    let err = planner().plan("bikes", &where_, &input).unwrap_err();
    assert_eq!(
        err,
        PlanError::ValueMismatch {
            column: "weight".to_string()
        }
    );
}

#[test]
fn where_values_fill_in_missing_input_columns() {
    let where_ = Record::new()
        .with("weight", Value::float(0.0).unwrap())
        .with("serial_key", "123");
    let input = Record::new().with("model", "cool-ie deluxe v2");

    let op = planner().plan("bikes", &where_, &input).unwrap();

    assert_eq!(op.record.get("serial_key"), Some(&Value::Text("123".to_string())));
    assert_eq!(op.record.get("weight"), Some(&Value::float(0.0).unwrap()));
    assert_eq!(op.update_columns, vec!["model".to_string()]);
}

#[test]
fn numeric_equality_is_type_correct_across_variants() {
    // integer zero in the input reconciles against float zero in the where
    let where_ = Record::new()
        .with("weight", Value::float(0.0).unwrap())
        .with("serial_key", "123");
    let input = Record::new().with("weight", 0i64).with("serial_key", "123");

    assert!(planner().plan("bikes", &where_, &input).is_ok());
}

#[test]
fn update_columns_exclude_the_conflict_target() {
    let where_ = Record::new()
        .with("weight", Value::float(0.0).unwrap())
        .with("serial_key", "123");
    let input = Record::new()
        .with("weight", Value::float(0.0).unwrap())
        .with("serial_key", "123")
        .with("make", "kona")
        .with("model", "cool-ie deluxe");

    let op = planner().plan("bikes", &where_, &input).unwrap();

    assert_eq!(op.update_columns, vec!["make".to_string(), "model".to_string()]);
    // the conflict columns still travel in the record for the insert arm
    assert!(op.record.contains_key("serial_key"));
    assert!(op.record.contains_key("weight"));
}

#[test]
fn planning_is_pure_and_repeatable() {
    let p = planner();
    let where_ = Record::new()
        .with("weight", Value::float(0.0).unwrap())
        .with("serial_key", "123");
    let input = Record::new().with("model", "v2");

    let first = p.plan("bikes", &where_, &input).unwrap();
    let second = p.plan("bikes", &where_, &input).unwrap();
    assert_eq!(first, second);
}
