#![allow(clippy::float_cmp)]

use std::collections::BTreeMap;

use highsrun_core::{Bounds, Model, ModelView, Sense, Variable, VariableKind};
use highsrun_expr::{ComparisonSense, ConstraintExpr, Expr, VariableId};
use highsrun_highs::export;
use highsrun_highs::lp_reader::read_lp;
use proptest::prelude::*;

fn mixed_model() -> Model {
    let mut model = Model::new();
    let kinds = [
        Variable::continuous(Bounds::non_negative()),
        Variable::continuous(Bounds::free()),
        Variable::continuous(Bounds::at_most(7.25)),
        Variable::continuous(Bounds::new(-3.0, 1e-3)),
        Variable::integer(Bounds::new(0.0, 40.0)),
        Variable::integer(Bounds::at_least(-2.0)),
        Variable::binary(),
        Variable::continuous(Bounds::new(1.5, 1.5)),
    ];
    let vars: Vec<VariableId> = kinds
        .into_iter()
        .map(|variable| model.add_variable(variable).unwrap())
        .collect();

    model
        .add_constraint(
            (Expr::term(vars[0], 2.0) - Expr::term(vars[1], 1e-7) + Expr::term(vars[6], 12.0))
                .le_scalar(100.0),
        )
        .unwrap();
    model
        .add_constraint(
            (Expr::term(vars[2], -1.0) + Expr::term(vars[3], 0.5) + Expr::from_constant(4.0))
                .ge_scalar(-8.0),
        )
        .unwrap();
    model
        .add_constraint(
            ConstraintExpr::new(
                Expr::term(vars[4], 1.0) + Expr::term(vars[5], 1.0) + Expr::term(vars[4], 2.0),
                ComparisonSense::Equal,
                9.0,
            ),
        )
        .unwrap();
    let long_row = vars
        .iter()
        .enumerate()
        .fold(Expr::new_empty(), |acc, (i, v)| acc + Expr::term(*v, (i + 1) as f64 * 0.1));
    model.add_constraint(long_row.le_scalar(1e6)).unwrap();

    model
        .minimize(
            Expr::term(vars[0], 3.0) - Expr::term(vars[4], 2.5)
                + Expr::term(vars[7], 1e12)
                + Expr::from_constant(-4.0),
        )
        .unwrap();
    model
}

/// Export `model`, read the text back and compare it with the model.
fn assert_round_trip(model: &Model) {
    let exported = export(model).unwrap();
    let lp = read_lp(exported.content()).unwrap();
    let map = exported.index_map();

    // Variables: same set, same bounds, same integrality.
    assert_eq!(lp.columns().len(), model.num_variables());
    for (var_id, variable) in model.variables() {
        let name = map.name_of(var_id).unwrap();
        assert_eq!(lp.columns()[map.index_of(var_id).unwrap()], name);
        assert_eq!(
            lp.bounds_of(&name),
            (variable.bounds.lower, variable.bounds.upper),
            "bounds of {name}"
        );
        assert_eq!(lp.is_binary(&name), variable.kind == VariableKind::Binary);
        assert_eq!(lp.is_general(&name), variable.kind == VariableKind::Integer);
    }

    // Constraints: same nonzero coefficients, operator and right-hand side.
    assert_eq!(lp.rows.len(), model.num_constraints());
    for (position, (_, constraint)) in model.constraints().enumerate() {
        let row = lp.row(&format!("c{position}")).unwrap();
        let expected: BTreeMap<String, f64> = constraint
            .expr()
            .normalized_terms()
            .into_iter()
            .map(|(var_id, coeff)| (map.name_of(var_id).unwrap(), coeff))
            .collect();
        let actual: BTreeMap<String, f64> = row
            .terms
            .iter()
            .filter(|(_, coeff)| *coeff != 0.0)
            .cloned()
            .collect();
        assert_eq!(actual, expected, "row c{position}");
        assert_eq!(row.sense, constraint.sense());
        assert_eq!(row.rhs, constraint.effective_rhs());
    }

    // Objective: sense and coefficients; the constant stays out of the file.
    let objective = model.objective();
    assert_eq!(Some(lp.sense), objective.sense);
    let coefficients = objective.expr.normalized_terms();
    for (var_id, _) in model.variables() {
        let name = map.name_of(var_id).unwrap();
        let expected = coefficients
            .iter()
            .find(|(id, _)| *id == var_id)
            .map_or(0.0, |(_, coeff)| *coeff);
        assert_eq!(lp.objective_coefficient(&name), expected, "objective {name}");
    }
    assert_eq!(exported.objective_offset(), objective.expr.constant());

    let again = export(model).unwrap();
    assert_eq!(again.index_map(), map);
    assert_eq!(again.content(), exported.content());
}

#[test]
fn test_export_round_trips_through_reference_reader() {
    assert_round_trip(&mixed_model());
}

#[test]
fn test_cancelled_row_round_trips() {
    let mut model = mixed_model();
    let x = VariableId::new(2);
    model
        .add_constraint((Expr::term(x, 2.5) - Expr::term(x, 2.5)).ge_scalar(3.0))
        .unwrap();
    assert_round_trip(&model);
}

#[test]
fn test_index_map_is_stable_across_exports() {
    let model = mixed_model();
    let first = export(&model).unwrap();
    let second = export(&model).unwrap();
    assert_eq!(first.index_map(), second.index_map());
    assert_eq!(first.content(), second.content());
}

#[test]
fn test_maximize_sense_survives() {
    let mut model = Model::new();
    let x = model.add_variable(Variable::binary()).unwrap();
    model.maximize(Expr::term(x, -2.0)).unwrap();
    let lp = read_lp(export(&model).unwrap().content()).unwrap();
    assert_eq!(lp.sense, Sense::Maximize);
    assert_eq!(lp.objective_coefficient("x0"), -2.0);
    assert!(lp.is_binary("x0"));
    assert_eq!(lp.bounds_of("x0"), (0.0, 1.0));
}

fn finite_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(1.0),
        -1e3..1e3f64,
        (-1e15..1e15f64),
        (-1e-9..1e-9f64),
        (1..9i32, -12..12i32).prop_map(|(m, e)| f64::from(m) * 10f64.powi(e)),
    ]
}

fn bounds() -> impl Strategy<Value = Bounds> {
    let lower = prop_oneof![Just(f64::NEG_INFINITY), Just(0.0), finite_value()];
    let upper = prop_oneof![Just(f64::INFINITY), Just(0.0), finite_value()];
    // Only finite pairs can come out of order; swapping them keeps -inf low and +inf high.
    (lower, upper).prop_map(|(a, b)| if a <= b { Bounds::new(a, b) } else { Bounds::new(b, a) })
}

fn variable() -> impl Strategy<Value = Variable> {
    prop_oneof![
        Just(Variable::binary()),
        bounds().prop_map(Variable::continuous),
        bounds().prop_map(Variable::integer),
    ]
}

fn sense() -> impl Strategy<Value = ComparisonSense> {
    prop_oneof![
        Just(ComparisonSense::LessEqual),
        Just(ComparisonSense::GreaterEqual),
        Just(ComparisonSense::Equal),
    ]
}

/// Raw pieces of a model; variable references are taken modulo the variable count.
#[derive(Debug, Clone)]
struct ModelParts {
    variables: Vec<Variable>,
    rows: Vec<(Vec<(usize, f64)>, f64, ComparisonSense, f64)>,
    objective: Vec<(usize, f64)>,
    objective_constant: f64,
    maximize: bool,
}

fn terms() -> impl Strategy<Value = Vec<(usize, f64)>> {
    prop::collection::vec((0..64usize, finite_value()), 0..12)
}

fn model_parts() -> impl Strategy<Value = ModelParts> {
    (
        prop::collection::vec(variable(), 1..12),
        prop::collection::vec((terms(), finite_value(), sense(), finite_value()), 0..8),
        terms(),
        finite_value(),
        any::<bool>(),
    )
        .prop_map(|(variables, rows, objective, objective_constant, maximize)| ModelParts {
            variables,
            rows,
            objective,
            objective_constant,
            maximize,
        })
}

fn linear(terms: &[(usize, f64)], vars: &[VariableId], constant: f64) -> Expr {
    terms
        .iter()
        .fold(Expr::from_constant(constant), |acc, (index, coeff)| {
            acc + Expr::term(vars[index % vars.len()], *coeff)
        })
}

fn build(parts: &ModelParts) -> Model {
    let mut model = Model::new();
    let vars: Vec<VariableId> = parts
        .variables
        .iter()
        .map(|variable| model.add_variable(*variable).unwrap())
        .collect();
    for (row, constant, sense, rhs) in &parts.rows {
        model
            .add_constraint(ConstraintExpr::new(linear(row, &vars, *constant), *sense, *rhs))
            .unwrap();
    }
    let objective = linear(&parts.objective, &vars, parts.objective_constant);
    if parts.maximize {
        model.maximize(objective).unwrap();
    } else {
        model.minimize(objective).unwrap();
    }
    model
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_generated_models_round_trip(parts in model_parts()) {
        let model = build(&parts);
        prop_assume!(!model.objective().expr.normalized_terms().is_empty());
        assert_round_trip(&model);
    }
}
