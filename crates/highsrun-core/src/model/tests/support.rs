use crate::model::Model;
use crate::types::{Bounds, Variable};
use highsrun_expr::VariableId;

pub(super) fn continuous_variable(lower: f64, upper: f64) -> Variable {
    Variable::continuous(Bounds::new(lower, upper))
}

pub(super) fn model_with_variables(count: usize) -> (Model, Vec<VariableId>) {
    let mut model = Model::new();
    let ids = (0..count)
        .map(|_| {
            model
                .add_variable(continuous_variable(0.0, f64::INFINITY))
                .unwrap()
        })
        .collect();
    (model, ids)
}
