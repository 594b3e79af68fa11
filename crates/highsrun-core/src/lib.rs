//! Model container for highsrun with a read-only view used by solver bridges.

pub mod model;
pub mod types;
pub mod view;

pub use model::{Model, ModelError};
pub use types::{Bounds, Objective, Sense, Variable, VariableKind};
pub use view::ModelView;
