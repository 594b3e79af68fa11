//! Variable identity to file column mapping.

use std::collections::HashMap;

use highsrun_expr::VariableId;
use highsrun_solver::SolverError;

const COLUMN_PREFIX: char = 'x';

/// Bidirectional map between model variables and exported column positions.
///
/// Column `i` is written as `x<i>` in every file the bridge produces, so the
/// map is all the parser needs to turn solver output back into variable values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableIndexMap {
    columns: Vec<VariableId>,
    positions: HashMap<VariableId, usize>,
}

impl VariableIndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next column to `variable`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedModelConstruct` if the variable already has a column.
    pub fn insert(&mut self, variable: VariableId) -> Result<usize, SolverError> {
        if self.positions.contains_key(&variable) {
            return Err(SolverError::unsupported(format!(
                "variable {variable} is declared more than once"
            )));
        }
        let index = self.columns.len();
        self.columns.push(variable);
        self.positions.insert(variable, index);
        Ok(index)
    }

    pub fn index_of(&self, variable: VariableId) -> Option<usize> {
        self.positions.get(&variable).copied()
    }

    pub fn variable_at(&self, index: usize) -> Option<VariableId> {
        self.columns.get(index).copied()
    }

    pub fn contains(&self, variable: VariableId) -> bool {
        self.positions.contains_key(&variable)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Variables in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, VariableId)> + '_ {
        self.columns.iter().copied().enumerate()
    }

    pub fn column_name(index: usize) -> String {
        format!("{COLUMN_PREFIX}{index}")
    }

    /// Column name for a variable, if it was exported.
    pub fn name_of(&self, variable: VariableId) -> Option<String> {
        self.index_of(variable).map(Self::column_name)
    }

    /// Resolve a column name from a solver file back to its variable.
    ///
    /// # Errors
    ///
    /// Returns `IndexReconciliation` for names that are not `x<n>` or whose
    /// index is outside the exported range.
    pub fn resolve(&self, column: &str) -> Result<VariableId, SolverError> {
        column
            .strip_prefix(COLUMN_PREFIX)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<usize>().ok())
            .and_then(|index| self.variable_at(index))
            .ok_or_else(|| SolverError::IndexReconciliation {
                column: column.to_string(),
                known_columns: self.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> VariableIndexMap {
        let mut map = VariableIndexMap::new();
        for raw in [4, 1, 9] {
            map.insert(VariableId::new(raw)).unwrap();
        }
        map
    }

    #[test]
    fn test_insert_assigns_positions_in_order() {
        let map = sample_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map.index_of(VariableId::new(4)), Some(0));
        assert_eq!(map.index_of(VariableId::new(1)), Some(1));
        assert_eq!(map.index_of(VariableId::new(9)), Some(2));
        assert_eq!(map.variable_at(2), Some(VariableId::new(9)));
        assert_eq!(map.variable_at(3), None);
        assert_eq!(map.name_of(VariableId::new(1)).as_deref(), Some("x1"));
        assert_eq!(map.name_of(VariableId::new(2)), None);
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut map = sample_map();
        let err = map.insert(VariableId::new(1)).unwrap_err();
        assert_eq!(err.code(), "MODEL_UNSUPPORTED_CONSTRUCT");
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_resolve_round_trips_column_names() {
        let map = sample_map();
        for (index, variable) in map.iter() {
            let name = VariableIndexMap::column_name(index);
            assert_eq!(map.resolve(&name).unwrap(), variable);
        }
    }

    #[test]
    fn test_resolve_rejects_unknown_columns() {
        let map = sample_map();
        for bad in ["x3", "x", "y0", "x-1", "x+1", "x1a", "c0", ""] {
            let err = map.resolve(bad).unwrap_err();
            assert!(
                matches!(err, SolverError::IndexReconciliation { known_columns: 3, .. }),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn test_equal_maps_compare_equal() {
        assert_eq!(sample_map(), sample_map());
    }
}
