//! Constraint solver integration for subplot grids
//!
//! This module wraps the kasuari Cassowary solver, translating grid placement
//! rules into the solver's format and extracting solutions.

use std::collections::HashMap;

use kasuari::{
    Expression, Solver as KasuariSolver, Strength, Variable as KasuariVariable,
    WeightedRelation::*,
};
use thiserror::Error;

/// Properties of a grid cell that can be constrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellProperty {
    X,
    Y,
    Width,
    Height,
}

/// A variable in the constraint system: one property of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellVariable {
    pub row: usize,
    pub col: usize,
    pub property: CellProperty,
}

impl CellVariable {
    pub fn new(row: usize, col: usize, property: CellProperty) -> Self {
        Self { row, col, property }
    }

    pub fn x(row: usize, col: usize) -> Self {
        Self::new(row, col, CellProperty::X)
    }

    pub fn y(row: usize, col: usize) -> Self {
        Self::new(row, col, CellProperty::Y)
    }

    pub fn width(row: usize, col: usize) -> Self {
        Self::new(row, col, CellProperty::Width)
    }

    pub fn height(row: usize, col: usize) -> Self {
        Self::new(row, col, CellProperty::Height)
    }
}

/// A placement rule between cell variables
#[derive(Debug, Clone)]
pub enum GridConstraint {
    /// variable = value
    Fixed { variable: CellVariable, value: f64 },

    /// variable = reference
    SameAs {
        variable: CellVariable,
        reference: CellVariable,
    },

    /// next = prev + extent * factor (a cell placed after its neighbour)
    Follows {
        next: CellVariable,
        prev: CellVariable,
        extent: CellVariable,
        factor: f64,
    },

    /// start + extent = value (the far edge of a cell)
    EndsAt {
        start: CellVariable,
        extent: CellVariable,
        value: f64,
    },
}

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Unsatisfiable constraints: {reason}")]
    Unsatisfiable { reason: String },

    #[error("Internal solver error: {0}")]
    Internal(String),
}

/// Wrapper around kasuari solver
pub struct ConstraintSolver {
    solver: KasuariSolver,
    /// Maps our variables to kasuari variables
    variables: HashMap<CellVariable, KasuariVariable>,
}

impl ConstraintSolver {
    pub fn new() -> Self {
        Self {
            solver: KasuariSolver::new(),
            variables: HashMap::new(),
        }
    }

    /// Get or create a kasuari variable for a cell property
    fn get_or_create_var(&mut self, var: CellVariable) -> KasuariVariable {
        *self.variables.entry(var).or_insert_with(KasuariVariable::new)
    }

    fn get_expression(&mut self, var: CellVariable) -> Expression {
        self.get_or_create_var(var).into()
    }

    /// Convert a kasuari error to a SolverError with context
    fn convert_kasuari_error(e: kasuari::AddConstraintError, desc: &str) -> SolverError {
        match e {
            kasuari::AddConstraintError::UnsatisfiableConstraint => SolverError::Unsatisfiable {
                reason: format!("cannot satisfy {}", desc),
            },
            kasuari::AddConstraintError::DuplicateConstraint => {
                SolverError::Internal(format!("duplicate constraint: {}", desc))
            }
            kasuari::AddConstraintError::InternalSolverError(msg) => {
                SolverError::Internal(format!("{} ({})", msg, desc))
            }
        }
    }

    /// Add a constraint to the solver
    pub fn add_constraint(&mut self, constraint: GridConstraint) -> Result<(), SolverError> {
        let desc = format!("{:?}", constraint);
        let added = match constraint {
            GridConstraint::Fixed { variable, value } => {
                let expr = self.get_expression(variable);
                self.solver
                    .add_constraint(expr | EQ(Strength::REQUIRED) | value)
            }
            GridConstraint::SameAs {
                variable,
                reference,
            } => {
                let left = self.get_expression(variable);
                let right = self.get_expression(reference);
                self.solver
                    .add_constraint(left | EQ(Strength::REQUIRED) | right)
            }
            GridConstraint::Follows {
                next,
                prev,
                extent,
                factor,
            } => {
                let left = self.get_expression(next);
                let prev = self.get_or_create_var(prev);
                let extent = self.get_or_create_var(extent);
                self.solver
                    .add_constraint(left | EQ(Strength::REQUIRED) | prev + extent * factor)
            }
            GridConstraint::EndsAt {
                start,
                extent,
                value,
            } => {
                let start = self.get_or_create_var(start);
                let extent = self.get_or_create_var(extent);
                self.solver
                    .add_constraint(start + extent * 1.0 | EQ(Strength::REQUIRED) | value)
            }
        };
        added.map_err(|e| Self::convert_kasuari_error(e, &desc))
    }

    /// Solve the constraint system
    pub fn solve(&mut self) -> Solution {
        let changes = self.solver.fetch_changes();

        let mut values = HashMap::new();
        for (kvar, value) in changes {
            for (our_var, &k) in &self.variables {
                if k == *kvar {
                    values.insert(*our_var, *value);
                    break;
                }
            }
        }

        Solution { values }
    }
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Solution from the constraint solver
pub struct Solution {
    pub values: HashMap<CellVariable, f64>,
}

impl Solution {
    /// Value of a variable; variables the solver left at zero are not reported as changes
    pub fn get(&self, var: CellVariable) -> f64 {
        self.values.get(&var).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_constraint() {
        let mut solver = ConstraintSolver::new();
        let var = CellVariable::width(0, 0);
        solver
            .add_constraint(GridConstraint::Fixed {
                variable: var,
                value: 100.0,
            })
            .unwrap();
        let solution = solver.solve();
        assert!((solution.get(var) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_follows_and_ends_at() {
        let mut solver = ConstraintSolver::new();
        // x0 = 10, x1 = x0 + w * 1.5, x1 + w = 110  =>  w = 40, x1 = 70
        let constraints = vec![
            GridConstraint::Fixed {
                variable: CellVariable::x(0, 0),
                value: 10.0,
            },
            GridConstraint::SameAs {
                variable: CellVariable::width(0, 1),
                reference: CellVariable::width(0, 0),
            },
            GridConstraint::Follows {
                next: CellVariable::x(0, 1),
                prev: CellVariable::x(0, 0),
                extent: CellVariable::width(0, 0),
                factor: 1.5,
            },
            GridConstraint::EndsAt {
                start: CellVariable::x(0, 1),
                extent: CellVariable::width(0, 1),
                value: 110.0,
            },
        ];
        for c in constraints {
            solver.add_constraint(c).unwrap();
        }
        let solution = solver.solve();
        assert!((solution.get(CellVariable::width(0, 0)) - 40.0).abs() < 1e-6);
        assert!((solution.get(CellVariable::x(0, 1)) - 70.0).abs() < 1e-6);
    }

    #[test]
    fn test_conflicting_constraints() {
        let mut solver = ConstraintSolver::new();
        let var = CellVariable::x(0, 0);
        solver
            .add_constraint(GridConstraint::Fixed {
                variable: var,
                value: 1.0,
            })
            .unwrap();
        let err = solver
            .add_constraint(GridConstraint::Fixed {
                variable: var,
                value: 2.0,
            })
            .unwrap_err();
        assert!(matches!(err, SolverError::Unsatisfiable { .. }));
    }
}
