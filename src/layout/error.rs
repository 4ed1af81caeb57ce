//! Error types for the grid layout

use thiserror::Error;

use super::solver::SolverError;

/// Errors that can occur while placing panels
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A grid needs at least one row and one column
    #[error("invalid grid shape {rows}x{cols}: rows and columns must be at least 1")]
    InvalidGrid { rows: usize, cols: usize },

    /// Margins leave no room for panels
    #[error("subplot margins leave no room for panels: {reason}")]
    InvalidMargins { reason: String },

    /// Constraint solver error
    #[error("solver error: {0}")]
    Solver(#[from] SolverError),
}
