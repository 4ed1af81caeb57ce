//! Placement of a `rows x cols` panel grid inside a figure

use super::config::SubplotParams;
use super::error::LayoutError;
use super::solver::{CellVariable, ConstraintSolver, GridConstraint};
use super::types::BoundingBox;

/// Compute panel rectangles for a grid, in row-major order.
///
/// `width` and `height` are the figure extent in output units; the returned
/// rectangles use the same units with y growing downwards.
pub fn grid_cells(
    rows: usize,
    cols: usize,
    width: f64,
    height: f64,
    params: &SubplotParams,
) -> Result<Vec<BoundingBox>, LayoutError> {
    if rows == 0 || cols == 0 {
        return Err(LayoutError::InvalidGrid { rows, cols });
    }
    if params.right <= params.left {
        return Err(LayoutError::InvalidMargins {
            reason: format!("right ({}) must exceed left ({})", params.right, params.left),
        });
    }
    if params.top <= params.bottom {
        return Err(LayoutError::InvalidMargins {
            reason: format!("top ({}) must exceed bottom ({})", params.top, params.bottom),
        });
    }

    let left = params.left * width;
    let right = params.right * width;
    let top = (1.0 - params.top) * height;
    let bottom = (1.0 - params.bottom) * height;

    let mut solver = ConstraintSolver::new();
    for row in 0..rows {
        for col in 0..cols {
            // Every panel shares the size of the first one
            if row > 0 || col > 0 {
                solver.add_constraint(GridConstraint::SameAs {
                    variable: CellVariable::width(row, col),
                    reference: CellVariable::width(0, 0),
                })?;
                solver.add_constraint(GridConstraint::SameAs {
                    variable: CellVariable::height(row, col),
                    reference: CellVariable::height(0, 0),
                })?;
            }

            if col == 0 {
                solver.add_constraint(GridConstraint::Fixed {
                    variable: CellVariable::x(row, 0),
                    value: left,
                })?;
            } else {
                solver.add_constraint(GridConstraint::Follows {
                    next: CellVariable::x(row, col),
                    prev: CellVariable::x(row, col - 1),
                    extent: CellVariable::width(row, col - 1),
                    factor: 1.0 + params.wspace,
                })?;
            }

            if row == 0 {
                solver.add_constraint(GridConstraint::Fixed {
                    variable: CellVariable::y(0, col),
                    value: top,
                })?;
            } else {
                solver.add_constraint(GridConstraint::Follows {
                    next: CellVariable::y(row, col),
                    prev: CellVariable::y(row - 1, col),
                    extent: CellVariable::height(row - 1, col),
                    factor: 1.0 + params.hspace,
                })?;
            }
        }
    }

    // Pin the far edges once; the other rows and columns follow through equal sizes
    solver.add_constraint(GridConstraint::EndsAt {
        start: CellVariable::x(0, cols - 1),
        extent: CellVariable::width(0, cols - 1),
        value: right,
    })?;
    solver.add_constraint(GridConstraint::EndsAt {
        start: CellVariable::y(rows - 1, 0),
        extent: CellVariable::height(rows - 1, 0),
        value: bottom,
    })?;

    let solution = solver.solve();
    let cells = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .map(|(row, col)| {
            BoundingBox::new(
                solution.get(CellVariable::x(row, col)),
                solution.get(CellVariable::y(row, col)),
                solution.get(CellVariable::width(row, col)),
                solution.get(CellVariable::height(row, col)),
            )
        })
        .collect();
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_single_cell_uses_margins() {
        let params = SubplotParams::default();
        let cells = grid_cells(1, 1, 640.0, 480.0, &params).unwrap();
        assert_eq!(cells.len(), 1);
        let c = cells[0];
        assert!(close(c.x, 80.0));
        assert!(close(c.right(), 576.0));
        assert!(close(c.y, 480.0 * 0.12));
        assert!(close(c.bottom(), 480.0 * 0.89));
    }

    #[test]
    fn test_two_columns_share_width_and_gap() {
        let params = SubplotParams::new()
            .with_margins(0.0, 1.0, 0.0, 1.0)
            .with_spacing(0.25, 0.0);
        // 2w + 0.25w = 900  =>  w = 400, gap = 100
        let cells = grid_cells(1, 2, 900.0, 100.0, &params).unwrap();
        assert!(close(cells[0].width, 400.0));
        assert!(close(cells[1].width, 400.0));
        assert!(close(cells[1].x, 500.0));
        assert!(close(cells[1].height, 100.0));
    }

    #[test]
    fn test_rows_are_row_major() {
        let params = SubplotParams::new()
            .with_margins(0.0, 1.0, 0.0, 1.0)
            .with_spacing(0.0, 0.0);
        let cells = grid_cells(2, 2, 200.0, 200.0, &params).unwrap();
        assert_eq!(cells.len(), 4);
        assert!(close(cells[1].x, 100.0) && close(cells[1].y, 0.0));
        assert!(close(cells[2].x, 0.0) && close(cells[2].y, 100.0));
        assert!(close(cells[3].x, 100.0) && close(cells[3].y, 100.0));
    }

    #[test]
    fn test_invalid_grid() {
        let params = SubplotParams::default();
        assert!(matches!(
            grid_cells(0, 2, 100.0, 100.0, &params),
            Err(LayoutError::InvalidGrid { rows: 0, cols: 2 })
        ));
    }

    #[test]
    fn test_invalid_margins() {
        let params = SubplotParams::new().with_margins(0.6, 0.4, 0.1, 0.9);
        assert!(matches!(
            grid_cells(1, 1, 100.0, 100.0, &params),
            Err(LayoutError::InvalidMargins { .. })
        ));
    }
}
