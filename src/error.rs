use crate::cell::{Cell, CellState, Role};
use thiserror::Error;

/// Everything that can go wrong when editing a grid or searching it. All of these are
/// recoverable: a rejected command leaves the grid exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({row}, {col}) lies outside the {rows}x{rows} grid")]
    OutOfBounds { row: usize, col: usize, rows: usize },
    /// The cell already holds the role opposite to the one being assigned.
    #[error("cannot make {cell} the {role}: it already holds the other role")]
    RoleConflict { cell: Cell, role: Role },
    /// Barrier edits on a cell holding a role. The role has to be cleared first.
    #[error("cannot change the barrier on {cell} while it is the {state} cell")]
    InvalidTransition { cell: Cell, state: CellState },
    #[error("no path exists from {start} to {end}")]
    Unreachable { start: Cell, end: Cell },
    /// Reconstruction was asked for an end cell that the search never reached.
    #[error("no path to {end} has been recorded")]
    NoPath { end: Cell },
    #[error("the {0} cell has not been placed")]
    RoleUnset(Role),
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid grid layout on line {line}: {reason}")]
    InvalidLayout { line: usize, reason: String },
}
