//! # grid_dijkstra
//!
//! Shortest paths on an editable square grid using
//! [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm), made for
//! visualizing the search. Cells are free, barriers, or hold the start or end role; moves go
//! up, down, left and right at unit cost.
//!
//! A search does not draw anything. It emits an ordered stream of [SearchEvent]s (a cell
//! entered the frontier, a cell was finalized) that a renderer can replay at any pace, and a
//! [PredecessorMap] from which the path is rebuilt. Ties between equally distant cells are
//! broken by the order in which they were queued, so the same grid always produces the same
//! events and the same path.
//!
//! ```
//! use grid_dijkstra::{PathingGrid, SearchOutcome, Cell};
//!
//! let mut grid: PathingGrid = "S..\n.#.\n..E".parse().unwrap();
//! let run = grid.search().unwrap();
//! assert_eq!(
//!     run.outcome(),
//!     SearchOutcome::PathFound(vec![Cell::new(1, 0), Cell::new(2, 0), Cell::new(2, 1)])
//! );
//! ```
//!
//! Precomputed [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! answer whether a path can exist at all without running the search.
pub mod cell;
pub mod config;
pub mod error;
pub mod path;
pub mod pathing_grid;
pub mod search;
pub mod session;

pub use cell::{Cell, CellState, Direction, Role};
pub use config::GridConfig;
pub use error::GridError;
pub use path::{reconstruct, reconstruct_inclusive};
pub use pathing_grid::{PathingGrid, SearchSlot, INFINITE_DISTANCE};
pub use search::{
    run, run_with, EventKind, PredecessorMap, SearchEvent, SearchObserver, SearchOutcome,
    SearchRun,
};
pub use session::{Button, Command, Recording, Response, Session};

/// Rows and columns of the grid when nothing else is configured.
pub const DEFAULT_ROWS: usize = 40;
/// Side length in pixels of the square display the grid is drawn on.
pub const DEFAULT_DISPLAY_SIZE: usize = 800;
