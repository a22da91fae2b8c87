use crate::cell::{Cell, CellState};
use crate::config::GridConfig;
use crate::error::GridError;
use crate::pathing_grid::PathingGrid;
use crate::search::{SearchEvent, SearchOutcome};
use grid_util::point::Point;
use log::debug;

/// Edits and runs accepted by a [Session].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    SetBarrier(usize, usize),
    ClearCell(usize, usize),
    SetStart(usize, usize),
    SetEnd(usize, usize),
    /// Search between the current start and end.
    Run,
    /// Forget the last search but keep roles and barriers.
    Reset,
    /// Free every cell and forget both roles.
    ClearAll,
}

/// Mouse buttons as far as the grid is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
}

/// The replayable result of one search: events in emission order and how it ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recording {
    pub events: Vec<SearchEvent>,
    pub outcome: SearchOutcome,
}

impl Recording {
    /// Interior path cells, empty when the end was not reached.
    pub fn path(&self) -> &[Cell] {
        match &self.outcome {
            SearchOutcome::PathFound(path) => path.as_slice(),
            SearchOutcome::Unreachable => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Updated,
    Searched(Recording),
}

/// Owns a grid between searches and turns user commands into grid edits and search runs. The
/// last recording is dropped whenever the grid changes.
#[derive(Clone, Debug)]
pub struct Session {
    config: GridConfig,
    grid: PathingGrid,
    recording: Option<Recording>,
}

impl Session {
    pub fn new(config: GridConfig) -> Result<Session, GridError> {
        Ok(Session {
            grid: PathingGrid::with_config(&config)?,
            config,
            recording: None,
        })
    }

    /// Wraps an already populated grid, e.g. one parsed from text.
    pub fn from_grid(grid: PathingGrid, display_size: usize) -> Result<Session, GridError> {
        Ok(Session {
            config: GridConfig::new(grid.rows(), display_size)?,
            grid,
            recording: None,
        })
    }

    pub fn grid(&self) -> &PathingGrid {
        &self.grid
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn recording(&self) -> Option<&Recording> {
        self.recording.as_ref()
    }

    pub fn apply(&mut self, command: Command) -> Result<Response, GridError> {
        debug!("Applying {:?}", command);
        match command {
            Command::SetBarrier(row, col) => self.edit(|g| g.set_barrier(row, col)),
            Command::ClearCell(row, col) => self.edit(|g| g.clear_cell(row, col)),
            Command::SetStart(row, col) => self.edit(|g| g.set_start(row, col)),
            Command::SetEnd(row, col) => self.edit(|g| g.set_end(row, col)),
            Command::Run => self.run().map(Response::Searched),
            Command::Reset => {
                self.reset();
                Ok(Response::Updated)
            }
            Command::ClearAll => {
                self.grid.clear_all();
                self.recording = None;
                Ok(Response::Updated)
            }
        }
    }

    fn edit<F>(&mut self, edit: F) -> Result<Response, GridError>
    where
        F: FnOnce(&mut PathingGrid) -> Result<(), GridError>,
    {
        edit(&mut self.grid)?;
        self.reset();
        Ok(Response::Updated)
    }

    /// Searches between the placed start and end and keeps the result for [replay](Self::replay).
    pub fn run(&mut self) -> Result<Recording, GridError> {
        let run = self.grid.search()?;
        let recording = Recording {
            outcome: run.outcome(),
            events: run.events,
        };
        self.recording = Some(recording.clone());
        Ok(recording)
    }

    /// Clears the previous search and runs it again. On an unchanged grid this yields the same
    /// recording as the previous run.
    pub fn replay(&mut self) -> Result<Recording, GridError> {
        self.reset();
        self.run()
    }

    pub fn reset(&mut self) {
        self.grid.reset_transient_state();
        self.recording = None;
    }

    /// Primary click: place the start if there is none, then the end, then barriers. Clicking
    /// the start or end cell itself does nothing.
    pub fn primary_click(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        let cell = self.grid.cell(row, col)?;
        let state = self.grid.state(cell).unwrap_or_default();
        let command = if self.grid.start().is_none() && state != CellState::End {
            Command::SetStart(row, col)
        } else if self.grid.end().is_none() && state != CellState::Start {
            Command::SetEnd(row, col)
        } else if state.role().is_none() {
            Command::SetBarrier(row, col)
        } else {
            return Ok(());
        };
        self.apply(command).map(|_| ())
    }

    /// Secondary click: whatever the cell held, it becomes free.
    pub fn secondary_click(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.apply(Command::ClearCell(row, col)).map(|_| ())
    }

    /// Clicks at a pixel position. Positions outside the grid are ignored.
    pub fn click(&mut self, pixel: Point, button: Button) -> Result<(), GridError> {
        let Some(cell) = self.config.cell_at(pixel) else {
            return Ok(());
        };
        match button {
            Button::Primary => self.primary_click(cell.row, cell.col),
            Button::Secondary => self.secondary_click(cell.row, cell.col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Role;

    fn session(n: usize) -> Session {
        Session::new(GridConfig::new(n, n * 10).unwrap()).unwrap()
    }

    #[test]
    fn clicks_place_start_end_then_barriers() {
        let mut s = session(3);
        s.primary_click(0, 0).unwrap();
        s.primary_click(2, 2).unwrap();
        s.primary_click(1, 1).unwrap();
        // Clicking a role cell again is ignored
        s.primary_click(0, 0).unwrap();
        assert_eq!(s.grid().to_string(), "S..\n.#.\n..E\n");
        s.secondary_click(0, 0).unwrap();
        assert_eq!(s.grid().start(), None);
        // Without a start, clicking the end cell still leaves it alone
        s.primary_click(2, 2).unwrap();
        assert_eq!(s.grid().to_string(), "...\n.#.\n..E\n");
        // The next primary click places the start again, even on a barrier
        s.primary_click(1, 1).unwrap();
        assert_eq!(s.grid().start(), Some(Cell::new(1, 1)));
        assert_eq!(s.grid().barrier_count(), 0);
    }

    #[test]
    fn pixel_clicks() {
        let mut s = session(3);
        s.click(Point::new(5, 25), Button::Primary).unwrap();
        assert_eq!(s.grid().start(), Some(Cell::new(0, 2)));
        s.click(Point::new(500, 5), Button::Primary).unwrap();
        assert_eq!(s.grid().end(), None);
        s.click(Point::new(5, 25), Button::Secondary).unwrap();
        assert_eq!(s.grid().start(), None);
    }

    #[test]
    fn run_requires_roles() {
        let mut s = session(3);
        assert_eq!(
            s.apply(Command::Run),
            Err(GridError::RoleUnset(Role::Start))
        );
    }

    #[test]
    fn edits_drop_the_recording() {
        let grid: PathingGrid = "S..\n...\n..E".parse().unwrap();
        let mut s = Session::from_grid(grid, 30).unwrap();
        let Response::Searched(recording) = s.apply(Command::Run).unwrap() else {
            panic!("run did not search");
        };
        assert_eq!(recording.path().len(), 3);
        assert_eq!(s.recording(), Some(&recording));
        s.apply(Command::SetBarrier(1, 1)).unwrap();
        assert_eq!(s.recording(), None);
        assert_eq!(s.grid().distance(Cell::new(1, 0)), None);
    }

    #[test]
    fn rejected_commands_change_nothing() {
        let grid: PathingGrid = "S.#\n...\n..E".parse().unwrap();
        let mut s = Session::from_grid(grid, 30).unwrap();
        s.run().unwrap();
        let before = s.grid().to_string();
        assert!(s.apply(Command::SetBarrier(0, 0)).is_err());
        assert!(s.apply(Command::SetStart(2, 2)).is_err());
        assert!(s.apply(Command::SetEnd(9, 9)).is_err());
        assert_eq!(s.grid().to_string(), before);
        assert!(s.recording().is_some());
    }

    #[test]
    fn replay_repeats_the_run() {
        let grid: PathingGrid = "S.#.\n.#..\n....\n#..E".parse().unwrap();
        let mut s = Session::from_grid(grid, 40).unwrap();
        let first = s.run().unwrap();
        let second = s.replay().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn clear_all_resets_everything() {
        let grid: PathingGrid = "S#\n.E".parse().unwrap();
        let mut s = Session::from_grid(grid, 20).unwrap();
        s.run().unwrap();
        assert_eq!(s.apply(Command::ClearAll), Ok(Response::Updated));
        assert_eq!(s.grid().to_string(), "..\n..\n");
        assert_eq!(s.recording(), None);
    }
}
