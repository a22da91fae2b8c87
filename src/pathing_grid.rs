use crate::cell::{Cell, CellState, Role};
use crate::config::GridConfig;
use crate::error::GridError;
use core::fmt;
use core::str::FromStr;
use itertools::iproduct;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Distance of a cell the current search has not reached.
pub const INFINITE_DISTANCE: u32 = u32::MAX;

/// Per-cell bookkeeping owned by the search. Cleared by
/// [reset_transient_state](PathingGrid::reset_transient_state) and at the start of every run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchSlot {
    /// Best known distance from the start, [INFINITE_DISTANCE] if not reached.
    pub distance: u32,
    /// Set while the cell has a pending entry in the priority queue.
    pub in_frontier: bool,
    pub predecessor: Option<Cell>,
}

impl Default for SearchSlot {
    fn default() -> SearchSlot {
        SearchSlot {
            distance: INFINITE_DISTANCE,
            in_frontier: false,
            predecessor: None,
        }
    }
}

/// [PathingGrid] is a square arena of cells stored row-major. Besides the [CellState] of every
/// cell it keeps the two role slots, the transient [SearchSlot]s written by the search, and a
/// [UnionFind] over passable cells that answers reachability questions without searching.
///
/// All mutation goes through commands that check the grid invariants first: at most one start
/// and one end, never on the same cell, and never on a barrier. A rejected command changes
/// nothing.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    rows: usize,
    cells: Vec<CellState>,
    slots: Vec<SearchSlot>,
    start: Option<Cell>,
    end: Option<Cell>,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl PathingGrid {
    /// Creates an `n`×`n` grid of free cells.
    pub fn new(n: usize) -> Result<PathingGrid, GridError> {
        if n == 0 {
            return Err(GridError::InvalidConfig(
                "a grid needs at least one row".into(),
            ));
        }
        let len = n.checked_mul(n).ok_or_else(|| {
            GridError::InvalidConfig(format!("a {n}x{n} grid has too many cells"))
        })?;
        let mut grid = PathingGrid {
            rows: n,
            cells: vec![CellState::Free; len],
            slots: vec![SearchSlot::default(); len],
            start: None,
            end: None,
            components: UnionFind::new(len),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    pub fn with_config(config: &GridConfig) -> Result<PathingGrid, GridError> {
        PathingGrid::new(config.rows())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn start(&self) -> Option<Cell> {
        self.start
    }

    pub fn end(&self) -> Option<Cell> {
        self.end
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.rows
    }

    /// Validates a coordinate pair and returns the cell it addresses.
    pub fn cell(&self, row: usize, col: usize) -> Result<Cell, GridError> {
        if self.contains(row, col) {
            Ok(Cell::new(row, col))
        } else {
            Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
            })
        }
    }

    pub(crate) fn check(&self, cell: Cell) -> Result<Cell, GridError> {
        self.cell(cell.row, cell.col)
    }

    fn ix(&self, cell: Cell) -> usize {
        cell.row * self.rows + cell.col
    }

    pub fn state(&self, cell: Cell) -> Option<CellState> {
        self.contains(cell.row, cell.col)
            .then(|| self.cells[self.ix(cell)])
    }

    /// Iterates over every cell in row-major order together with its state.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        iproduct!(0..self.rows, 0..self.rows).map(move |(row, col)| {
            let cell = Cell::new(row, col);
            (cell, self.cells[self.ix(cell)])
        })
    }

    pub fn barrier_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|state| **state == CellState::Barrier)
            .count()
    }

    fn set_state(&mut self, cell: Cell, state: CellState) {
        let ix = self.ix(cell);
        self.cells[ix] = state;
    }

    /// Turns a free cell into a barrier. Barriers stay barriers; start and end cells have to
    /// lose their role first.
    pub fn set_barrier(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        let cell = self.cell(row, col)?;
        match self.cells[self.ix(cell)] {
            CellState::Free => {
                debug!("Placing barrier at {}", cell);
                self.set_state(cell, CellState::Barrier);
                // Removing a passable cell can split a component
                self.components_dirty = true;
                Ok(())
            }
            CellState::Barrier => Ok(()),
            state @ (CellState::Start | CellState::End) => {
                Err(GridError::InvalidTransition { cell, state })
            }
        }
    }

    /// Turns a barrier back into a free cell; free cells are left alone.
    pub fn clear_barrier(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        let cell = self.cell(row, col)?;
        match self.cells[self.ix(cell)] {
            CellState::Barrier => {
                debug!("Removing barrier at {}", cell);
                self.set_state(cell, CellState::Free);
                self.join_components(cell);
                Ok(())
            }
            CellState::Free => Ok(()),
            state @ (CellState::Start | CellState::End) => {
                Err(GridError::InvalidTransition { cell, state })
            }
        }
    }

    pub fn set_start(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.set_role(Role::Start, row, col)
    }

    pub fn set_end(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        self.set_role(Role::End, row, col)
    }

    /// Assigns a role to a cell. A barrier on the cell is cleared, and if the role was already
    /// held by another cell that cell becomes free. Fails when the cell holds the other role.
    pub fn set_role(&mut self, role: Role, row: usize, col: usize) -> Result<(), GridError> {
        let cell = self.cell(row, col)?;
        let current = self.cells[self.ix(cell)];
        if current == role.state() {
            return Ok(());
        }
        if current == role.other().state() {
            return Err(GridError::RoleConflict { cell, role });
        }
        if let Some(previous) = self.role_slot(role).take() {
            debug!("Moving {} from {} to {}", role, previous, cell);
            self.set_state(previous, CellState::Free);
        }
        self.set_state(cell, role.state());
        *self.role_slot(role) = Some(cell);
        if current == CellState::Barrier {
            self.join_components(cell);
        }
        debug!("Placed {} at {}", role, cell);
        Ok(())
    }

    fn role_slot(&mut self, role: Role) -> &mut Option<Cell> {
        match role {
            Role::Start => &mut self.start,
            Role::End => &mut self.end,
        }
    }

    /// Removes the start or end role from a cell, leaving it free. Other cells are untouched.
    pub fn clear_role(&mut self, cell: Cell) -> Result<(), GridError> {
        let cell = self.check(cell)?;
        if let Some(role) = self.cells[self.ix(cell)].role() {
            debug!("Clearing {} at {}", role, cell);
            *self.role_slot(role) = None;
            self.set_state(cell, CellState::Free);
        }
        Ok(())
    }

    /// Returns a cell to [CellState::Free] whatever it held before.
    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<(), GridError> {
        let cell = self.cell(row, col)?;
        match self.cells[self.ix(cell)] {
            CellState::Start | CellState::End => self.clear_role(cell),
            CellState::Barrier => self.clear_barrier(row, col),
            CellState::Free => Ok(()),
        }
    }

    /// Frees every cell, forgets both roles and drops any search state.
    pub fn clear_all(&mut self) {
        info!("Clearing the whole grid");
        self.cells.fill(CellState::Free);
        self.start = None;
        self.end = None;
        self.reset_transient_state();
        self.generate_components();
    }

    /// The passable cells around `cell`, in up, down, left, right order.
    pub fn neighbors(&self, cell: Cell) -> SmallVec<[Cell; 4]> {
        cell.neumann_neighborhood(self.rows)
            .into_iter()
            .filter(|n| self.cells[self.ix(*n)].is_passable())
            .collect()
    }

    /// Clears the distances, frontier flags and predecessors left by the last search. Roles and
    /// barriers are not affected.
    pub fn reset_transient_state(&mut self) {
        self.slots.fill(SearchSlot::default());
    }

    pub fn slot(&self, cell: Cell) -> Option<&SearchSlot> {
        self.contains(cell.row, cell.col)
            .then(|| &self.slots[self.ix(cell)])
    }

    pub(crate) fn slot_mut(&mut self, cell: Cell) -> &mut SearchSlot {
        let ix = self.ix(cell);
        &mut self.slots[ix]
    }

    /// Distance found by the last search, [None] if the cell was not reached.
    pub fn distance(&self, cell: Cell) -> Option<u32> {
        self.slot(cell)
            .map(|slot| slot.distance)
            .filter(|d| *d != INFINITE_DISTANCE)
    }

    /// Whether a barrier was added since the components were last generated.
    pub fn components_dirty(&self) -> bool {
        self.components_dirty
    }

    /// Retrieves the component id a given cell belongs to. Stale until [update](Self::update)
    /// runs after a barrier is added.
    pub fn component(&self, cell: Cell) -> Option<usize> {
        self.contains(cell.row, cell.col)
            .then(|| self.components.find(self.ix(cell)))
    }

    fn join_components(&mut self, cell: Cell) {
        let ix = self.ix(cell);
        for n in self.neighbors(cell) {
            let n_ix = self.ix(n);
            self.components.union(ix, n_ix);
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up passable neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        let n = self.rows;
        self.components = UnionFind::new(n * n);
        self.components_dirty = false;
        for (row, col) in iproduct!(0..n, 0..n) {
            let cell = Cell::new(row, col);
            if !self.cells[self.ix(cell)].is_passable() {
                continue;
            }
            // Linking down and right covers every edge once
            let ix = self.ix(cell);
            for next in [Cell::new(row + 1, col), Cell::new(row, col + 1)] {
                if self.state(next).is_some_and(|s| s.is_passable()) {
                    let next_ix = self.ix(next);
                    self.components.union(ix, next_ix);
                }
            }
        }
    }

    /// Checks if a path between two passable cells can exist. Regenerates stale components
    /// first. Out-of-bounds cells and barriers are never reachable.
    pub fn reachable(&mut self, start: Cell, goal: Cell) -> bool {
        self.update();
        match (self.state(start), self.state(goal)) {
            (Some(s), Some(g)) if s.is_passable() && g.is_passable() => {
                self.components.equiv(self.ix(start), self.ix(goal))
            }
            _ => false,
        }
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.rows) {
            let line: String = row.iter().map(|state| state.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Parses the format written by [Display](fmt::Display): one line per row, `.` free, `#`
/// barrier, `S` start, `E` end. Blank lines and surrounding whitespace are ignored.
impl FromStr for PathingGrid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<PathingGrid, GridError> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let mut grid = PathingGrid::new(lines.len()).map_err(|_| GridError::InvalidLayout {
            line: 1,
            reason: "layout is empty".into(),
        })?;
        for (row, line) in lines.iter().enumerate() {
            let layout_err = |reason: String| GridError::InvalidLayout {
                line: row + 1,
                reason,
            };
            let width = line.chars().count();
            if width != grid.rows {
                return Err(layout_err(format!(
                    "expected {} cells, found {}",
                    grid.rows, width
                )));
            }
            for (col, symbol) in line.chars().enumerate() {
                let state = CellState::from_symbol(symbol)
                    .ok_or_else(|| layout_err(format!("unknown cell symbol '{symbol}'")))?;
                match state.role() {
                    Some(role) => {
                        if grid.role_slot(role).is_some() {
                            return Err(layout_err(format!("more than one {role} cell")));
                        }
                        grid.set_role(role, row, col)?;
                    }
                    None if state == CellState::Barrier => grid.set_barrier(row, col)?,
                    None => {}
                }
            }
        }
        grid.update();
        Ok(grid)
    }
}
