use core::fmt;
use smallvec::SmallVec;

/// A position on the grid, addressed by row and column. Two cells are the same cell exactly when
/// their indices are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    /// Number of unit moves between two cells on a 4-grid.
    pub fn manhattan_distance(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether the two cells share an edge.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// The up to four in-bounds cells around this one on a grid with `rows` rows and columns,
    /// in [Direction::ALL] order. Barriers are not filtered here.
    pub fn neumann_neighborhood(&self, rows: usize) -> SmallVec<[Cell; 4]> {
        Direction::ALL
            .iter()
            .filter_map(|dir| self.step(*dir, rows))
            .collect()
    }

    /// The cell one step in `dir`, if it stays within a `rows`×`rows` grid.
    pub fn step(&self, dir: Direction, rows: usize) -> Option<Cell> {
        let (row, col) = match dir {
            Direction::Up => (self.row.checked_sub(1)?, self.col),
            Direction::Down => (self.row + 1, self.col),
            Direction::Left => (self.row, self.col.checked_sub(1)?),
            Direction::Right => (self.row, self.col + 1),
        };
        (row < rows && col < rows).then_some(Cell::new(row, col))
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Cell {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four moves of the 4-neighbourhood. The declaration order is the expansion order of the
/// search and decides which of two equally short paths is found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// The user-assigned state of a cell. Exactly one state holds at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Free,
    Barrier,
    Start,
    End,
}

impl CellState {
    pub fn is_passable(&self) -> bool {
        *self != CellState::Barrier
    }

    /// The role carried by this state, if any.
    pub fn role(&self) -> Option<Role> {
        match self {
            CellState::Start => Some(Role::Start),
            CellState::End => Some(Role::End),
            CellState::Free | CellState::Barrier => None,
        }
    }

    /// Character used by the ASCII form of a grid.
    pub fn symbol(&self) -> char {
        match self {
            CellState::Free => '.',
            CellState::Barrier => '#',
            CellState::Start => 'S',
            CellState::End => 'E',
        }
    }

    pub fn from_symbol(c: char) -> Option<CellState> {
        match c {
            '.' => Some(CellState::Free),
            '#' => Some(CellState::Barrier),
            'S' => Some(CellState::Start),
            'E' => Some(CellState::End),
            _ => None,
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CellState::Free => "free",
            CellState::Barrier => "barrier",
            CellState::Start => "start",
            CellState::End => "end",
        };
        f.write_str(name)
    }
}

/// One of the two endpoint roles a cell can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Start,
    End,
}

impl Role {
    pub fn other(&self) -> Role {
        match self {
            Role::Start => Role::End,
            Role::End => Role::Start,
        }
    }

    pub fn state(&self) -> CellState {
        match self {
            Role::Start => CellState::Start,
            Role::End => CellState::End,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::Start => f.write_str("start"),
            Role::End => f.write_str("end"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbourhood_order_and_bounds() {
        let centre = Cell::new(1, 1);
        assert_eq!(
            centre.neumann_neighborhood(3).as_slice(),
            &[
                Cell::new(0, 1),
                Cell::new(2, 1),
                Cell::new(1, 0),
                Cell::new(1, 2)
            ]
        );
        // Corner cells lose the moves leaving the grid
        let corner = Cell::new(0, 0);
        assert_eq!(
            corner.neumann_neighborhood(3).as_slice(),
            &[Cell::new(1, 0), Cell::new(0, 1)]
        );
        let far_corner = Cell::new(2, 2);
        assert_eq!(
            far_corner.neumann_neighborhood(3).as_slice(),
            &[Cell::new(1, 2), Cell::new(2, 1)]
        );
    }

    #[test]
    fn symbols_round_trip() {
        for state in [
            CellState::Free,
            CellState::Barrier,
            CellState::Start,
            CellState::End,
        ] {
            assert_eq!(CellState::from_symbol(state.symbol()), Some(state));
        }
        assert_eq!(CellState::from_symbol('x'), None);
    }
}
