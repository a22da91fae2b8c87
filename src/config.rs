use crate::cell::Cell;
use crate::error::GridError;
use crate::{DEFAULT_DISPLAY_SIZE, DEFAULT_ROWS};
use grid_util::point::Point;

/// Size of the grid and of the square display it is drawn on. The search itself only uses
/// [rows](Self::rows); the pixel extent is there so a renderer and a mouse handler agree on how
/// large a cell is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridConfig {
    rows: usize,
    display_size: usize,
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            rows: DEFAULT_ROWS,
            display_size: DEFAULT_DISPLAY_SIZE,
        }
    }
}

impl GridConfig {
    pub fn new(rows: usize, display_size: usize) -> Result<GridConfig, GridError> {
        if rows == 0 {
            return Err(GridError::InvalidConfig("a grid needs at least one row".into()));
        }
        if display_size < rows {
            return Err(GridError::InvalidConfig(format!(
                "a display of {display_size}px cannot hold {rows} rows"
            )));
        }
        Ok(GridConfig { rows, display_size })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn display_size(&self) -> usize {
        self.display_size
    }

    /// Side length of one cell in pixels. Any remainder of the display is left unused.
    pub fn block_size(&self) -> usize {
        self.display_size / self.rows
    }

    /// Maps a pixel position to the cell drawn under it. The horizontal pixel axis selects the
    /// row and the vertical axis the column, matching [origin](Self::origin).
    pub fn cell_at(&self, pixel: Point) -> Option<Cell> {
        if pixel.x < 0 || pixel.y < 0 {
            return None;
        }
        let block = self.block_size();
        let cell = Cell::new(pixel.x as usize / block, pixel.y as usize / block);
        (cell.row < self.rows && cell.col < self.rows).then_some(cell)
    }

    /// Top-left pixel of a cell.
    pub fn origin(&self, cell: Cell) -> Point {
        let block = self.block_size();
        Point::new((cell.row * block) as i32, (cell.col * block) as i32)
    }
}
