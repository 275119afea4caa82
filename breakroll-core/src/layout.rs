//! Placement of catalog items onto the fixed board grid.
//!
//! The board is a `columns × rows` grid with one rectangular block reserved for
//! the banner. Items fill the remaining cells in row-major order; anything past
//! the remaining capacity is dropped rather than growing the grid.
use log::debug;
use thiserror::Error;

use crate::constants::{BANNER_COLUMNS, BANNER_ROW, BANNER_ROWS, GRID_COLUMNS, GRID_ROWS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("grid must have at least one row and one column (got {columns}x{rows})")]
    EmptyGrid { columns: usize, rows: usize },
    #[error("grid {columns}x{rows} has more cells than can be addressed")]
    GridTooLarge { columns: usize, rows: usize },
    #[error("reserved block {width}x{height} at row {row}, column {column} does not fit a {columns}x{rows} grid")]
    BlockOutOfBounds {
        row: usize,
        column: usize,
        width: usize,
        height: usize,
        columns: usize,
        rows: usize,
    },
}

/// Contiguous rectangle of cells excluded from item placement (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedBlock {
    pub row: usize,
    pub column: usize,
    pub height: usize,
    pub width: usize,
}

impl ReservedBlock {
    /// A block of `width` columns centered horizontally in `columns`.
    #[must_use]
    pub const fn centered(columns: usize, row: usize, height: usize, width: usize) -> Self {
        Self {
            row,
            column: columns.saturating_sub(width) / 2,
            height,
            width,
        }
    }

    #[must_use]
    pub const fn contains(&self, row: usize, column: usize) -> bool {
        row >= self.row
            && row - self.row < self.height
            && column >= self.column
            && column - self.column < self.width
    }
}

/// A grid cell, addressed both by row-major index and by row/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub index: usize,
    pub row: usize,
    pub column: usize,
}

impl Cell {
    #[must_use]
    pub const fn from_index(index: usize, columns: usize) -> Self {
        Self {
            index,
            row: index / columns,
            column: index % columns,
        }
    }

    /// 1-based row for rendering surfaces.
    #[must_use]
    pub const fn display_row(&self) -> usize {
        self.row + 1
    }

    /// 1-based column for rendering surfaces.
    #[must_use]
    pub const fn display_column(&self) -> usize {
        self.column + 1
    }
}

/// The span of the banner element, 1-based like [`Cell::display_row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerSpan {
    pub row_start: usize,
    pub column_start: usize,
    pub row_span: usize,
    pub column_span: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a, T> {
    pub item: &'a T,
    pub cell: Cell,
}

fn open_cells(columns: usize, rows: usize, reserved: ReservedBlock) -> Vec<usize> {
    (0..columns * rows)
        .filter(|&index| {
            let cell = Cell::from_index(index, columns);
            !reserved.contains(cell.row, cell.column)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlacer {
    columns: usize,
    rows: usize,
    reserved: ReservedBlock,
    open_cells: Vec<usize>,
}

impl LayoutPlacer {
    /// Build a placer; the open-cell table is computed once here.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is empty or the block falls outside it.
    pub fn new(columns: usize, rows: usize, reserved: ReservedBlock) -> Result<Self, LayoutError> {
        if columns == 0 || rows == 0 {
            return Err(LayoutError::EmptyGrid { columns, rows });
        }
        if columns.checked_mul(rows).is_none() {
            return Err(LayoutError::GridTooLarge { columns, rows });
        }
        // Block must start inside the grid and leave room for its full extent.
        if reserved.width == 0
            || reserved.height == 0
            || reserved.column >= columns
            || reserved.row >= rows
            || reserved.width > columns - reserved.column
            || reserved.height > rows - reserved.row
        {
            return Err(LayoutError::BlockOutOfBounds {
                row: reserved.row,
                column: reserved.column,
                width: reserved.width,
                height: reserved.height,
                columns,
                rows,
            });
        }
        Ok(Self {
            columns,
            rows,
            reserved,
            open_cells: open_cells(columns, rows, reserved),
        })
    }

    /// The board used by the presenter: 10×4 with a 4×2 centered banner.
    #[must_use]
    pub fn standard() -> Self {
        let reserved =
            ReservedBlock::centered(GRID_COLUMNS, BANNER_ROW, BANNER_ROWS, BANNER_COLUMNS);
        Self {
            columns: GRID_COLUMNS,
            rows: GRID_ROWS,
            reserved,
            open_cells: open_cells(GRID_COLUMNS, GRID_ROWS, reserved),
        }
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cells available to items.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.open_cells.len()
    }

    /// Row-major indices of the reserved block.
    #[must_use]
    pub fn reserved_indices(&self) -> Vec<usize> {
        (0..self.columns * self.rows)
            .filter(|&index| {
                let cell = Cell::from_index(index, self.columns);
                self.reserved.contains(cell.row, cell.column)
            })
            .collect()
    }

    #[must_use]
    pub const fn banner(&self) -> BannerSpan {
        BannerSpan {
            row_start: self.reserved.row + 1,
            column_start: self.reserved.column + 1,
            row_span: self.reserved.height,
            column_span: self.reserved.width,
        }
    }

    /// Cell for the `position`-th item, `None` past capacity.
    #[must_use]
    pub fn cell_for(&self, position: usize) -> Option<Cell> {
        self.open_cells
            .get(position)
            .map(|&index| Cell::from_index(index, self.columns))
    }

    /// Place `items` in order; items beyond capacity are left out.
    #[must_use]
    pub fn place<'a, T>(&self, items: &'a [T]) -> Vec<Placement<'a, T>> {
        if items.len() > self.capacity() {
            debug!(
                "layout truncated {} item(s) beyond capacity {}",
                items.len() - self.capacity(),
                self.capacity()
            );
        }
        items
            .iter()
            .zip(self.open_cells.iter())
            .map(|(item, &index)| Placement {
                item,
                cell: Cell::from_index(index, self.columns),
            })
            .collect()
    }
}

impl Default for LayoutPlacer {
    fn default() -> Self {
        Self::standard()
    }
}
