//! Boolean matrix tracking bulk selection over displayed rows.

use crate::error::CoreError;

/// Largest grid accepted by [`SelectionGrid::build`], counting an empty
/// dimension as one.
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// Rectangular selection state addressed by `(x, y)`.
///
/// `x` is the displayed row, `y` the page or group column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionGrid {
    cells: Vec<Vec<bool>>,
    columns: usize,
}

impl SelectionGrid {
    /// Build an all-`false` grid of `item_count` rows and `page_count` columns.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimension`] when either size is negative and
    /// [`CoreError::GridTooLarge`] when the grid would exceed [`MAX_GRID_CELLS`].
    pub fn build(item_count: i64, page_count: i64) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidDimension {
            rows: item_count,
            columns: page_count,
        };
        let rows = usize::try_from(item_count).map_err(|_| invalid())?;
        let columns = usize::try_from(page_count).map_err(|_| invalid())?;
        let cells = rows.max(1).checked_mul(columns.max(1));
        if cells.is_none_or(|cells| cells > MAX_GRID_CELLS) {
            return Err(CoreError::GridTooLarge {
                rows: item_count,
                columns: page_count,
                max: MAX_GRID_CELLS,
            });
        }
        Ok(Self::with_dimensions(rows, columns))
    }

    /// Build an all-`false` grid from sizes already known to be valid.
    #[must_use]
    pub fn with_dimensions(rows: usize, columns: usize) -> Self {
        Self {
            cells: vec![vec![false; columns]; rows],
            columns,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Set a cell. Coordinates outside the grid are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if let Some(cell) = self.cells.get_mut(x).and_then(|row| row.get_mut(y)) {
            *cell = value;
        }
    }

    /// Read a cell; out-of-range coordinates read as unselected.
    #[must_use]
    pub fn is_selected(&self, x: usize, y: usize) -> bool {
        self.cells
            .get(x)
            .and_then(|row| row.get(y))
            .copied()
            .unwrap_or(false)
    }

    /// A grid of the same dimensions with every cell unselected.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::with_dimensions(self.rows(), self.columns)
    }

    /// Rows with at least one selected cell, ascending.
    #[must_use]
    pub fn selected_rows(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|&cell| cell))
            .map(|(x, _)| x)
            .collect()
    }

    /// Whether any cell is selected.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.cells.iter().flatten().any(|&cell| cell)
    }
}
