// grid.rs - Cell buffers with a one-cell ghost border

use std::sync::Arc;

use crate::error::{LifeError, Result};

/// Width of the ghost border on every side.
pub const GHOST: usize = 1;
/// First interior row/column index.
pub const GRID_START: usize = GHOST;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellState {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl CellState {
    pub fn is_alive(self) -> bool {
        self == CellState::Alive
    }
}

impl From<bool> for CellState {
    fn from(alive: bool) -> Self {
        if alive { CellState::Alive } else { CellState::Dead }
    }
}

/// A `(local_rows + 2) x (columns + 2)` arena of cells in row-major order.
///
/// Rows `0` and `local_rows + 1` and columns `0` and `columns + 1` are ghost
/// storage; the interior is `1..=local_rows` x `1..=columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBuffer {
    local_rows: usize,
    columns: usize,
    cells: Vec<CellState>,
}

impl CellBuffer {
    /// Allocates an all-dead buffer. `structure` and `rank` only label the error.
    pub fn try_new(local_rows: usize, columns: usize, structure: &'static str, rank: usize) -> Result<Self> {
        let failed = || LifeError::Allocation {
            structure,
            rank,
            rows: local_rows.saturating_add(2 * GHOST),
            columns: columns.saturating_add(2 * GHOST),
        };
        let len = local_rows
            .checked_add(2 * GHOST)
            .zip(columns.checked_add(2 * GHOST))
            .and_then(|(h, w)| h.checked_mul(w))
            .ok_or_else(failed)?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| failed())?;
        cells.resize(len, CellState::Dead);
        Ok(Self { local_rows, columns, cells })
    }

    pub fn local_rows(&self) -> usize {
        self.local_rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Row length including both ghost columns.
    pub fn width(&self) -> usize {
        self.columns + 2 * GHOST
    }

    /// Number of rows including both ghost rows.
    pub fn height(&self) -> usize {
        self.local_rows + 2 * GHOST
    }

    /// Index of the bottom ghost row.
    pub fn bottom_ghost(&self) -> usize {
        self.local_rows + GHOST
    }

    /// Index of the right ghost column.
    pub fn right_ghost(&self) -> usize {
        self.columns + GHOST
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.height() && col < self.width(), "({row}, {col}) out of bounds");
        row * self.width() + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> CellState {
        self.cells[self.offset(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, state: CellState) {
        let i = self.offset(row, col);
        self.cells[i] = state;
    }

    pub fn row(&self, row: usize) -> &[CellState] {
        let start = self.offset(row, 0);
        &self.cells[start..start + self.width()]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [CellState] {
        let start = self.offset(row, 0);
        let width = self.width();
        &mut self.cells[start..start + width]
    }

    /// Copies a whole row (ghost columns included) over another row.
    pub fn copy_row(&mut self, from: usize, to: usize) {
        let width = self.width();
        let src = self.offset(from, 0);
        let dst = self.offset(to, 0);
        self.cells.copy_within(src..src + width, dst);
    }

    /// The interior cells of one row, without ghost columns.
    pub fn interior_row(&self, row: usize) -> &[CellState] {
        &self.row(row)[GRID_START..=self.columns]
    }

    pub fn alive_count(&self) -> usize {
        (GRID_START..=self.local_rows)
            .map(|row| self.interior_row(row).iter().filter(|c| c.is_alive()).count())
            .sum()
    }
}

/// The `current` and `next` generations of one worker's band.
///
/// `current` sits behind an `Arc` so the step scheduler can hand read-only
/// snapshots to its tasks; it is uniquely owned again once they are joined.
#[derive(Debug)]
pub struct Grid {
    current: Arc<CellBuffer>,
    next: Arc<CellBuffer>,
}

impl Grid {
    pub fn allocate(local_rows: usize, columns: usize, rank: usize) -> Result<Self> {
        let current = CellBuffer::try_new(local_rows, columns, "current grid", rank)?;
        let next = CellBuffer::try_new(local_rows, columns, "next grid", rank)?;
        Ok(Self { current: Arc::new(current), next: Arc::new(next) })
    }

    pub fn current(&self) -> &CellBuffer {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut CellBuffer {
        Arc::make_mut(&mut self.current)
    }

    pub fn snapshot(&self) -> Arc<CellBuffer> {
        Arc::clone(&self.current)
    }

    pub fn next_mut(&mut self) -> &mut CellBuffer {
        Arc::make_mut(&mut self.next)
    }

    pub fn into_current(self) -> CellBuffer {
        Arc::unwrap_or_clone(self.current)
    }

    /// Makes the just-computed generation current; the old one becomes scratch.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_includes_ghost_border() {
        let buf = CellBuffer::try_new(3, 4, "current grid", 0).unwrap();
        assert_eq!((buf.height(), buf.width()), (5, 6));
        assert_eq!((buf.bottom_ghost(), buf.right_ghost()), (4, 5));
        assert_eq!(buf.row(0).len(), 6);
        assert_eq!(buf.interior_row(1).len(), 4);
        assert_eq!(buf.alive_count(), 0);
    }

    #[test]
    fn set_and_get_use_row_major_offsets() {
        let mut buf = CellBuffer::try_new(2, 2, "current grid", 0).unwrap();
        buf.set(1, 2, CellState::Alive);
        assert_eq!(buf.row(1), &[CellState::Dead, CellState::Dead, CellState::Alive, CellState::Dead]);
        assert!(buf.get(1, 2).is_alive());
        assert!(!buf.get(2, 1).is_alive());
        assert_eq!(buf.alive_count(), 1);

        buf.copy_row(1, 3);
        assert!(buf.get(3, 2).is_alive());
        // ghost rows never count as population
        assert_eq!(buf.alive_count(), 1);
    }

    #[test]
    fn oversized_allocation_reports_structure() {
        let err = CellBuffer::try_new(usize::MAX, 8, "next grid", 3).unwrap_err();
        match err {
            LifeError::Allocation { structure, rank, .. } => {
                assert_eq!(structure, "next grid");
                assert_eq!(rank, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn swap_exchanges_generations() {
        let mut grid = Grid::allocate(2, 2, 0).unwrap();
        grid.next_mut().set(1, 1, CellState::Alive);
        assert!(!grid.current().get(1, 1).is_alive());
        grid.swap();
        assert!(grid.current().get(1, 1).is_alive());
    }

    #[test]
    fn current_mut_after_snapshot_does_not_alias() {
        let mut grid = Grid::allocate(1, 1, 0).unwrap();
        let snapshot = grid.snapshot();
        grid.current_mut().set(1, 1, CellState::Alive);
        assert!(!snapshot.get(1, 1).is_alive());
        assert!(grid.current().get(1, 1).is_alive());
    }
}
