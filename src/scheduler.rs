// scheduler.rs - Fans one generation's rows out over tokio tasks

use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::error::{LifeError, Result};
use crate::grid::{CellBuffer, CellState, GRID_START};
use crate::rules;

/// Row-block coroutine: evolves a run of interior rows from a shared snapshot.
async fn process_rows(rows: RangeInclusive<usize>, current: Arc<CellBuffer>) -> (usize, Vec<CellState>) {
    let first = *rows.start();
    let width = current.width();
    let mut block = vec![CellState::Dead; width * rows.clone().count()];

    for (row, out) in rows.zip(block.chunks_exact_mut(width)) {
        rules::next_row(&current, row, out);
        tokio::task::yield_now().await; // Cooperative yielding between rows
    }
    (first, block) // Return (first row, completed rows)
}

/// Evaluates every interior cell of a band with up to `tasks` concurrent row blocks.
#[derive(Debug, Clone, Copy)]
pub struct StepScheduler {
    tasks: usize,
}

impl StepScheduler {
    pub fn new(tasks: usize) -> Self {
        Self { tasks: tasks.max(1) }
    }

    pub fn tasks(&self) -> usize {
        self.tasks
    }

    /// Writes the next generation of `current`'s interior into `next`.
    ///
    /// Tasks only read the snapshot; `next` is written here, after each task
    /// is joined, so no cell has two writers. Ghost cells of `next` are not
    /// touched. Returns once every interior cell of `next` is written.
    pub async fn compute_next_grid(&self, current: Arc<CellBuffer>, next: &mut CellBuffer, rank: usize) -> Result<()> {
        let local_rows = current.local_rows();
        if local_rows == 0 {
            return Ok(());
        }
        debug_assert_eq!((next.local_rows(), next.columns()), (local_rows, current.columns()));

        let columns = current.columns();
        let width = current.width();
        let block_rows = local_rows.div_ceil(self.tasks);

        let mut handles = Vec::with_capacity(self.tasks);
        for first in (GRID_START..=local_rows).step_by(block_rows) {
            let last = (first + block_rows - 1).min(local_rows);
            handles.push(tokio::spawn(process_rows(first..=last, Arc::clone(&current))));
        }
        drop(current);

        // Wait for all row blocks and copy their interiors into place
        for handle in handles {
            let (first, block) = handle.await.map_err(|e| LifeError::Worker {
                rank,
                reason: format!("row task failed: {e}"),
            })?;
            for (row, cells) in (first..).zip(block.chunks_exact(width)) {
                next.row_mut(row)[GRID_START..=columns].copy_from_slice(&cells[GRID_START..=columns]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::halo::{wrap_columns, wrap_rows};

    fn seeded(rows: usize, cols: usize) -> CellBuffer {
        let mut buf = CellBuffer::try_new(rows, cols, "current grid", 0).unwrap();
        for row in 1..=rows {
            for col in 1..=cols {
                buf.set(row, col, CellState::from((row * 31 + col * 17) % 5 < 2));
            }
        }
        wrap_rows(&mut buf);
        wrap_columns(&mut buf);
        buf
    }

    fn serial_next(current: &CellBuffer) -> CellBuffer {
        let mut next = CellBuffer::try_new(current.local_rows(), current.columns(), "next grid", 0).unwrap();
        for row in 1..=current.local_rows() {
            for col in 1..=current.columns() {
                next.set(row, col, rules::next_state(current, row, col));
            }
        }
        next
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn matches_serial_evaluation_for_any_task_count() {
        let current = Arc::new(seeded(13, 9));
        let expected = serial_next(&current);
        for tasks in [1, 2, 3, 4, 7, 13, 40] {
            let mut next = CellBuffer::try_new(13, 9, "next grid", 0).unwrap();
            StepScheduler::new(tasks)
                .compute_next_grid(Arc::clone(&current), &mut next, 0)
                .await
                .unwrap();
            assert_eq!(next, expected, "tasks = {tasks}");
        }
    }

    #[tokio::test]
    async fn ghost_cells_of_next_are_untouched() {
        let current = Arc::new(seeded(4, 4));
        let mut next = CellBuffer::try_new(4, 4, "next grid", 0).unwrap();
        for row in [0, 5] {
            next.row_mut(row).fill(CellState::Alive);
        }
        StepScheduler::new(2).compute_next_grid(current, &mut next, 0).await.unwrap();
        assert_eq!(next.row(0), &[CellState::Alive; 6]);
        assert_eq!(next.row(5), &[CellState::Alive; 6]);
    }

    #[tokio::test]
    async fn empty_band_is_a_no_op() {
        let current = Arc::new(CellBuffer::try_new(0, 3, "current grid", 0).unwrap());
        let mut next = CellBuffer::try_new(0, 3, "next grid", 0).unwrap();
        StepScheduler::new(4).compute_next_grid(current, &mut next, 0).await.unwrap();
        assert_eq!(next.alive_count(), 0);
    }

    #[test]
    fn task_count_is_at_least_one() {
        assert_eq!(StepScheduler::new(0).tasks(), 1);
    }
}
