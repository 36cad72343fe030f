// rules.rs - Conway's transition rule over a bordered buffer

use crate::grid::{CellBuffer, CellState, GRID_START};

/// Alive cells among the 8 neighbours of an interior cell.
pub fn alive_neighbors(grid: &CellBuffer, row: usize, col: usize) -> u8 {
    let neighbors = [
        (row - 1, col - 1), (row - 1, col), (row - 1, col + 1),
        (row, col - 1),                     (row, col + 1),
        (row + 1, col - 1), (row + 1, col), (row + 1, col + 1),
    ];
    neighbors
        .iter()
        .filter(|&&(nr, nc)| grid.get(nr, nc).is_alive())
        .count() as u8
}

pub fn transition(current: CellState, alive_neighbors: u8) -> CellState {
    match (current, alive_neighbors) {
        (CellState::Alive, 2) | (CellState::Alive, 3) => CellState::Alive, // Survival
        (CellState::Dead, 3) => CellState::Alive,                          // Birth
        _ => CellState::Dead,                                              // Death or stays dead
    }
}

/// The four classic rules applied in order; a cell no rule touches keeps its state.
pub fn transition_by_rules(current: CellState, alive_neighbors: u8) -> CellState {
    let mut next = current;
    if alive_neighbors < 2 {
        next = CellState::Dead;
    }
    if current == CellState::Alive && (alive_neighbors == 2 || alive_neighbors == 3) {
        next = CellState::Alive;
    }
    if alive_neighbors > 3 {
        next = CellState::Dead;
    }
    if current == CellState::Dead && alive_neighbors == 3 {
        next = CellState::Alive;
    }
    next
}

/// Next state of the interior cell at `(row, col)`. Ghost cells must be fresh.
pub fn next_state(grid: &CellBuffer, row: usize, col: usize) -> CellState {
    transition(grid.get(row, col), alive_neighbors(grid, row, col))
}

/// Evolves one interior row into `out`, a full-width row. Ghost slots of `out` are left alone.
pub fn next_row(grid: &CellBuffer, row: usize, out: &mut [CellState]) {
    debug_assert_eq!(out.len(), grid.width());
    for col in GRID_START..=grid.columns() {
        out[col] = next_state(grid, row, col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState::{Alive, Dead};

    // (current, alive neighbours, expected next)
    const TRANSITIONS: [(CellState, u8, CellState); 18] = [
        (Dead, 0, Dead), (Dead, 1, Dead), (Dead, 2, Dead), (Dead, 3, Alive), (Dead, 4, Dead),
        (Dead, 5, Dead), (Dead, 6, Dead), (Dead, 7, Dead), (Dead, 8, Dead),
        (Alive, 0, Dead), (Alive, 1, Dead), (Alive, 2, Alive), (Alive, 3, Alive), (Alive, 4, Dead),
        (Alive, 5, Dead), (Alive, 6, Dead), (Alive, 7, Dead), (Alive, 8, Dead),
    ];

    #[test]
    fn transition_table() {
        for (current, count, expected) in TRANSITIONS {
            assert_eq!(transition(current, count), expected, "{current:?} with {count}");
        }
    }

    #[test]
    fn rule_sequence_matches_table() {
        for (current, count, expected) in TRANSITIONS {
            assert_eq!(transition_by_rules(current, count), expected, "{current:?} with {count}");
            assert_eq!(transition_by_rules(current, count), transition(current, count));
        }
    }

    fn buffer_with(rows: usize, cols: usize, alive: &[(usize, usize)]) -> CellBuffer {
        let mut buf = CellBuffer::try_new(rows, cols, "current grid", 0).unwrap();
        for &(r, c) in alive {
            buf.set(r, c, Alive);
        }
        buf
    }

    #[test]
    fn counts_exclude_center_and_include_ghosts() {
        let buf = buffer_with(3, 3, &[(2, 2), (0, 0), (1, 2), (3, 3)]);
        assert_eq!(alive_neighbors(&buf, 2, 2), 2);
        assert_eq!(alive_neighbors(&buf, 1, 1), 3);
        assert_eq!(next_state(&buf, 2, 2), Alive);
        assert_eq!(next_state(&buf, 1, 1), Alive);
        assert_eq!(next_state(&buf, 3, 1), Dead);
    }

    #[test]
    fn next_row_leaves_ghost_slots() {
        let buf = buffer_with(1, 3, &[(1, 1), (1, 2), (1, 3), (0, 2), (2, 2)]);
        let mut out = vec![Alive; buf.width()];
        next_row(&buf, 1, &mut out);
        assert_eq!(out[0], Alive);
        assert_eq!(out[4], Alive);
        // middle cell: 4 neighbours -> dies; ends: 3 neighbours -> survive
        assert_eq!(&out[1..=3], &[Alive, Dead, Alive]);
    }
}
