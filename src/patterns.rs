// patterns.rs - Initial generations: named patterns, explicit cells, seeded noise

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::{CellBuffer, CellState, GRID_START};
use crate::partition::Partition;

/// A shape given as `(row, col)` offsets from its top-left corner.
#[derive(Debug)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Block",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Pattern {
        name: "Toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
    },
    Pattern {
        name: "Glider",
        cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top half
            (0, 2), (0, 3), (0, 4), (0, 8), (0, 9), (0, 10),
            (2, 0), (2, 5), (2, 7), (2, 12),
            (3, 0), (3, 5), (3, 7), (3, 12),
            (4, 0), (4, 5), (4, 7), (4, 12),
            (5, 2), (5, 3), (5, 4), (5, 8), (5, 9), (5, 10),
            // Bottom half (mirrored)
            (7, 2), (7, 3), (7, 4), (7, 8), (7, 9), (7, 10),
            (8, 0), (8, 5), (8, 7), (8, 12),
            (9, 0), (9, 5), (9, 7), (9, 12),
            (10, 0), (10, 5), (10, 7), (10, 12),
            (12, 2), (12, 3), (12, 4), (12, 8), (12, 9), (12, 10),
        ],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
    },
];

/// Case-insensitive lookup in [`PATTERNS`].
pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// How the first generation is chosen. Coordinates are global and 0-based.
#[derive(Debug, Clone)]
pub enum Seed {
    /// Each cell alive with probability 1/2; identical for any worker count.
    Random(u64),
    /// A named pattern with its corner at `(row, col)`, wrapping around the torus.
    Pattern { pattern: &'static Pattern, row: usize, col: usize },
    /// Exactly these cells alive.
    Cells(Vec<(usize, usize)>),
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Random(0)
    }
}

fn row_rng(seed: u64, global_row: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ global_row as u64)
}

impl Seed {
    /// Fills the interior of one band. The band covers `partition`'s global
    /// rows of a `total_rows x columns` torus; ghost cells are left dead.
    pub fn apply(&self, buf: &mut CellBuffer, partition: Partition, total_rows: usize) {
        let columns = buf.columns();
        let mut stamp = |row: usize, col: usize| {
            let (row, col) = (row % total_rows, col % columns);
            if partition.global_rows().contains(&row) {
                buf.set(row - partition.row_offset + GRID_START, col + GRID_START, CellState::Alive);
            }
        };

        match self {
            Seed::Random(seed) => {
                for global_row in partition.global_rows() {
                    let mut rng = row_rng(*seed, global_row);
                    for col in 0..columns {
                        if rng.random_bool(0.5) {
                            stamp(global_row, col);
                        }
                    }
                }
            }
            Seed::Pattern { pattern, row, col } => {
                for &(dr, dc) in pattern.cells {
                    stamp(row + dr, col + dc);
                }
            }
            Seed::Cells(cells) => {
                for &(row, col) in cells {
                    stamp(row, col);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::partition;

    fn band_for(seed: &Seed, total_rows: usize, columns: usize, workers: usize, rank: usize) -> Vec<Vec<bool>> {
        let p = partition(total_rows, workers, rank);
        let mut buf = CellBuffer::try_new(p.local_rows, columns, "current grid", rank).unwrap();
        seed.apply(&mut buf, p, total_rows);
        (1..=p.local_rows)
            .map(|r| buf.interior_row(r).iter().map(|c| c.is_alive()).collect())
            .collect()
    }

    #[test]
    fn random_seed_is_independent_of_worker_count() {
        let seed = Seed::Random(42);
        let whole = band_for(&seed, 11, 7, 1, 0);
        let split: Vec<_> = (0..3).flat_map(|rank| band_for(&seed, 11, 7, 3, rank)).collect();
        assert_eq!(whole, split);
        assert_ne!(whole, band_for(&Seed::Random(43), 11, 7, 1, 0));
    }

    #[test]
    fn pattern_wraps_around_torus() {
        let seed = Seed::Pattern { pattern: find("blinker").unwrap(), row: 4, col: 3 };
        let band = band_for(&seed, 5, 4, 1, 0);
        assert_eq!(band[4], vec![true, true, false, true]);
        assert_eq!(band.iter().flatten().filter(|&&c| c).count(), 3);
    }

    #[test]
    fn cells_land_in_owning_band_only() {
        let seed = Seed::Cells(vec![(0, 0), (3, 1)]);
        let top = band_for(&seed, 4, 2, 2, 0);
        let bottom = band_for(&seed, 4, 2, 2, 1);
        assert_eq!(top, vec![vec![true, false], vec![false, false]]);
        assert_eq!(bottom, vec![vec![false, false], vec![false, true]]);
    }

    #[test]
    fn pattern_names_are_unique() {
        let names: std::collections::HashSet<_> = PATTERNS.iter().map(|p| p.name.to_ascii_lowercase()).collect();
        assert_eq!(names.len(), PATTERNS.len());
        assert_eq!(find("GLIDER").unwrap().cells.len(), 5);
        assert!(find("no such thing").is_none());
    }
}
