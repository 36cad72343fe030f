// display.rs - Text rendering of bands and of the gathered grid

use std::fmt::{self, Write};

use crate::grid::{CellBuffer, CellState};

fn digit(cell: CellState) -> char {
    if cell.is_alive() { '1' } else { '0' }
}

fn rule_line(out: &mut String, columns: usize) {
    // two extra dashes cover the "| " separators
    for _ in 0..columns + 4 {
        out.push_str("- ");
    }
    out.push('\n');
}

/// One worker's band including ghosts, with the interior framed.
pub fn render_band(buf: &CellBuffer, step: usize, rank: usize) -> String {
    let (rows, columns) = (buf.local_rows(), buf.columns());
    let mut out = String::new();
    let _ = write!(out, "\nTime Step {step}, Rank {rank}:\n====================\n\n");

    for row in 0..buf.height() {
        if row == 1 {
            rule_line(&mut out, columns);
        }
        for (col, &cell) in buf.row(row).iter().enumerate() {
            if col == 1 {
                out.push_str("| ");
            }
            out.push(digit(cell));
            out.push(' ');
            if col == columns {
                out.push_str("| ");
            }
        }
        out.push('\n');
        if row == rows {
            rule_line(&mut out, columns);
        }
    }
    out
}

/// The interior of the whole torus, gathered from every worker in rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalGrid {
    rows: usize,
    columns: usize,
    cells: Vec<CellState>,
}

impl GlobalGrid {
    pub(crate) fn from_bands<'a>(columns: usize, bands: impl IntoIterator<Item = &'a CellBuffer>) -> Self {
        let mut cells = Vec::new();
        for band in bands {
            for row in 1..=band.local_rows() {
                cells.extend_from_slice(band.interior_row(row));
            }
        }
        let rows = if columns == 0 { 0 } else { cells.len() / columns };
        Self { rows, columns, cells }
    }

    /// Parses rows of `0`/`1` (or `.`/`#`), ignoring whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        let mut rows = 0;
        let mut columns = None;
        let mut cells = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let before = cells.len();
            for ch in line.chars().filter(|c| !c.is_whitespace()) {
                cells.push(match ch {
                    '1' | '#' => CellState::Alive,
                    '0' | '.' => CellState::Dead,
                    _ => return None,
                });
            }
            let width = cells.len() - before;
            if *columns.get_or_insert(width) != width {
                return None;
            }
            rows += 1;
        }
        Some(Self { rows, columns: columns.unwrap_or(0), cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// 0-based global coordinates.
    pub fn get(&self, row: usize, col: usize) -> CellState {
        self.cells[row * self.columns + col]
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    pub fn alive_cells(&self) -> Vec<(usize, usize)> {
        (0..self.rows)
            .flat_map(|r| (0..self.columns).map(move |c| (r, c)))
            .filter(|&(r, c)| self.get(r, c).is_alive())
            .collect()
    }
}

impl fmt::Display for GlobalGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.columns.max(1)) {
            let line: Vec<String> = row.iter().map(|&c| digit(c).to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_layout_frames_interior() {
        let mut buf = CellBuffer::try_new(1, 2, "current grid", 0).unwrap();
        buf.set(1, 2, CellState::Alive);
        let text = render_band(&buf, 3, 1);
        let expected = "\nTime Step 3, Rank 1:\n====================\n\n\
                        0 | 0 0 | 0 \n\
                        - - - - - - \n\
                        0 | 0 1 | 0 \n\
                        - - - - - - \n\
                        0 | 0 0 | 0 \n";
        assert_eq!(text, expected);
    }

    #[test]
    fn parse_and_display_agree() {
        let grid = GlobalGrid::parse("0 1 0\n. # .\n").unwrap();
        assert_eq!((grid.rows(), grid.columns()), (2, 3));
        assert_eq!(grid.alive_cells(), vec![(0, 1), (1, 1)]);
        assert_eq!(grid.to_string(), "0 1 0\n0 1 0\n");
        assert!(GlobalGrid::parse("0 1\n0\n").is_none());
    }

    #[test]
    fn bands_concatenate_in_order() {
        let mut a = CellBuffer::try_new(1, 2, "current grid", 0).unwrap();
        let mut b = CellBuffer::try_new(2, 2, "current grid", 1).unwrap();
        a.set(1, 1, CellState::Alive);
        b.set(2, 2, CellState::Alive);
        let grid = GlobalGrid::from_bands(2, [&a, &b]);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.alive_cells(), vec![(0, 0), (2, 1)]);
    }
}
