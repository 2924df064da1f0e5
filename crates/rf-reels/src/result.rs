//! Result grid extraction and publication

use std::fmt;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

use crate::error::{ReelError, ReelResult};
use crate::reel::{Reel, VISIBLE_ROWS};

/// Visible symbols after a spin, `rows[row][reel]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultGrid {
    rows: Vec<Vec<String>>,
}

impl ResultGrid {
    /// Read the settled reels.
    ///
    /// Every slot contributes to the row its offset floors to; slots outside
    /// the visible rows are buffer slots and are skipped. A reel that is not
    /// on a whole slot position, or a cell nobody landed in, is an error
    /// rather than a silently wrong grid.
    pub fn from_reels(reels: &[Reel], cell: f64) -> ReelResult<Self> {
        let mut cells: Vec<Vec<Option<String>>> = vec![vec![None; reels.len()]; VISIBLE_ROWS];

        for (reel_index, reel) in reels.iter().enumerate() {
            if !reel.is_settled() {
                return Err(ReelError::UnsettledReel {
                    reel: reel_index,
                    position: reel.position,
                });
            }

            for slot in &reel.symbols {
                let row = slot.row(cell);
                if (0..VISIBLE_ROWS as i64).contains(&row) {
                    cells[row as usize][reel_index] = Some(slot.texture.clone());
                }
            }
        }

        let rows = cells
            .into_iter()
            .enumerate()
            .map(|(row, columns)| {
                columns
                    .into_iter()
                    .enumerate()
                    .map(|(reel, cell)| cell.ok_or(ReelError::IncompleteResult { row, reel }))
                    .collect::<ReelResult<Vec<_>>>()
            })
            .collect::<ReelResult<Vec<_>>>()?;

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, reel: usize) -> Option<&str> {
        self.rows.get(row)?.get(reel).map(String::as_str)
    }

    pub fn reel_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

impl fmt::Display for ResultGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row.join(" | "))?;
        }
        Ok(())
    }
}

/// Receives one grid per completed spin
pub trait ResultSink {
    fn publish(&mut self, grid: ResultGrid);
}

impl ResultSink for Sender<ResultGrid> {
    fn publish(&mut self, grid: ResultGrid) {
        if self.send(grid).is_err() {
            log::warn!("Result receiver dropped, grid discarded");
        }
    }
}

impl ResultSink for Vec<ResultGrid> {
    fn publish(&mut self, grid: ResultGrid) {
        self.push(grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::SymbolSlot;

    const CELL: f64 = 100.0;

    fn reel(position: f64, slots: &[(&str, f64)]) -> Reel {
        Reel {
            position,
            previous_position: position,
            blur: 0.0,
            symbols: slots
                .iter()
                .map(|(name, y)| SymbolSlot {
                    texture: name.to_string(),
                    y: *y,
                    scale: 1.0,
                    x: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_extracts_rows_and_skips_buffer() {
        let reels = vec![
            reel(4.0, &[("A", -100.0), ("B", 0.0), ("C", 100.0), ("D", 200.0)]),
            reel(8.0, &[("E", 200.0), ("F", -100.0), ("G", 0.0), ("H", 100.0)]),
        ];
        let grid = ResultGrid::from_reels(&reels, CELL).unwrap();

        assert_eq!(grid.rows().len(), VISIBLE_ROWS);
        assert_eq!(grid.reel_count(), 2);
        assert_eq!(grid.row(0).unwrap(), ["B", "G"]);
        assert_eq!(grid.row(1).unwrap(), ["C", "H"]);
        assert_eq!(grid.row(2).unwrap(), ["D", "E"]);
        assert_eq!(grid.cell(1, 1), Some("H"));
        assert_eq!(grid.cell(3, 0), None);
        assert_eq!(grid.to_string(), "B | G\nC | H\nD | E");
    }

    #[test]
    fn test_unsettled_reel_is_flagged() {
        let reels = vec![reel(3.5, &[("A", -50.0), ("B", 50.0), ("C", 150.0), ("D", 250.0)])];
        assert!(matches!(
            ResultGrid::from_reels(&reels, CELL),
            Err(ReelError::UnsettledReel { reel: 0, .. })
        ));

        let reels = vec![
            reel(4.0, &[("A", -100.0), ("B", 0.0), ("C", 100.0), ("D", 200.0)]),
            reel(4.0 + 1e-7, &[("E", -100.0), ("F", 0.0), ("G", 100.0), ("H", 200.0)]),
        ];
        assert!(matches!(
            ResultGrid::from_reels(&reels, CELL),
            Err(ReelError::UnsettledReel { reel: 1, .. })
        ));
    }

    #[test]
    fn test_missing_cell_is_flagged() {
        let reels = vec![reel(0.0, &[("A", -100.0), ("B", 0.0), ("C", 0.0), ("D", 200.0)])];
        assert!(matches!(
            ResultGrid::from_reels(&reels, CELL),
            Err(ReelError::IncompleteResult { row: 1, reel: 0 })
        ));
    }

    #[test]
    fn test_vec_sink() {
        let reels = vec![reel(0.0, &[("A", -100.0), ("B", 0.0), ("C", 100.0), ("D", 200.0)])];
        let grid = ResultGrid::from_reels(&reels, CELL).unwrap();
        let mut sink: Vec<ResultGrid> = Vec::new();
        sink.publish(grid.clone());
        assert_eq!(sink, vec![grid]);
    }
}
