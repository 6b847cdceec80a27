use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Immutable rendering snapshot handed to the presentation layer. Carries
/// only what the player is entitled to see per cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord2,
    pub total_mines: CellCount,
    pub cells: Array2<CellView>,
}

impl BoardSnapshot {
    pub fn from_session(session: &GameSession) -> Self {
        let size = session.size();
        let mut cells = Array2::from_elem(to_index(size), CellView::Hidden);

        let (rows, cols) = size;
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                cells[to_index(coords)] = session.view_unchecked(coords);
            }
        }

        Self {
            size,
            total_mines: session.total_mines(),
            cells,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let expected = (self.size.0 as usize, self.size.1 as usize);
        if self.cells.dim() != expected {
            return Err(GameError::InvalidBoardShape);
        }

        if self.total_mines >= cell_count(self.size.0, self.size.1) {
            return Err(GameError::TooManyMines);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_maps_revealed_flagged_and_hidden_cells() {
        let layout = MineLayout::from_mine_coords((5, 5), &[(2, 2)]).unwrap();
        let mut session = GameSession::with_layout(layout);
        session.toggle_flag((2, 2)).unwrap();
        session.reveal((0, 0)).unwrap();

        let snapshot = BoardSnapshot::from_session(&session);

        assert_eq!(snapshot.size, (5, 5));
        assert_eq!(snapshot.total_mines, 1);
        assert_eq!(snapshot.cells[to_index((2, 2))], CellView::Flagged);
        assert_eq!(snapshot.cells[to_index((0, 0))], CellView::Open(0));
        assert_eq!(snapshot.cells[to_index((1, 1))], CellView::Open(1));
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn snapshot_shows_mines_after_a_loss() {
        let layout = MineLayout::from_mine_coords((5, 5), &[(2, 2), (4, 4)]).unwrap();
        let mut session = GameSession::with_layout(layout);
        session.reveal((2, 2)).unwrap();

        let snapshot = BoardSnapshot::from_session(&session);

        assert_eq!(snapshot.cells[to_index((2, 2))], CellView::Mine);
        assert_eq!(snapshot.cells[to_index((4, 4))], CellView::Mine);
        assert_eq!(snapshot.cells[to_index((0, 0))], CellView::Hidden);
    }

    #[test]
    fn validate_rejects_shape_and_mine_count_mismatches() {
        let bad_shape = BoardSnapshot {
            size: (5, 5),
            total_mines: 1,
            cells: Array2::from_elem([5, 4], CellView::Hidden),
        };
        assert_eq!(bad_shape.validate(), Err(GameError::InvalidBoardShape));

        let bad_mines = BoardSnapshot {
            size: (5, 5),
            total_mines: 25,
            cells: Array2::from_elem([5, 5], CellView::Hidden),
        };
        assert_eq!(bad_mines.validate(), Err(GameError::TooManyMines));
    }
}
