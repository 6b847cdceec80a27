use serde::{Deserialize, Serialize};

/// Player-visible state of one cell. Mine identity and adjacency live in
/// `MineLayout`; this only tracks what the player has done to the cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed,
    Flagged,
}

impl CellState {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// What the presentation layer gets to see for one cell. Mine identity and
/// the adjacency count are exposed only once the cell is revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    /// Revealed safe cell carrying its adjacent-mine count.
    Open(u8),
    /// Revealed mine (only reachable after a loss).
    Mine,
}

impl CellView {
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}
