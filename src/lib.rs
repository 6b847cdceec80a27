#![no_std]

extern crate alloc;

use core::ops::BitOr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use snapshot::*;
pub use types::*;

mod cell;
mod error;
mod generator;
mod session;
mod snapshot;
mod types;

/// Validated board dimensions plus mine count. Construct through `custom` or
/// one of the presets; `new_unchecked` skips clamping for callers that have
/// already validated.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const MIN_SIDE: Coord = 5;
    pub const MAX_SIDE: Coord = 40;

    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    /// Clamps a user-supplied triple into the supported ranges: sides in
    /// `[5, 40]`, mines in `[1, rows * cols - 1]` (at least one safe cell).
    pub fn custom(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        let rows = rows.clamp(Self::MIN_SIDE, Self::MAX_SIDE);
        let cols = cols.clamp(Self::MIN_SIDE, Self::MAX_SIDE);
        let mines = mines.clamp(1, cell_count(rows, cols) - 1);
        Self::new_unchecked(rows, cols, mines)
    }

    pub const fn easy() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn medium() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn hard() -> Self {
        Self::new_unchecked(24, 24, 80)
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_count(self.rows, self.cols)
    }
}

/// Difficulty selection as received from the presentation layer: a preset
/// name or a custom triple (clamped when turned into a config).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Custom {
        rows: Coord,
        cols: Coord,
        mines: CellCount,
    },
}

impl Difficulty {
    pub fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::easy(),
            Self::Medium => GameConfig::medium(),
            Self::Hard => GameConfig::hard(),
            Self::Custom { rows, cols, mines } => GameConfig::custom(rows, cols, mines),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

/// Where the mines are, plus the adjacency counts derived from them once at
/// placement time. Immutable for the lifetime of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mines: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mines: Array2<bool>) -> Self {
        let dim = mines.dim();
        let bounds: Coord2 = (
            dim.0.try_into().expect("board sides fit in a Coord"),
            dim.1.try_into().expect("board sides fit in a Coord"),
        );

        let mut adjacent = Array2::from_elem(dim, 0u8);
        for row in 0..bounds.0 {
            for col in 0..bounds.1 {
                let coords = (row, col);
                if mines[to_index(coords)] {
                    continue;
                }
                let count = neighbors(coords, bounds)
                    .filter(|&pos| mines[to_index(pos)])
                    .count();
                adjacent[to_index(coords)] = count as u8;
            }
        }

        let mine_count = mines.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mines,
            adjacent,
            mine_count,
        }
    }

    /// Deterministic placement from an explicit coordinate list.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(to_index(size));

        for &(row, col) in mine_coords {
            if row >= size.0 || col >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mines[to_index((row, col))] = true;
        }

        Ok(Self::from_mine_mask(mines))
    }

    pub fn game_config(&self) -> GameConfig {
        let (rows, cols) = self.size();
        GameConfig::new_unchecked(rows, cols, self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mines.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.mines[to_index(coords)]
    }

    /// Meaningful only for non-mine cells; mine cells report 0.
    pub fn adjacent_mines(&self, coords: Coord2) -> u8 {
        self.adjacent[to_index(coords)]
    }
}

/// Outcome of a flag toggle, the collaborator's re-render signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Toggled,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Toggled)
    }
}

/// Outcome of a reveal. `Revealed` is the "game continues" case; `Won` and
/// `HitMine` are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Won,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Merges outcomes when one gesture reveals several cells.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_config_clamps_sides_and_mines() {
        let config = GameConfig::custom(3, 200, 0);

        assert_eq!((config.rows, config.cols), (5, 40));
        assert_eq!(config.mines, 1);
        assert_eq!(GameConfig::custom(5, 5, 999).mines, 24);
    }

    #[test]
    fn presets_match_published_difficulty_table() {
        assert_eq!(Difficulty::Easy.config(), GameConfig::new_unchecked(9, 9, 10));
        assert_eq!(
            Difficulty::Medium.config(),
            GameConfig::new_unchecked(16, 16, 40)
        );
        assert_eq!(
            Difficulty::Hard.config(),
            GameConfig::new_unchecked(24, 24, 80)
        );
    }

    #[test]
    fn custom_difficulty_goes_through_clamping() {
        let config = Difficulty::Custom {
            rows: 50,
            cols: 10,
            mines: 1000,
        }
        .config();

        assert_eq!(config, GameConfig::custom(50, 10, 1000));
        assert_eq!(config.mines, 40 * 10 - 1);
    }

    #[test]
    fn layout_rejects_out_of_bounds_mine_coords() {
        let result = MineLayout::from_mine_coords((5, 5), &[(0, 0), (5, 0)]);

        assert_eq!(result, Err(GameError::InvalidCoords));
    }

    #[test]
    fn adjacency_matches_brute_force_recount() {
        let mines = [(0, 0), (0, 1), (2, 2), (4, 0), (4, 4)];
        let layout = MineLayout::from_mine_coords((5, 5), &mines).unwrap();

        assert_eq!(layout.mine_count(), 5);
        for row in 0..5 {
            for col in 0..5 {
                let coords = (row, col);
                if layout.contains_mine(coords) {
                    continue;
                }
                let expected = neighbors(coords, (5, 5))
                    .filter(|&pos| mines.contains(&pos))
                    .count() as u8;
                assert_eq!(layout.adjacent_mines(coords), expected, "at {coords:?}");
            }
        }
    }

    #[test]
    fn adjacency_clips_at_edges_and_corners() {
        let layout = MineLayout::from_mine_coords((5, 5), &[(0, 1), (1, 0), (1, 1)]).unwrap();

        assert_eq!(layout.adjacent_mines((0, 0)), 3);
        assert_eq!(layout.adjacent_mines((4, 4)), 0);
    }

    #[test]
    fn reveal_outcomes_merge_by_severity() {
        use RevealOutcome::*;

        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(Revealed | Won, Won);
        assert_eq!(Won | HitMine, HitMine);
        assert_eq!(NoChange | NoChange, NoChange);
        assert!(!NoChange.has_update());
        assert!(HitMine.has_update());

        let merged = [Revealed, NoChange, Won]
            .into_iter()
            .reduce(BitOr::bitor)
            .unwrap();
        assert_eq!(merged, Won);
    }
}
