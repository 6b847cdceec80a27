use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of a session. `Ready` and `Active` both accept moves; `Won` and
/// `Lost` are terminal and entered exactly once.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    Ready,
    Active,
    Won,
    Lost,
}

impl GamePhase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Ready
    }
}

/// One game from configuration to win or loss. Owns the board and the mine
/// layout exclusively; the presentation layer reads through `cell_view` and
/// `BoardSnapshot` and never mutates cells directly.
///
/// Mine placement is deferred: `layout` stays `None` until the first reveal,
/// which generates it with the clicked cell excluded so the opening click is
/// always safe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    config: GameConfig,
    seed: u64,
    layout: Option<MineLayout>,
    board: Array2<CellState>,
    /// Revealed safe cells; revealed mines after a loss are not counted.
    revealed_count: CellCount,
    flagged_count: CellCount,
    phase: GamePhase,
    triggered_mine: Option<Coord2>,
}

impl GameSession {
    /// Fresh session with all cells hidden and no mines placed yet.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            layout: None,
            board: Array2::default(to_index(config.size())),
            revealed_count: 0,
            flagged_count: 0,
            phase: Default::default(),
            triggered_mine: None,
        }
    }

    /// Session over a pre-placed layout, bypassing deferred generation. The
    /// opening-click safety guarantee does not apply here.
    pub fn with_layout(layout: MineLayout) -> Self {
        let config = layout.game_config();
        Self {
            layout: Some(layout),
            ..Self::new(config, 0)
        }
    }

    /// Abandons the current game and starts over.
    pub fn reset(&mut self, config: GameConfig, seed: u64) {
        *self = Self::new(config, seed);
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    /// How many mines have not been flagged yet; negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count as isize)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Whether the first reveal has happened and the mines are placed.
    pub fn first_click_consumed(&self) -> bool {
        self.layout.is_some()
    }

    /// The mine that ended the game, after a loss.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.validate_coords(coords)?;
        Ok(self.view_unchecked(coords))
    }

    pub(crate) fn view_unchecked(&self, coords: Coord2) -> CellView {
        match self.board[to_index(coords)] {
            CellState::Hidden => CellView::Hidden,
            CellState::Flagged => CellView::Flagged,
            CellState::Revealed => match &self.layout {
                Some(layout) if layout.contains_mine(coords) => CellView::Mine,
                Some(layout) => CellView::Open(layout.adjacent_mines(coords)),
                // a cell cannot be revealed before the layout exists
                None => CellView::Hidden,
            },
        }
    }

    /// Flagged cells among the up-to-8 neighbors. Pure query for the
    /// presentation layer's over-flag hinting.
    pub fn flag_count_around(&self, coords: Coord2) -> Result<u8> {
        let coords = self.validate_coords(coords)?;
        let count = neighbors(coords, self.size())
            .filter(|&pos| self.board[to_index(pos)] == CellState::Flagged)
            .count();
        Ok(count as u8)
    }

    /// Reveals a hidden cell, flood-filling through zero-adjacency regions.
    /// No-op when the session is over or the cell is not hidden.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.phase.is_terminal() || !self.board[to_index(coords)].is_hidden() {
            return Ok(RevealOutcome::NoChange);
        }

        if self.layout.is_none() {
            log::debug!(
                "first reveal at {:?}, placing {} mines",
                coords,
                self.config.mines
            );
            let layout =
                RandomMinefieldGenerator::new(self.seed, Some(coords)).generate(self.config);
            self.layout = Some(layout);
        }

        Ok(self.reveal_hidden(coords))
    }

    /// Flips a cell between hidden and flagged. No-op on revealed cells and
    /// finished games.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.phase.is_terminal() {
            return Ok(FlagOutcome::NoChange);
        }

        let index = to_index(coords);
        Ok(match self.board[index] {
            CellState::Hidden => {
                self.board[index] = CellState::Flagged;
                self.flagged_count += 1;
                FlagOutcome::Toggled
            }
            CellState::Flagged => {
                self.board[index] = CellState::Hidden;
                self.flagged_count -= 1;
                FlagOutcome::Toggled
            }
            CellState::Revealed => FlagOutcome::NoChange,
        })
    }

    fn reveal_hidden(&mut self, coords: Coord2) -> RevealOutcome {
        let Some(layout) = &self.layout else {
            return RevealOutcome::NoChange;
        };

        if layout.contains_mine(coords) {
            log::debug!("mine hit at {coords:?}");
            self.triggered_mine = Some(coords);
            self.finish(GamePhase::Lost);
            return RevealOutcome::HitMine;
        }

        let bounds = layout.size();
        let safe_cells = layout.safe_cell_count();

        // Work-list flood fill; the hidden-state check on pop is what keeps
        // the traversal from revisiting cells on the cyclic neighbor graph.
        let mut queue = VecDeque::from([coords]);
        while let Some(visit) = queue.pop_front() {
            let index = to_index(visit);
            if !self.board[index].is_hidden() {
                continue;
            }

            self.board[index] = CellState::Revealed;
            self.revealed_count += 1;
            let adjacent = layout.adjacent_mines(visit);
            log::trace!("revealed {visit:?}, adjacent mines: {adjacent}");

            if adjacent == 0 {
                queue.extend(
                    neighbors(visit, bounds)
                        .filter(|&pos| self.board[to_index(pos)].is_hidden()),
                );
            }
        }

        if self.revealed_count == safe_cells {
            self.finish(GamePhase::Won);
            RevealOutcome::Won
        } else {
            self.mark_started();
            RevealOutcome::Revealed
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.phase, GamePhase::Ready) {
            log::debug!("game started");
            self.phase = GamePhase::Active;
        }
    }

    fn finish(&mut self, phase: GamePhase) {
        if self.phase.is_terminal() {
            return;
        }
        log::debug!("game over: {phase:?}");
        self.phase = phase;
        if matches!(phase, GamePhase::Lost) {
            self.reveal_all_mines();
        }
    }

    /// On a loss every mine is shown, flags on mines included; all other
    /// cells keep their state.
    fn reveal_all_mines(&mut self) {
        let Some(layout) = &self.layout else {
            return;
        };

        let (rows, cols) = layout.size();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if !layout.contains_mine(coords) {
                    continue;
                }
                let cell = &mut self.board[to_index(coords)];
                if *cell == CellState::Flagged {
                    self.flagged_count -= 1;
                }
                *cell = CellState::Revealed;
            }
        }
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.config.rows && coords.1 < self.config.cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }
}
