use crate::*;
pub use random::*;

mod random;

/// Strategy for producing a mine layout from a validated config.
pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}
