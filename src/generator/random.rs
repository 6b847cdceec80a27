use ndarray::Array2;

use super::*;

/// Uniform placement without replacement, optionally keeping one cell free so
/// the opening click is always safe. Seeded, so a given `(seed, exclude)`
/// pair always yields the same layout.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    exclude: Option<Coord2>,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, exclude: Option<Coord2>) -> Self {
        Self { seed, exclude }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let total = config.total_cells();
        let mine_goal = if config.mines > total {
            log::warn!(
                "requested {} mines but the board only fits {}",
                config.mines,
                total
            );
            total
        } else {
            config.mines
        };

        let exclude = match self.exclude {
            Some((row, col)) if row >= config.rows || col >= config.cols => {
                log::warn!("excluded cell ({row}, {col}) is outside the board, ignoring");
                None
            }
            Some(coords) if mine_goal >= total => {
                log::warn!("no room to keep {coords:?} free, ignoring exclusion");
                None
            }
            other => other,
        };
        let excluded_index =
            exclude.map(|(row, col)| row as usize * config.cols as usize + col as usize);

        let mut mines: Array2<bool> = Array2::default(to_index(config.size()));
        let mut free = total - CellCount::from(exclude.is_some());
        let mut placed: CellCount = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        {
            let cells = mines.as_slice_mut().expect("fresh arrays use the standard layout");
            while placed < mine_goal && free > 0 {
                // pick the rank-th free cell, skipping mines and the exclusion
                let mut rank = rng.random_range(0..free);
                for (i, cell) in cells.iter_mut().enumerate() {
                    if *cell || Some(i) == excluded_index {
                        continue;
                    }
                    if rank == 0 {
                        *cell = true;
                        placed += 1;
                        free -= 1;
                        break;
                    }
                    rank -= 1;
                }
            }
        }

        if placed != config.mines {
            log::warn!(
                "placed {} mines instead of the requested {}",
                placed,
                config.mines
            );
        }
        MineLayout::from_mine_mask(mines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exactly_the_requested_mine_count() {
        for seed in 0..16 {
            let layout =
                RandomMinefieldGenerator::new(seed, None).generate(GameConfig::easy());

            assert_eq!(layout.mine_count(), 10);
            assert_eq!(layout.size(), (9, 9));
        }
    }

    #[test]
    fn excluded_cell_is_never_a_mine() {
        let config = GameConfig::custom(5, 5, 24);

        for seed in 0..32 {
            let layout =
                RandomMinefieldGenerator::new(seed, Some((2, 3))).generate(config);

            assert_eq!(layout.mine_count(), 24);
            assert!(!layout.contains_mine((2, 3)), "seed {seed}");
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_layout() {
        let config = GameConfig::medium();
        let a = RandomMinefieldGenerator::new(7, Some((0, 0))).generate(config);
        let b = RandomMinefieldGenerator::new(7, Some((0, 0))).generate(config);

        assert_eq!(a, b);
    }

    #[test]
    fn out_of_bounds_exclusion_is_ignored() {
        let layout =
            RandomMinefieldGenerator::new(3, Some((40, 40))).generate(GameConfig::easy());

        assert_eq!(layout.mine_count(), 10);
    }
}
