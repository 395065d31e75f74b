use alloc::vec::Vec;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Uniform generation: mines are sampled without replacement from every cell outside the opening 3x3 box.
#[derive(Clone, Debug)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    rng: SmallRng,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(&mut self, config: GameConfig, start: Coord2) -> Result<MineLayout> {
        let candidates: Vec<Coord2> = candidate_cells(config, start).collect();
        let available = CellCount::try_from(candidates.len()).unwrap_or(CellCount::MAX);

        if available < config.mines {
            log::warn!(
                "Cannot keep {:?} clear, requested {} mines but only {} cells are available",
                start,
                config.mines,
                available
            );
            return Err(GameError::InsufficientSpace {
                required: config.mines,
                available,
            });
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.nd_size());
        let picks = rand::seq::index::sample(&mut self.rng, candidates.len(), config.mines as usize);
        for pick in picks {
            if let Some(index) = to_nd_index(candidates[pick], config.size) {
                mine_mask[index] = true;
            }
        }

        let layout = MineLayout::from_mine_mask(config.size, mine_mask);
        log::debug!(
            "Laid {} mines on a {:?} board around {:?} (seed {})",
            layout.mine_count(),
            config.size,
            start,
            self.seed
        );
        Ok(layout)
    }
}
