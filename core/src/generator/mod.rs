use crate::*;
pub use random::*;

mod random;

/// Source of mine layouts, consulted once per game on the first reveal.
///
/// Implementations must keep every cell of the 3x3 box around `start` free of mines and must place exactly
/// `config.mines` mines, or fail with [`GameError::InsufficientSpace`].
pub trait MinefieldGenerator {
    fn generate(&mut self, config: GameConfig, start: Coord2) -> Result<MineLayout>;
}

/// Every in-bounds cell that may hold a mine when the game opens at `start`.
pub fn candidate_cells(config: GameConfig, start: Coord2) -> impl Iterator<Item = Coord2> {
    let (height, width) = config.size;
    (0..height)
        .flat_map(move |x| (0..width).map(move |y| (x, y)))
        .filter(move |&coords| !within_one(start, coords))
}
