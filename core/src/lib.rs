#![no_std]

extern crate alloc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod snapshot;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(height, width)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates a board of `height` rows and `width` columns holding `mines` mines.
    ///
    /// At least one cell has to stay free, so `mines` must be below `height * width`.
    pub fn new(height: Coord, width: Coord, mines: CellCount) -> Result<Self> {
        let invalid = GameError::InvalidConfiguration {
            height,
            width,
            mines,
        };

        if height <= 0 || width <= 0 {
            return Err(invalid);
        }

        let total = i64::from(height) * i64::from(width);
        match CellCount::try_from(total) {
            Ok(total) if mines < total => Ok(Self::new_unchecked((height, width), mines)),
            _ => Err(invalid),
        }
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked((9, 9), 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked((16, 16), 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked((16, 30), 99)
    }

    pub const fn height(&self) -> Coord {
        self.size.0
    }

    pub const fn width(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        (self.size.0 as CellCount).saturating_mul(self.size.1 as CellCount)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Whether some opening cell leaves enough room for the mines.
    ///
    /// A corner opening keeps the fewest cells clear, at most 2x2.
    pub const fn has_opening_room(&self) -> bool {
        let rows = if self.size.0 < 2 { self.size.0 } else { 2 };
        let cols = if self.size.1 < 2 { self.size.1 } else { 2 };
        let cleared = (rows as CellCount).saturating_mul(cols as CellCount);
        self.mines <= self.total_cells().saturating_sub(cleared)
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        to_nd_index(coords, self.size).is_some()
    }

    pub(crate) fn nd_size(&self) -> [usize; 2] {
        [
            usize::try_from(self.size.0).unwrap_or_default(),
            usize::try_from(self.size.1).unwrap_or_default(),
        ]
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

/// Where the mines are. Fixed once laid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MineLayoutData")]
pub struct MineLayout {
    size: Coord2,
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

/// Unchecked wire form of [`MineLayout`].
#[derive(Deserialize)]
struct MineLayoutData {
    size: Coord2,
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl TryFrom<MineLayoutData> for MineLayout {
    type Error = GameError;

    fn try_from(data: MineLayoutData) -> Result<Self> {
        let (height, width) = data.size;
        let config = GameConfig::new(height, width, data.mine_count)?;
        let [rows, cols] = config.nd_size();
        if data.mine_mask.dim() != (rows, cols) {
            return Err(GameError::InvalidBoardShape);
        }

        let layout = Self::from_mine_mask(data.size, data.mine_mask);
        if layout.mine_count != data.mine_count {
            return Err(GameError::InvalidLayout {
                expected: data.mine_count,
                actual: layout.mine_count,
            });
        }
        Ok(layout)
    }
}

impl MineLayout {
    pub(crate) fn from_mine_mask(size: Coord2, mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        Self {
            size,
            mine_mask,
            mine_count: CellCount::try_from(mine_count).unwrap_or(CellCount::MAX),
        }
    }

    /// Builds a layout from explicit mine positions, e.g. to replay a finished game.
    ///
    /// Duplicate coordinates count once. The layout must leave at least one cell free.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let (height, width) = size;
        let config = GameConfig::new(height, width, 0)?;
        let mut mine_mask: Array2<bool> = Array2::default(config.nd_size());

        for &coords in mine_coords {
            let index = to_nd_index(coords, size).ok_or(GameError::InvalidCoords)?;
            mine_mask[index] = true;
        }

        let layout = Self::from_mine_mask(size, mine_mask);
        GameConfig::new(height, width, layout.mine_count)?;
        Ok(layout)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size, self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<Tile> {
        let index = to_nd_index(coords, self.size)?;
        Some(if self.mine_mask[index] {
            Tile::Mine
        } else {
            Tile::Empty
        })
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.tile_at(coords) == Some(Tile::Mine)
    }

    /// Mines among the in-bounds Moore neighbours of `coords`.
    pub fn surrounding_mines(&self, coords: Coord2) -> u8 {
        let count = NeighborIter::new(coords, self.size)
            .filter(|&pos| self.contains_mine(pos))
            .count();
        // at most 8 neighbours
        count as u8
    }

    pub fn mine_coords(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((x, y), _)| (x as Coord, y as Coord))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}
