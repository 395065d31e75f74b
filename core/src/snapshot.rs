use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a player can see of a board, fit for handing to a frontend. Mine positions are never included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord2,
    pub mines: CellCount,
    pub status: GameStatus,
    pub cells: Array2<Option<u8>>,
    pub flags: Array2<bool>,
}

impl BoardSnapshot {
    pub fn from_board<G: MinefieldGenerator>(board: &Board<G>) -> Self {
        let config = board.config();
        let mut cells = Array2::from_elem(config.nd_size(), None);
        let mut flags = Array2::from_elem(config.nd_size(), false);

        for ((x, y), cell) in cells.indexed_iter_mut() {
            let coords = (x as Coord, y as Coord);
            if let Some(CellView::Revealed(count)) = board.cell_at(coords) {
                *cell = Some(count);
            }
            flags[[x, y]] = board.is_flagged(coords);
        }

        Self {
            size: config.size,
            mines: config.mines,
            status: board.status(),
            cells,
            flags,
        }
    }

    /// Checks a snapshot that came from outside, e.g. deserialized.
    pub fn validate(&self) -> Result<()> {
        let (height, width) = self.size;
        let config = GameConfig::new(height, width, self.mines)?;
        let expected = (config.nd_size()[0], config.nd_size()[1]);
        if self.cells.dim() != expected || self.flags.dim() != expected {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(())
    }
}
