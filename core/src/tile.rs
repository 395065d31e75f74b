use serde::{Deserialize, Serialize};

/// What a cell holds underneath.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Empty,
    Mine,
}

impl Default for Tile {
    fn default() -> Self {
        Self::Empty
    }
}

/// Player-visible state of a single cell.
///
/// A revealed cell shows its count even if it also carries a flag; the flag only shows while the cell is covered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
}

impl CellView {
    /// Character used in the text rendering of a board.
    pub const fn symbol(self) -> char {
        match self {
            Self::Hidden => '.',
            Self::Flagged => 'x',
            Self::Revealed(0) => ' ',
            Self::Revealed(count) if count <= 8 => (b'0' + count) as char,
            Self::Revealed(_) => '?',
        }
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
