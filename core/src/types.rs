/// Single coordinate axis used for board height, width, and positions.
///
/// Signed so that stray input (negative rows from a chat message, say) can be handed to the engine verbatim and be
/// absorbed as out-of-bounds instead of failing a conversion first.
pub type Coord = i32;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Converts `coords` into an ndarray index when they fall inside a `size` board.
pub fn to_nd_index(coords: Coord2, size: Coord2) -> Option<[usize; 2]> {
    let (x, y) = coords;
    let (height, width) = size;
    if (0..height).contains(&x) && (0..width).contains(&y) {
        Some([usize::try_from(x).ok()?, usize::try_from(y).ok()?])
    } else {
        None
    }
}

const DISPLACEMENTS: [(Coord, Coord); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterates the in-bounds Moore neighbourhood (up to 8 cells) of a coordinate.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(dx, dy)) = DISPLACEMENTS.get(usize::from(self.index)) {
            self.index += 1;

            let (x, y) = self.center;
            let (Some(next_x), Some(next_y)) = (x.checked_add(dx), y.checked_add(dy)) else {
                continue;
            };

            if to_nd_index((next_x, next_y), self.bounds).is_some() {
                return Some((next_x, next_y));
            }
        }
        None
    }
}

/// Whether `coords` lies in the 3x3 box centred on `center`.
pub const fn within_one(center: Coord2, coords: Coord2) -> bool {
    let dx = center.0 as i64 - coords.0 as i64;
    let dy = center.1 as i64 - coords.1 as i64;
    -1 <= dx && dx <= 1 && -1 <= dy && dy <= 1
}
