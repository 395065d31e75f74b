use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use ndarray::Array2;

use crate::*;

/// Mine state of a board: nothing is laid until the first reveal picks the opening cell.
#[derive(Clone, Debug)]
pub enum Minefield<G> {
    Unseeded(G),
    Seeded(MineLayout),
}

impl<G> Minefield<G> {
    pub const fn is_seeded(&self) -> bool {
        matches!(self, Self::Seeded(_))
    }

    pub const fn layout(&self) -> Option<&MineLayout> {
        match self {
            Self::Unseeded(_) => None,
            Self::Seeded(layout) => Some(layout),
        }
    }
}

/// A single game of Minesweeper.
///
/// Revealed and flagged cells are tracked independently: flags are markers for the player only, they never stop a
/// reveal and are never required to win. The game is won once the covered cells are exactly the mines and lost as
/// soon as a mine is revealed. Afterwards every move is ignored.
///
/// Moves on coordinates outside the board are silently ignored as well.
#[derive(Clone, Debug)]
pub struct Board<G = RandomMinefieldGenerator> {
    config: GameConfig,
    minefield: Minefield<G>,
    revealed: Array2<bool>,
    flags: Array2<bool>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Unseeded board that lays its mines with a [`RandomMinefieldGenerator`] seeded by `seed`.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_generator(config, RandomMinefieldGenerator::new(seed))
    }

    /// Board with mines already laid, the first reveal is an ordinary one.
    pub fn from_layout(layout: MineLayout) -> Self {
        let config = layout.game_config();
        let mut board = Self::with_generator(config, RandomMinefieldGenerator::new(0));
        board.minefield = Minefield::Seeded(layout);
        board
    }
}

impl<G: MinefieldGenerator> Board<G> {
    pub fn with_generator(config: GameConfig, generator: G) -> Self {
        let size = config.nd_size();
        Self {
            config,
            minefield: Minefield::Unseeded(generator),
            revealed: Array2::default(size),
            flags: Array2::default(size),
            revealed_count: 0,
            flagged_count: 0,
            triggered_mine: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn minefield(&self) -> &Minefield<G> {
        &self.minefield
    }

    pub fn is_seeded(&self) -> bool {
        self.minefield.is_seeded()
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        self.config.in_bounds(coords)
    }

    pub fn status(&self) -> GameStatus {
        if self.triggered_mine.is_some() {
            GameStatus::Lost
        } else if self.config.total_cells() - self.revealed_count == self.config.mines {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status().is_finished()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines minus flags, negative when the player over-flags.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.config.mines) - i64::from(self.flagged_count)
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.index(coords).is_some_and(|index| self.revealed[index])
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.index(coords).is_some_and(|index| self.flags[index])
    }

    /// Always `false` before the mines are laid.
    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.minefield
            .layout()
            .is_some_and(|layout| layout.contains_mine(coords))
    }

    pub fn surrounding_mines(&self, coords: Coord2) -> u8 {
        self.minefield
            .layout()
            .map_or(0, |layout| layout.surrounding_mines(coords))
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<CellView> {
        let index = self.index(coords)?;
        Some(if self.revealed[index] {
            CellView::Revealed(self.surrounding_mines(coords))
        } else if self.flags[index] {
            CellView::Flagged
        } else {
            CellView::Hidden
        })
    }

    /// Marks a covered cell. Flagging an already flagged cell changes nothing.
    pub fn flag(&mut self, coords: Coord2) -> MarkOutcome {
        self.set_flag(coords, true)
    }

    pub fn unflag(&mut self, coords: Coord2) -> MarkOutcome {
        self.set_flag(coords, false)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        let flagged = self.is_flagged(coords);
        self.set_flag(coords, !flagged)
    }

    fn set_flag(&mut self, coords: Coord2, flagged: bool) -> MarkOutcome {
        let Some(index) = self.index(coords) else {
            return MarkOutcome::NoChange;
        };
        if self.is_finished() || self.flags[index] == flagged {
            return MarkOutcome::NoChange;
        }

        self.flags[index] = flagged;
        if flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        MarkOutcome::Changed
    }

    /// Uncovers `coords`, laying the mines first if this is the opening move.
    ///
    /// Errors only come from the opening move: [`GameError::InsufficientSpace`], or a generator whose layout does
    /// not fit the board. The board is then left untouched and still unseeded.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let Some(index) = self.index(coords) else {
            return Ok(RevealOutcome::NoChange);
        };
        if self.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }

        self.lay_mines(coords)?;
        let Minefield::Seeded(layout) = &self.minefield else {
            return Ok(RevealOutcome::NoChange);
        };

        if layout.contains_mine(coords) {
            self.triggered_mine = Some(coords);
            log::debug!("Mine hit at {:?}, game lost", coords);
            return Ok(RevealOutcome::HitMine);
        }

        if self.revealed[index] {
            return Ok(RevealOutcome::NoChange);
        }

        let opened = self.flood_reveal(coords);
        log::trace!("Revealing {:?} opened {} cells", coords, opened);

        if self.status() == GameStatus::Won {
            log::debug!("All safe cells revealed, game won");
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Reveals `start` and, through cells without neighbouring mines, everything connected to it.
    ///
    /// Each cell enters the revealed set at most once, so the result does not depend on visiting order.
    fn flood_reveal(&mut self, start: Coord2) -> CellCount {
        let Minefield::Seeded(layout) = &self.minefield else {
            return 0;
        };
        let size = self.config.size;

        let mut opened = 0;
        let mut to_visit = vec![start];
        while let Some(coords) = to_visit.pop() {
            let Some(index) = to_nd_index(coords, size) else {
                continue;
            };
            if self.revealed[index] || layout.contains_mine(coords) {
                continue;
            }

            self.revealed[index] = true;
            self.revealed_count += 1;
            opened += 1;

            if layout.surrounding_mines(coords) == 0 {
                to_visit.extend(NeighborIter::new(coords, size).filter(|&pos| {
                    to_nd_index(pos, size).is_some_and(|index| !self.revealed[index])
                }));
            }
        }
        opened
    }

    fn lay_mines(&mut self, start: Coord2) -> Result<()> {
        if let Minefield::Unseeded(generator) = &mut self.minefield {
            let layout = generator.generate(self.config, start)?;
            if layout.size() != self.config.size {
                log::warn!(
                    "Generator laid a {:?} board, expected {:?}",
                    layout.size(),
                    self.config.size
                );
                return Err(GameError::InvalidBoardShape);
            }
            if layout.mine_count() != self.config.mines {
                log::warn!(
                    "Generator laid {} mines, expected {}",
                    layout.mine_count(),
                    self.config.mines
                );
                return Err(GameError::InvalidLayout {
                    expected: self.config.mines,
                    actual: layout.mine_count(),
                });
            }
            self.minefield = Minefield::Seeded(layout);
        }
        Ok(())
    }

    /// One string per row, top to bottom, one character per column.
    pub fn render(&self) -> Vec<String> {
        let (height, width) = self.config.size;
        (0..height)
            .map(|x| {
                (0..width)
                    .map(|y| self.cell_at((x, y)).unwrap_or_default().symbol())
                    .collect()
            })
            .collect()
    }

    fn index(&self, coords: Coord2) -> Option<[usize; 2]> {
        to_nd_index(coords, self.config.size)
    }
}

impl<G: MinefieldGenerator> fmt::Display for Board<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.render().iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn layout(size: Coord2, mines: &[Coord2]) -> MineLayout {
        MineLayout::from_mine_coords(size, mines).unwrap()
    }

    fn revealed_cells<G: MinefieldGenerator>(board: &Board<G>) -> Vec<Coord2> {
        let (height, width) = board.size();
        (0..height)
            .flat_map(|x| (0..width).map(move |y| (x, y)))
            .filter(|&coords| board.is_revealed(coords))
            .collect()
    }

    /// Hands out a fixed layout regardless of where the game opens.
    struct Preset(Option<MineLayout>);

    impl MinefieldGenerator for Preset {
        fn generate(&mut self, _config: GameConfig, _start: Coord2) -> Result<MineLayout> {
            Ok(self.0.take().unwrap())
        }
    }

    #[test]
    fn first_reveal_lays_mines_outside_opening_box() {
        for seed in 0..100 {
            let mut board = Board::new(GameConfig::new(9, 9, 10).unwrap(), seed);
            assert!(!board.is_seeded());

            board.reveal((4, 4)).unwrap();

            assert!(board.is_seeded());
            assert_eq!(board.status(), GameStatus::InProgress);
            for x in 3..=5 {
                for y in 3..=5 {
                    assert!(!board.has_mine_at((x, y)));
                }
            }
            assert!(board.is_revealed((4, 4)));
            assert_eq!(board.surrounding_mines((4, 4)), 0);
        }
    }

    #[test]
    fn first_reveal_without_room_is_reported_and_board_stays_unseeded() {
        let mut board = Board::new(GameConfig::new(3, 3, 1).unwrap(), 0);

        let result = board.reveal((1, 1));

        assert_eq!(
            result,
            Err(GameError::InsufficientSpace {
                required: 1,
                available: 0
            })
        );
        assert!(!board.is_seeded());
        assert_eq!(board.revealed_count(), 0);
        assert_eq!(board.status(), GameStatus::InProgress);

        // a corner leaves five cells to choose from
        assert!(board.reveal((0, 0)).is_ok());
        assert!(board.is_seeded());
    }

    #[test]
    fn zero_mines_first_reveal_wins() {
        let mut board = Board::new(GameConfig::new(4, 5, 0).unwrap(), 11);

        assert_eq!(board.reveal((3, 4)).unwrap(), RevealOutcome::Won);
        assert_eq!(board.revealed_count(), 20);
        assert_eq!(board.status(), GameStatus::Won);
    }

    #[test]
    fn out_of_bounds_moves_are_ignored() {
        let mut board = Board::new(GameConfig::beginner(), 5);

        assert_eq!(board.reveal((-1, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.reveal((0, 9)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.flag((9, 9)), MarkOutcome::NoChange);
        assert!(!board.is_seeded());
        assert_eq!(board.cell_at((9, 0)), None);
    }

    #[test]
    fn reveal_hits_mine_and_sets_triggered_cell() {
        let mut board = Board::from_layout(layout((2, 2), &[(0, 0)]));

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(board.status(), GameStatus::Lost);
        assert_eq!(board.triggered_mine(), Some((0, 0)));
        assert_eq!(board.revealed_count(), 0);
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region() {
        let mut board = Board::from_layout(layout((3, 3), &[(2, 2)]));

        let outcome = board.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(board.cell_at((0, 0)), Some(CellView::Revealed(0)));
        assert_eq!(board.cell_at((1, 1)), Some(CellView::Revealed(1)));
        assert_eq!(board.cell_at((2, 2)), Some(CellView::Hidden));
    }

    #[test]
    fn flood_fill_stops_at_numbered_cells() {
        // column 2 is a wall of mines
        let mines = [(0, 2), (1, 2), (2, 2), (3, 2)];
        let mut board = Board::from_layout(layout((4, 5), &mines));

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);

        assert_eq!(board.revealed_count(), 8);
        assert!(!board.is_revealed((0, 3)));
        assert_eq!(board.render(), [" 2...", " 3...", " 3...", " 2..."]);
    }

    #[test]
    fn flood_fill_is_independent_of_start_cell() {
        let mines = [(0, 6), (3, 3), (6, 0), (6, 6)];
        let starts = [(0, 0), (1, 1), (0, 3), (2, 0)];

        let expected = {
            let mut board = Board::from_layout(layout((7, 7), &mines));
            board.reveal(starts[0]).unwrap();
            revealed_cells(&board)
        };

        for start in starts {
            let mut board = Board::from_layout(layout((7, 7), &mines));
            board.reveal(start).unwrap();
            assert_eq!(revealed_cells(&board), expected, "start {start:?}");
            assert_eq!(board.revealed_count() as usize, expected.len());
        }
    }

    #[test]
    fn revealing_twice_changes_nothing() {
        let mut board = Board::from_layout(layout((3, 3), &[(0, 0)]));

        assert_eq!(board.reveal((2, 2)).unwrap(), RevealOutcome::Won);
        let mut board = Board::from_layout(layout((3, 3), &[(0, 0), (2, 2)]));
        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn flag_is_idempotent_and_unflag_removes() {
        let mut board = Board::new(GameConfig::beginner(), 2);

        assert_eq!(board.flag((2, 2)), MarkOutcome::Changed);
        assert_eq!(board.flag((2, 2)), MarkOutcome::NoChange);
        assert_eq!(board.flagged_count(), 1);
        assert_eq!(board.mines_left(), 9);

        assert_eq!(board.unflag((2, 2)), MarkOutcome::Changed);
        assert_eq!(board.unflag((2, 2)), MarkOutcome::NoChange);
        assert_eq!(board.flagged_count(), 0);

        assert_eq!(board.toggle_flag((0, 1)), MarkOutcome::Changed);
        assert!(board.is_flagged((0, 1)));
        assert_eq!(board.toggle_flag((0, 1)), MarkOutcome::Changed);
        assert!(!board.is_flagged((0, 1)));
    }

    #[test]
    fn flags_do_not_protect_from_mines() {
        let mut board = Board::from_layout(layout((2, 2), &[(1, 1)]));

        board.flag((1, 1));
        assert_eq!(board.reveal((1, 1)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(board.status(), GameStatus::Lost);
    }

    #[test]
    fn flagged_safe_cells_are_still_revealed() {
        let mut board = Board::from_layout(layout((1, 5), &[(0, 3)]));

        board.flag((0, 1));
        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);
        assert!(board.is_revealed((0, 1)));
        assert!(board.is_flagged((0, 1)));
        assert_eq!(board.render(), ["  1.."]);
    }

    #[test]
    fn flagging_every_mine_and_uncovering_the_rest_wins() {
        let mines = [(0, 0), (2, 3)];
        let mut board = Board::from_layout(layout((3, 4), &mines));

        for mine in mines {
            board.flag(mine);
        }
        let (height, width) = board.size();
        for x in 0..height {
            for y in 0..width {
                if !mines.contains(&(x, y)) {
                    board.reveal((x, y)).unwrap();
                }
            }
        }

        assert_eq!(board.status(), GameStatus::Won);
        assert_eq!(board.triggered_mine(), None);
    }

    #[test]
    fn win_does_not_need_flags() {
        let mut board = Board::from_layout(layout((2, 1), &[(0, 0)]));

        assert_eq!(board.reveal((1, 0)).unwrap(), RevealOutcome::Won);
        assert_eq!(board.flagged_count(), 0);
        assert!(board.is_finished());
    }

    #[test]
    fn moves_after_the_end_are_ignored() {
        let mut board = Board::from_layout(layout((3, 3), &[(0, 0), (2, 2)]));
        board.reveal((1, 1)).unwrap();
        board.flag((0, 1));
        assert_eq!(board.reveal((2, 2)).unwrap(), RevealOutcome::HitMine);

        let before = board.render();
        assert_eq!(board.reveal((0, 2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.flag((1, 0)), MarkOutcome::NoChange);
        assert_eq!(board.unflag((0, 1)), MarkOutcome::NoChange);
        assert_eq!(board.toggle_flag((0, 1)), MarkOutcome::NoChange);

        assert_eq!(board.render(), before);
        assert_eq!(board.revealed_count(), 1);
        assert_eq!(board.flagged_count(), 1);
        assert_eq!(board.status(), GameStatus::Lost);
        assert_eq!(board.triggered_mine(), Some((2, 2)));
    }

    #[test]
    fn moves_after_a_win_are_ignored() {
        let mut board = Board::from_layout(layout((1, 3), &[(0, 0)]));
        assert_eq!(board.reveal((0, 2)).unwrap(), RevealOutcome::Won);

        let before = board.render();
        assert_eq!(before, [".1 "]);
        assert_eq!(board.reveal((0, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.flag((0, 0)), MarkOutcome::NoChange);
        assert_eq!(board.unflag((0, 0)), MarkOutcome::NoChange);
        assert_eq!(board.toggle_flag((0, 0)), MarkOutcome::NoChange);

        assert_eq!(board.render(), before);
        assert_eq!(board.flagged_count(), 0);
        assert_eq!(board.status(), GameStatus::Won);
        assert_eq!(board.triggered_mine(), None);
    }

    #[test]
    fn in_bounds_follows_board_size() {
        let board = Board::new(GameConfig::new(2, 3, 1).unwrap(), 0);

        assert!(board.in_bounds((0, 0)));
        assert!(board.in_bounds((1, 2)));
        assert!(!board.in_bounds((2, 0)));
        assert!(!board.in_bounds((0, 3)));
        assert!(!board.in_bounds((-1, 1)));
    }

    #[test]
    fn render_has_board_shape_and_known_symbols() {
        for seed in 0..20 {
            let mut board = Board::new(GameConfig::new(6, 11, 12).unwrap(), seed);
            board.flag((5, 10));
            board.reveal((0, 0)).unwrap();
            board.reveal((3, 7)).unwrap();

            let rows = board.render();
            assert_eq!(rows.len(), 6);
            for row in &rows {
                assert_eq!(row.chars().count(), 11);
                assert!(row.chars().all(|c| matches!(c, ' ' | '1'..='8' | 'x' | '.')));
            }
        }
    }

    #[test]
    fn render_never_shows_mines() {
        let mut board = Board::from_layout(layout((2, 3), &[(0, 2)]));
        board.reveal((1, 0)).unwrap();
        board.reveal((0, 2)).unwrap();

        assert_eq!(board.to_string(), " 1.\n 1.");
    }

    #[test]
    fn custom_generator_decides_the_layout() {
        let preset = layout((1, 5), &[(0, 4)]);
        let mut board = Board::with_generator(preset.game_config(), Preset(Some(preset)));

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::Won);
        assert_eq!(board.render(), ["   1."]);
        assert!(board.minefield().layout().is_some());
    }

    #[test]
    fn generator_with_wrong_mine_count_is_rejected() {
        let config = GameConfig::new(1, 5, 2).unwrap();
        let mut board = Board::with_generator(config, Preset(Some(layout((1, 5), &[(0, 4)]))));

        assert_eq!(
            board.reveal((0, 0)),
            Err(GameError::InvalidLayout {
                expected: 2,
                actual: 1
            })
        );
        assert!(!board.is_seeded());
        assert_eq!(board.revealed_count(), 0);
    }

    #[test]
    fn generator_with_wrong_size_is_rejected() {
        let config = GameConfig::new(1, 5, 1).unwrap();
        let mut board = Board::with_generator(config, Preset(Some(layout((5, 1), &[(4, 0)]))));

        assert_eq!(board.reveal((0, 0)), Err(GameError::InvalidBoardShape));
        assert!(!board.is_seeded());
        assert_eq!(board.render(), ["....."]);
    }
}
