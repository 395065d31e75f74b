use sweepbot_core::{Board, GameStatus, MinefieldGenerator, RandomMinefieldGenerator};
use sweepbot_protocol::{Applied, Command};

pub(crate) const OPENING_PROMPT: &str = "Type `guess x y` to guess a tile.";
pub(crate) const TURN_PROMPT: &str = "You can also flag mines by doing `flag x y`.";
pub(crate) const LOST_MESSAGE: &str = "Unfortunately, you lost the game!";
pub(crate) const WON_MESSAGE: &str = "Congratulations, you uncovered all the mines!";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Reply {
    /// The game opens with a guess, anything else is turned away until then.
    NeedsGuess,
    Applied(Applied),
}

/// One player's game, fed one command at a time.
#[derive(Debug)]
pub(crate) struct GameSession<G = RandomMinefieldGenerator> {
    board: Board<G>,
    move_count: u32,
}

impl<G: MinefieldGenerator> GameSession<G> {
    pub fn new(board: Board<G>) -> Self {
        Self {
            board,
            move_count: 0,
        }
    }

    pub fn board(&self) -> &Board<G> {
        &self.board
    }

    /// Commands that changed the board.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn handle(&mut self, command: Command) -> sweepbot_core::Result<Reply> {
        if !self.board.is_seeded() && !command.is_guess() {
            return Ok(Reply::NeedsGuess);
        }

        if !self.board.in_bounds(command.coords()) {
            log::debug!("{} is off the board", command);
        }

        let applied = command.apply(&mut self.board)?;
        if applied.has_update() {
            self.move_count += 1;
        }
        log::debug!("{} -> {:?} (move {})", command, applied, self.move_count);
        Ok(Reply::Applied(applied))
    }

    pub fn prompt(&self) -> &'static str {
        if self.board.is_seeded() {
            TURN_PROMPT
        } else {
            OPENING_PROMPT
        }
    }

    pub fn final_message(&self) -> Option<&'static str> {
        match self.board.status() {
            GameStatus::InProgress => None,
            GameStatus::Won => Some(WON_MESSAGE),
            GameStatus::Lost => Some(LOST_MESSAGE),
        }
    }

    /// `header`, a blank line, then the board.
    pub fn message(&self, header: &str) -> String {
        format!("{header}\n\n{}", self.board)
    }
}
