use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sweepbot_core::{Board, Coord, Coord2, MarkOutcome, MinefieldGenerator, RevealOutcome};
use thiserror::Error;

/// One player move, typed as `<keyword> <row> <col>`.
///
/// Coordinates are passed to the board exactly as typed, so `guess -1 4` is a valid command that the board ignores.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "at", rename_all = "snake_case")]
pub enum Command {
    Guess(Coord2),
    Flag(Coord2),
    Unflag(Coord2),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command `{0}`, expected `guess`, `flag` or `unflag`")]
    UnknownCommand(String),
    #[error("Missing coordinate, expected `<command> x y`")]
    MissingCoordinate,
    #[error("Invalid coordinate `{value}`")]
    InvalidCoordinate {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("Unexpected input after coordinates: `{0}`")]
    TrailingInput(String),
}

/// What applying a command did to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    Reveal(RevealOutcome),
    Mark(MarkOutcome),
}

impl Applied {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Reveal(outcome) => outcome.has_update(),
            Self::Mark(outcome) => outcome.has_update(),
        }
    }
}

impl Command {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Guess(_) => "guess",
            Self::Flag(_) => "flag",
            Self::Unflag(_) => "unflag",
        }
    }

    pub const fn coords(self) -> Coord2 {
        match self {
            Self::Guess(coords) | Self::Flag(coords) | Self::Unflag(coords) => coords,
        }
    }

    pub const fn is_guess(self) -> bool {
        matches!(self, Self::Guess(_))
    }

    pub fn apply<G: MinefieldGenerator>(self, board: &mut Board<G>) -> sweepbot_core::Result<Applied> {
        Ok(match self {
            Self::Guess(coords) => Applied::Reveal(board.reveal(coords)?),
            Self::Flag(coords) => Applied::Mark(board.flag(coords)),
            Self::Unflag(coords) => Applied::Mark(board.unflag(coords)),
        })
    }
}

fn parse_coord(word: Option<&str>) -> Result<Coord, ParseCommandError> {
    let word = word.ok_or(ParseCommandError::MissingCoordinate)?;
    word.parse()
        .map_err(|source| ParseCommandError::InvalidCoordinate {
            value: word.to_owned(),
            source,
        })
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();

        let make: fn(Coord2) -> Self = match words.next() {
            None => return Err(ParseCommandError::Empty),
            Some("guess") => Self::Guess,
            Some("flag") => Self::Flag,
            Some("unflag") => Self::Unflag,
            Some(other) => return Err(ParseCommandError::UnknownCommand(other.to_owned())),
        };

        let x = parse_coord(words.next())?;
        let y = parse_coord(words.next())?;
        if let Some(extra) = words.next() {
            return Err(ParseCommandError::TrailingInput(extra.to_owned()));
        }

        Ok(make((x, y)))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.coords();
        write!(f, "{} {} {}", self.keyword(), x, y)
    }
}
