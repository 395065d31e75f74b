//! Text commands players type to drive a game.

pub use command::*;

mod command;
