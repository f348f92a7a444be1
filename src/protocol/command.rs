//! Textual commands: `newGame:<n>` and `move:<x>,<y>,<z>`.

use std::fmt;
use std::str::FromStr;

use crate::board::Coord;
use crate::error::CommandError;

/// A parsed command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start a new game on a pyramid of this side.
    NewGame(u8),
    /// A move played in the real game.
    Move(Coord),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, arg) = line
            .split_once(':')
            .ok_or_else(|| CommandError::Unknown(line.to_string()))?;

        match name.trim() {
            "newGame" => arg
                .trim()
                .parse::<u8>()
                .map(Command::NewGame)
                .map_err(|_| CommandError::InvalidSize(arg.to_string())),
            "move" => parse_coord(arg)
                .map(Command::Move)
                .ok_or_else(|| CommandError::InvalidMove(arg.to_string())),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

fn parse_coord(arg: &str) -> Option<Coord> {
    let mut parts = arg.split(',').map(|p| p.trim().parse::<u8>());
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Coord::new(x, y, z))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NewGame(size) => write!(f, "newGame:{size}"),
            Command::Move(at) => write!(f, "move:{},{},{}", at.x, at.y, at.z),
        }
    }
}
