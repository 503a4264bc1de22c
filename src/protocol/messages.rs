// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Commands accepted over the serial link and the reply lines sent back.
//!
//! The link is plain ASCII so it can be driven from a terminal:
//!
//! ```text
//! H        home
//! GA       show 'A'
//! P12      show flap 12
//! S        status
//! ```

use core::fmt;

use crate::control::{Drift, Status};
use crate::error::Error;

// Command letters (case-insensitive on the wire).
pub const CMD_HOME: u8 = b'H';
pub const CMD_GO_TO_CHARACTER: u8 = b'G';
pub const CMD_GO_TO_POSITION: u8 = b'P';
pub const CMD_STATUS: u8 = b'S';

/// Decoded drum command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Home,
    GoToCharacter(u8),
    GoToPosition(i32),
    Status,
    /// Byte that does not start a command.
    Unknown(u8),
}

/// Outcome of one command, rendered as a single reply line by `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Homed(Status),
    Moved(Status, Option<Drift>),
    Status(Status),
    Error(Error),
    Unknown(u8),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Homed(s) => write!(f, "OK HOME {} {}", Pos(s.position), Glyph(s.character)),
            Reply::Moved(s, drift) => {
                write!(f, "OK POS {} {}", Pos(s.position), Glyph(s.character))?;
                if let Some(d) = drift {
                    write!(f, " DRIFT {}", d.believed)?;
                }
                Ok(())
            }
            Reply::Status(s) => write!(
                f,
                "STATUS HOMED={} POS={} CHAR={} SENSOR={}",
                s.homed as u8,
                Pos(s.position),
                Glyph(s.character),
                s.at_home as u8
            ),
            Reply::Error(e) => write!(f, "ERR {e}"),
            Reply::Unknown(b) => write!(f, "ERR unknown command {b:#04x}"),
        }
    }
}

struct Pos(Option<u8>);

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "{p}"),
            None => f.write_str("?"),
        }
    }
}

/// Flap byte: printed as-is when graphic ASCII, hex otherwise.
struct Glyph(Option<u8>);

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) if c.is_ascii_graphic() => write!(f, "{}", c as char),
            Some(c) => write!(f, "{c:#04x}"),
            None => f.write_str("?"),
        }
    }
}
