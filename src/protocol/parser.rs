// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Byte-at-a-time parser for the ASCII drum protocol.
//!
//! `P` arguments end at the first non-digit byte, which is consumed. Send a newline after a
//! position command before the next command letter.

use crate::protocol::messages::*;

enum State {
    WaitCommand,
    WaitCharacter,
    Number { value: i32, negative: bool, digits: u8 },
}

pub struct Parser {
    state: State,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::WaitCommand,
        }
    }

    /// Process a single incoming byte. Returns `Some(Command)` once a command is complete.
    pub fn push(&mut self, byte: u8) -> Option<Command> {
        match self.state {
            State::WaitCommand => {
                if is_separator(byte) {
                    return None;
                }

                match byte.to_ascii_uppercase() {
                    CMD_HOME => return Some(Command::Home),
                    CMD_STATUS => return Some(Command::Status),
                    CMD_GO_TO_CHARACTER => self.state = State::WaitCharacter,
                    CMD_GO_TO_POSITION => {
                        self.state = State::Number {
                            value: 0,
                            negative: false,
                            digits: 0,
                        }
                    }
                    _ => return Some(Command::Unknown(byte)),
                }
            }
            State::WaitCharacter => {
                // Any byte is a valid flap, including space.
                self.state = State::WaitCommand;
                return Some(Command::GoToCharacter(byte));
            }
            State::Number {
                value,
                negative,
                digits,
            } => match byte {
                b'-' if digits == 0 && !negative => {
                    self.state = State::Number {
                        value,
                        negative: true,
                        digits,
                    };
                }
                b'0'..=b'9' => {
                    let value = value
                        .saturating_mul(10)
                        .saturating_add((byte - b'0') as i32);
                    self.state = State::Number {
                        value,
                        negative,
                        digits: digits.saturating_add(1),
                    };
                }
                _ => {
                    self.state = State::WaitCommand;
                    if digits == 0 {
                        return Some(Command::Unknown(CMD_GO_TO_POSITION));
                    }
                    let value = if negative { -value } else { value };
                    return Some(Command::GoToPosition(value));
                }
            },
        }
        None
    }

    /// Drop any half-received command.
    pub fn reset(&mut self) {
        self.state = State::WaitCommand;
    }
}

fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\r' | b'\n' | b'\t')
}
