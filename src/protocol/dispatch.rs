// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Runs decoded commands against a [`DrumController`] and builds the reply.

use crate::control::{DrumController, MoveReport};
use crate::error::Error;
use crate::motors::{Actuator, HomeSensor};
use crate::protocol::messages::{Command, Reply};

/// Execute one command to completion. Failures become [`Reply::Error`]; nothing here is fatal.
pub fn execute<A, S>(drum: &mut DrumController<'_, A, S>, command: Command) -> Reply
where
    A: Actuator,
    S: HomeSensor,
{
    match command {
        Command::Home => match drum.home() {
            Ok(()) => Reply::Homed(drum.status()),
            Err(e) => Reply::Error(e),
        },
        Command::GoToCharacter(c) => {
            let result = drum.go_to_character(c);
            moved(drum, result)
        }
        Command::GoToPosition(p) => {
            let result = drum.go_to_position(p);
            moved(drum, result)
        }
        Command::Status => Reply::Status(drum.status()),
        Command::Unknown(byte) => {
            warn!("unknown command byte {=u8:#x}", byte);
            Reply::Unknown(byte)
        }
    }
}

fn moved<A, S>(drum: &DrumController<'_, A, S>, result: Result<MoveReport, Error>) -> Reply
where
    A: Actuator,
    S: HomeSensor,
{
    match result {
        Ok(report) => Reply::Moved(drum.status(), report.drift),
        Err(e) => Reply::Error(e),
    }
}
