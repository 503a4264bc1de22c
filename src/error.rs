// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types reported by the drum controller and its configuration.

use thiserror::Error;

/// Failure of a single controller operation.
///
/// Every variant is local and recoverable: the caller reports it and may retry. Only
/// [`Error::HomingFailed`] changes controller state (back to unknown position).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[error("drum is not homed")]
    NotHomed,

    #[error("position {position} out of range 0..{num_flaps}")]
    PositionOutOfRange { position: i32, num_flaps: u8 },

    #[error("character {0:#04x} not in character set")]
    CharacterNotFound(u8),

    #[error("home sensor not detected within {steps} steps")]
    HomingFailed { steps: u32 },

    #[error("operation aborted")]
    Aborted,
}

/// Rejected drum configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("character set is empty")]
    EmptyCharacterSet,

    #[error("character set has {0} flaps, at most 255 supported")]
    TooManyFlaps(usize),

    #[error("home position {home} outside 0..{num_flaps}")]
    HomeOutOfRange { home: u8, num_flaps: u8 },

    #[error("steps per flap must be non-zero")]
    ZeroStepsPerFlap,

    #[error("{steps_per_flap} steps per flap overflows the homing budget")]
    StepsPerFlapTooLarge { steps_per_flap: u32 },
}
