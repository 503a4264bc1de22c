// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Split-Flap Drum Firmware
//!
//! This crate drives one split-flap drum: a ring of flaps turned forward by a stepper motor, with
//! a single magnet and hall switch marking the home flap. It homes the drum, moves it to a flap
//! index or character, and re-synchronizes its open-loop position whenever the magnet shows up
//! where it should not. The library is `no_std` and HAL-agnostic; the `firmware` feature builds
//! the STM32F767 binary on top of it.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Character set, flap count and home flap |
//! | [`motors`] | `Actuator` / `HomeSensor` capabilities and the simulated drum |
//! | [`drivers`] | ULN2003, step/dir and hall-switch drivers over `embedded-hal` |
//! | [`control`] | Drum position state machine |
//! | [`protocol`] | ASCII serial commands and replies |
//! | [`hw`] | LEDs, USART and board pin map |
//! | [`error`] | Error types |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features firmware --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod hw;
pub mod motors;
pub mod protocol;

pub use config::{CharacterMap, DrumConfig};
pub use control::{Drift, DrumController, MoveReport, Status};
pub use error::{ConfigError, Error};
pub use motors::{Actuator, HomeSensor};
