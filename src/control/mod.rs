// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! ## Modules
//!
//! - [`drum_controller`] - Open-loop flap position tracking with home-sensor re-sync.

pub mod drum_controller;

pub use drum_controller::{Drift, DrumController, MoveReport, Status};
