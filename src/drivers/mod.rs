// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw GPIO/delay layer and
//! implement the [`Actuator`](crate::motors::Actuator) and
//! [`HomeSensor`](crate::motors::HomeSensor) capabilities. All of them are generic over the
//! `embedded-hal` digital and delay traits, so they run on any HAL and on the host in tests.
//!
//! ## Existing drivers
//!
//! - [`uln2003`] – 28BYJ-48 unipolar stepper on a ULN2003 array, 8-state half-step sequence
//! - [`step_dir`] – STEP/DIR/ENABLE driver boards (A4988, DRV8825, ...)
//! - [`hall_switch`] – digital hall-effect switch used as the home sensor

pub mod hall_switch;
pub mod step_dir;
pub mod uln2003;

#[cfg(test)]
pub(crate) mod test_support;

pub use hall_switch::HallSwitch;
pub use step_dir::{StepDir, StepDirConfig};
pub use uln2003::{Uln2003, Uln2003Config};
