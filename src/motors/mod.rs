// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuator Abstractions
//!
//! Capabilities the drum controller composes, sitting above the device-level drivers in
//! [`drivers`](crate::drivers).
//!
//! ## Modules
//!
//! - [`sim`] - Physical model of a drum providing a simulated actuator/sensor pair.

pub mod sim;

pub use sim::{SimActuator, SimDrum, SimSensor};

/// Something that rotates the drum in whole motor steps.
///
/// Positive counts advance the character sequence. Calls block until the motion is physically
/// complete; there is no feedback, so a stalled motor goes unnoticed.
pub trait Actuator {
    /// Motor steps needed to bring the next flap to the front.
    fn steps_per_flap(&self) -> u32;

    /// Rotate by `count` steps. Zero is a no-op.
    fn advance(&mut self, count: i32);

    /// De-energize the motor once an operation is finished.
    fn release(&mut self) {}
}

/// The magnetic reference switch.
pub trait HomeSensor {
    /// Whether the drum is currently inside the reference zone.
    fn is_at_home(&self) -> bool;
}
