// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Four-phase unipolar stepper (28BYJ-48 class) behind a ULN2003 Darlington array.
//!
//! Each coil is one GPIO output. The motor is half-stepped through the 8-state sequence
//! `A, AB, B, BC, C, CD, D, DA`; one state change is one step. The current index in the sequence
//! is kept between calls so consecutive moves continue the same electrical phase instead of
//! jumping back to state 0.
//!
//! Wiring:
//! - IN1: Coil A (blue)
//! - IN2: Coil B (pink)
//! - IN3: Coil C (yellow)
//! - IN4: Coil D (orange)

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::OutputPin;

use crate::config::{DEFAULT_STEPS_PER_FLAP, DEFAULT_STEP_DELAY_US};
use crate::motors::Actuator;

/// Coil states, one row per half step, columns `[A, B, C, D]`.
pub const HALF_STEP_SEQUENCE: [[bool; 4]; 8] = [
    [true, false, false, false],
    [true, true, false, false],
    [false, true, false, false],
    [false, true, true, false],
    [false, false, true, false],
    [false, false, true, true],
    [false, false, false, true],
    [true, false, false, true],
];

/// Timing and calibration for a [`Uln2003`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Uln2003Config {
    pub steps_per_flap: u32,
    /// Dwell after each coil change.
    pub step_delay_us: u32,
}

impl Default for Uln2003Config {
    fn default() -> Self {
        Self {
            steps_per_flap: DEFAULT_STEPS_PER_FLAP,
            step_delay_us: DEFAULT_STEP_DELAY_US,
        }
    }
}

impl Uln2003Config {
    pub fn with_steps_per_flap(mut self, steps: u32) -> Self {
        self.steps_per_flap = steps;
        self
    }

    pub fn with_step_delay_us(mut self, us: u32) -> Self {
        self.step_delay_us = us;
        self
    }
}

/// ULN2003 coil driver.
pub struct Uln2003<A, B, C, D, DELAY> {
    coils: (A, B, C, D),
    delay: DELAY,
    config: Uln2003Config,
    /// Index into [`HALF_STEP_SEQUENCE`] of the last applied state.
    phase: usize,
}

impl<A, B, C, D, DELAY> Uln2003<A, B, C, D, DELAY>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
    DELAY: DelayUs<u32>,
{
    /// Take ownership of the coil pins and de-energize them.
    pub fn new(a: A, b: B, c: C, d: D, delay: DELAY, config: Uln2003Config) -> Self {
        let mut driver = Self {
            coils: (a, b, c, d),
            delay,
            config,
            phase: 0,
        };
        driver.coils_off();
        driver
    }

    /// Release the pins and delay provider.
    pub fn free(self) -> ((A, B, C, D), DELAY) {
        (self.coils, self.delay)
    }

    #[inline]
    pub fn phase(&self) -> usize {
        self.phase
    }

    /// Drive all four coils low.
    pub fn coils_off(&mut self) {
        self.apply(&[false; 4]);
    }

    fn apply(&mut self, state: &[bool; 4]) {
        set_level(&mut self.coils.0, state[0]);
        set_level(&mut self.coils.1, state[1]);
        set_level(&mut self.coils.2, state[2]);
        set_level(&mut self.coils.3, state[3]);
    }

    fn half_step(&mut self, forward: bool) {
        let n = HALF_STEP_SEQUENCE.len();
        self.phase = if forward {
            (self.phase + 1) % n
        } else {
            (self.phase + n - 1) % n
        };
        let state = HALF_STEP_SEQUENCE[self.phase];
        self.apply(&state);
        self.delay.delay_us(self.config.step_delay_us);
    }
}

impl<A, B, C, D, DELAY> Actuator for Uln2003<A, B, C, D, DELAY>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
    DELAY: DelayUs<u32>,
{
    fn steps_per_flap(&self) -> u32 {
        self.config.steps_per_flap
    }

    fn advance(&mut self, count: i32) {
        for _ in 0..count.unsigned_abs() {
            self.half_step(count > 0);
        }
    }

    fn release(&mut self) {
        self.coils_off();
    }
}

/// GPIO writes on the target are infallible; a failed write just loses one coil update.
#[inline]
fn set_level<P: OutputPin>(pin: &mut P, high: bool) {
    let _ = if high { pin.set_high() } else { pin.set_low() };
}
