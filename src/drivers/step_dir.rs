// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Step/direction/enable stepper driver (A4988, DRV8825, TMC2208 in standalone mode, ...).
//!
//! One rising edge on STEP moves the motor by one (micro)step in the direction selected by DIR.
//! The driver outputs are only enabled while moving; [`Actuator::release`] disables them again.

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::OutputPin;

use crate::motors::Actuator;

/// Timing and wiring options for a [`StepDir`] driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepDirConfig {
    /// 200 full steps × 16 microsteps over 40 flaps by default.
    pub steps_per_flap: u32,
    /// STEP high time.
    pub pulse_width_us: u32,
    /// Rising edge to rising edge.
    pub step_interval_us: u32,
    /// Drive DIR low for forward instead of high.
    pub invert_direction: bool,
    /// ENABLE asserted by driving the pin low (A4988 `~EN`).
    pub enable_active_low: bool,
}

impl Default for StepDirConfig {
    fn default() -> Self {
        Self {
            steps_per_flap: 80,
            pulse_width_us: 2,
            step_interval_us: 500,
            invert_direction: false,
            enable_active_low: true,
        }
    }
}

impl StepDirConfig {
    pub fn with_steps_per_flap(mut self, steps: u32) -> Self {
        self.steps_per_flap = steps;
        self
    }

    pub fn with_timing_us(mut self, pulse_width: u32, step_interval: u32) -> Self {
        self.pulse_width_us = pulse_width;
        self.step_interval_us = step_interval;
        self
    }

    pub fn with_inverted_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    pub fn with_enable_active_low(mut self, active_low: bool) -> Self {
        self.enable_active_low = active_low;
        self
    }
}

/// Step/direction driver with an enable line.
pub struct StepDir<STEP, DIR, EN, DELAY> {
    step: STEP,
    dir: DIR,
    enable: EN,
    delay: DELAY,
    config: StepDirConfig,
    enabled: bool,
}

impl<STEP, DIR, EN, DELAY> StepDir<STEP, DIR, EN, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    DELAY: DelayUs<u32>,
{
    /// Take ownership of the pins with STEP low and the outputs disabled.
    pub fn new(step: STEP, dir: DIR, enable: EN, delay: DELAY, config: StepDirConfig) -> Self {
        let mut driver = Self {
            step,
            dir,
            enable,
            delay,
            config,
            enabled: false,
        };
        let _ = driver.step.set_low();
        driver.set_enabled(false);
        driver
    }

    pub fn free(self) -> (STEP, DIR, EN, DELAY) {
        (self.step, self.dir, self.enable, self.delay)
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Assert or de-assert the driver's enable input.
    pub fn set_enabled(&mut self, on: bool) {
        let drive_high = on != self.config.enable_active_low;
        let _ = if drive_high {
            self.enable.set_high()
        } else {
            self.enable.set_low()
        };
        self.enabled = on;
    }

    fn set_direction(&mut self, forward: bool) {
        let _ = if forward != self.config.invert_direction {
            self.dir.set_high()
        } else {
            self.dir.set_low()
        };
    }

    fn pulse(&mut self) {
        let width = self.config.pulse_width_us;
        let _ = self.step.set_high();
        self.delay.delay_us(width);
        let _ = self.step.set_low();
        self.delay
            .delay_us(self.config.step_interval_us.saturating_sub(width));
    }
}

impl<STEP, DIR, EN, DELAY> Actuator for StepDir<STEP, DIR, EN, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    DELAY: DelayUs<u32>,
{
    fn steps_per_flap(&self) -> u32 {
        self.config.steps_per_flap
    }

    fn advance(&mut self, count: i32) {
        if count == 0 {
            return;
        }
        if !self.enabled {
            self.set_enabled(true);
        }
        self.set_direction(count > 0);
        for _ in 0..count.unsigned_abs() {
            self.pulse();
        }
    }

    fn release(&mut self) {
        self.set_enabled(false);
    }
}
