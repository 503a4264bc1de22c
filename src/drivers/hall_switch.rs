// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Digital hall-effect switch (A3144, US5881, ...) used as the drum's home sensor.
//!
//! The common open-collector parts pull their output low while the magnet is in range, so the
//! default is active-low with the MCU's internal pull-up enabled on the input.

use embedded_hal::digital::v2::InputPin;

use crate::hw::ActiveLevel;
use crate::motors::HomeSensor;

pub struct HallSwitch<PIN> {
    pin: PIN,
    active: ActiveLevel,
}

impl<PIN: InputPin> HallSwitch<PIN> {
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        Self { pin, active }
    }

    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    pub fn active_high(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

impl<PIN: InputPin> HomeSensor for HallSwitch<PIN> {
    /// A failed read counts as "not at home".
    fn is_at_home(&self) -> bool {
        let level = match self.active {
            ActiveLevel::High => self.pin.is_high(),
            ActiveLevel::Low => self.pin.is_low(),
        };
        level.unwrap_or(false)
    }
}
