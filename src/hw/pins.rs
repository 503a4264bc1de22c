// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F767 split-flap controller board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiod, Alternate, Input, Output, PullUp, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub leds: LedPins,
    pub usart1: Usart1Pins,
    pub motor: MotorPins,
    pub hall: gpioa::PA0<Input<PullUp>>,
}

pub struct LedPins {
    pub red: gpiod::PD8<Output<PushPull>>,
    pub yellow: gpiod::PD9<Output<PushPull>>,
    pub green: gpiod::PD10<Output<PushPull>>,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// Motor header. ULN2003 boards use all four as IN1..IN4; step/dir boards use
/// `out1` = STEP, `out2` = DIR, `out3` = ~EN.
pub struct MotorPins {
    pub out1: gpiod::PD12<Output<PushPull>>,
    pub out2: gpiod::PD13<Output<PushPull>>,
    pub out3: gpiod::PD14<Output<PushPull>>,
    pub out4: gpiod::PD15<Output<PushPull>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiod = gpiod.split();

        Self {
            leds: LedPins {
                red: gpiod.pd8.into_push_pull_output(),
                yellow: gpiod.pd9.into_push_pull_output(),
                green: gpiod.pd10.into_push_pull_output(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            motor: MotorPins {
                out1: gpiod.pd12.into_push_pull_output(),
                out2: gpiod.pd13.into_push_pull_output(),
                out3: gpiod.pd14.into_push_pull_output(),
                out4: gpiod.pd15.into_push_pull_output(),
            },

            hall: gpioa.pa0.into_pull_up_input(),
        }
    }
}
