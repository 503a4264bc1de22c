// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use core::fmt::Write;

use cortex_m::delay::Delay;
use cortex_m_rt::entry;
#[cfg(feature = "rtt")]
use defmt_rtt as _;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use splitflap::config::DrumConfig;
use splitflap::control::DrumController;
use splitflap::drivers::HallSwitch;
#[cfg(feature = "step-dir")]
use splitflap::drivers::{StepDir, StepDirConfig};
#[cfg(not(feature = "step-dir"))]
use splitflap::drivers::{Uln2003, Uln2003Config};
use splitflap::error::Error;
use splitflap::hw::{BoardPins, Led, Usart};
use splitflap::protocol::{execute, Command, Parser, Reply};

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOD);

    // LED
    let mut led_fault = Led::active_low(pins.leds.red);
    let mut led_homed = Led::active_low(pins.leds.yellow);
    let mut led_busy = Led::active_low(pins.leds.green);

    // USART1 (command link)
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (pins.usart1.tx, pins.usart1.rx), &clocks, usart_cfg);
    let mut usart = Usart::new(serial);

    // Drum
    let delay = Delay::new(cp.SYST, clocks.sysclk().raw());
    let motor = pins.motor;

    #[cfg(not(feature = "step-dir"))]
    let actuator = Uln2003::new(
        motor.out1,
        motor.out2,
        motor.out3,
        motor.out4,
        delay,
        Uln2003Config::default(),
    );
    #[cfg(feature = "step-dir")]
    let actuator = StepDir::new(motor.out1, motor.out2, motor.out3, delay, StepDirConfig::default());

    let sensor = HallSwitch::active_low(pins.hall);
    let mut drum = DrumController::new(actuator, sensor, DrumConfig::reference()).unwrap();

    usart.println("splitflap ready");

    let mut parser = Parser::new();
    let mut pending = Some(Command::Home);

    loop {
        if let Some(command) = pending.take() {
            led_busy.on();
            let reply = execute(&mut drum, command);
            led_busy.off();

            let _ = writeln!(usart, "{}\r", reply);

            led_homed.set(drum.is_homed());
            match reply {
                Reply::Error(Error::HomingFailed { .. }) => led_fault.on(),
                Reply::Homed(_) => led_fault.off(),
                _ => {}
            }
        }

        match usart.read_byte() {
            Ok(byte) => pending = parser.push(byte),
            Err(nb::Error::WouldBlock) => {}
            // Overrun or framing error: whatever was half-received is garbage.
            Err(nb::Error::Other(_)) => parser.reset(),
        }
    }
}
