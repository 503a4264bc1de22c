// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Recording pins and delay for driver tests.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::{InputPin, OutputPin};

const PINS: usize = 8;

/// Shared record of every pin level, rising edge and delay.
pub struct Trace {
    levels: RefCell<[bool; PINS]>,
    rises: RefCell<[u32; PINS]>,
    writes: RefCell<Vec<(usize, bool)>>,
    delay_us: Cell<u64>,
}

impl Trace {
    pub fn new() -> Self {
        Self {
            levels: RefCell::new([false; PINS]),
            rises: RefCell::new([0; PINS]),
            writes: RefCell::new(Vec::new()),
            delay_us: Cell::new(0),
        }
    }

    pub fn pin(&self, index: usize) -> FakePin<'_> {
        FakePin { trace: self, index }
    }

    pub fn delay(&self) -> FakeDelay<'_> {
        FakeDelay { trace: self }
    }

    /// Levels of pins 0..4.
    pub fn levels(&self) -> [bool; 4] {
        let l = self.levels.borrow();
        [l[0], l[1], l[2], l[3]]
    }

    pub fn level(&self, index: usize) -> bool {
        self.levels.borrow()[index]
    }

    /// Drive an input from the outside.
    pub fn set_level(&self, index: usize, high: bool) {
        self.levels.borrow_mut()[index] = high;
    }

    pub fn rises(&self, index: usize) -> u32 {
        self.rises.borrow()[index]
    }

    pub fn writes(&self) -> Vec<(usize, bool)> {
        self.writes.borrow().clone()
    }

    pub fn delay_us(&self) -> u64 {
        self.delay_us.get()
    }

    fn write(&self, index: usize, high: bool) {
        let mut levels = self.levels.borrow_mut();
        if high && !levels[index] {
            self.rises.borrow_mut()[index] += 1;
        }
        levels[index] = high;
        self.writes.borrow_mut().push((index, high));
    }
}

pub struct FakePin<'a> {
    trace: &'a Trace,
    index: usize,
}

impl OutputPin for FakePin<'_> {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.trace.write(self.index, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.trace.write(self.index, true);
        Ok(())
    }
}

impl InputPin for FakePin<'_> {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.trace.level(self.index))
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.trace.level(self.index))
    }
}

/// Input whose every read fails.
pub struct BrokenPin;

impl InputPin for BrokenPin {
    type Error = ();

    fn is_high(&self) -> Result<bool, Self::Error> {
        Err(())
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Err(())
    }
}

pub struct FakeDelay<'a> {
    trace: &'a Trace,
}

impl DelayUs<u32> for FakeDelay<'_> {
    fn delay_us(&mut self, us: u32) {
        self.trace.delay_us.set(self.trace.delay_us.get() + us as u64);
    }
}
