// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Simulated drum.
//!
//! [`SimDrum`] models the mechanism as a step counter wrapping once per revolution with a magnet
//! covering a fixed window of steps. The actuator and sensor handles borrow the same drum, so the
//! sensor always sees where the actuator left it. Faults can be injected: missed steps (the drum
//! silently falls behind the commanded motion) and one-shot sensor pulses at a given commanded
//! step count.

use core::cell::Cell;

use crate::motors::{Actuator, HomeSensor};

pub struct SimDrum {
    steps_per_flap: u32,
    steps_per_rev: u32,

    /// Physical angle in steps, `0..steps_per_rev`.
    angle: Cell<u32>,

    magnet_start: u32,
    magnet_width: u32,

    /// Steps still to be swallowed by the mechanism.
    missed: Cell<u32>,
    /// Commanded step count at which the sensor reads "home" once.
    pulse_at: Cell<Option<u32>>,

    commanded: Cell<u32>,
    advance_calls: Cell<u32>,
    releases: Cell<u32>,
    sensor_reads: Cell<u32>,
}

impl SimDrum {
    /// Drum with `num_flaps` flaps and a magnet covering `magnet_width` steps from
    /// `magnet_start`. The drum starts at angle 0.
    pub fn new(steps_per_flap: u32, num_flaps: u8, magnet_start: u32, magnet_width: u32) -> Self {
        let steps_per_rev = steps_per_flap * num_flaps as u32;
        Self {
            steps_per_flap,
            steps_per_rev,
            angle: Cell::new(0),
            magnet_start: magnet_start % steps_per_rev.max(1),
            magnet_width,
            missed: Cell::new(0),
            pulse_at: Cell::new(None),
            commanded: Cell::new(0),
            advance_calls: Cell::new(0),
            releases: Cell::new(0),
            sensor_reads: Cell::new(0),
        }
    }

    /// Drum whose sensor never fires on its own.
    pub fn without_magnet(steps_per_flap: u32, num_flaps: u8) -> Self {
        Self::new(steps_per_flap, num_flaps, 0, 0)
    }

    pub fn actuator(&self) -> SimActuator<'_> {
        SimActuator { drum: self }
    }

    pub fn sensor(&self) -> SimSensor<'_> {
        SimSensor { drum: self }
    }

    #[inline]
    pub fn angle(&self) -> u32 {
        self.angle.get()
    }

    pub fn set_angle(&self, angle: u32) {
        self.angle.set(angle % self.steps_per_rev);
    }

    #[inline]
    pub fn steps_per_rev(&self) -> u32 {
        self.steps_per_rev
    }

    /// The next `steps` commanded steps produce no motion.
    pub fn miss_steps(&self, steps: u32) {
        self.missed.set(self.missed.get() + steps);
    }

    /// Report "home" on the first read taken once exactly `step` steps have been commanded.
    pub fn pulse_at_step(&self, step: u32) {
        self.pulse_at.set(Some(step));
    }

    /// Total steps commanded so far, regardless of direction.
    #[inline]
    pub fn commanded_steps(&self) -> u32 {
        self.commanded.get()
    }

    #[inline]
    pub fn advance_calls(&self) -> u32 {
        self.advance_calls.get()
    }

    #[inline]
    pub fn releases(&self) -> u32 {
        self.releases.get()
    }

    #[inline]
    pub fn sensor_reads(&self) -> u32 {
        self.sensor_reads.get()
    }

    fn in_magnet(&self) -> bool {
        if self.magnet_width == 0 {
            return false;
        }
        let offset = (self.angle.get() + self.steps_per_rev - self.magnet_start) % self.steps_per_rev;
        offset < self.magnet_width
    }

    fn step(&self, forward: bool) {
        self.commanded.set(self.commanded.get() + 1);

        let missed = self.missed.get();
        if missed > 0 {
            self.missed.set(missed - 1);
            return;
        }

        let rev = self.steps_per_rev;
        let angle = self.angle.get();
        self.angle.set(if forward {
            (angle + 1) % rev
        } else {
            (angle + rev - 1) % rev
        });
    }
}

/// Actuator handle onto a [`SimDrum`].
pub struct SimActuator<'a> {
    drum: &'a SimDrum,
}

impl Actuator for SimActuator<'_> {
    fn steps_per_flap(&self) -> u32 {
        self.drum.steps_per_flap
    }

    fn advance(&mut self, count: i32) {
        self.drum.advance_calls.set(self.drum.advance_calls.get() + 1);
        for _ in 0..count.unsigned_abs() {
            self.drum.step(count > 0);
        }
    }

    fn release(&mut self) {
        self.drum.releases.set(self.drum.releases.get() + 1);
    }
}

/// Home sensor handle onto a [`SimDrum`].
pub struct SimSensor<'a> {
    drum: &'a SimDrum,
}

impl HomeSensor for SimSensor<'_> {
    fn is_at_home(&self) -> bool {
        let drum = self.drum;
        drum.sensor_reads.set(drum.sensor_reads.get() + 1);

        if drum.pulse_at.get() == Some(drum.commanded.get()) {
            drum.pulse_at.set(None);
            return true;
        }
        drum.in_magnet()
    }
}
