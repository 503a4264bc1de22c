// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Open-loop position tracking for a split-flap drum.
//!
//! The drum only ever turns forward. Position is counted in whole flaps from a single magnetic
//! reference: [`home`](DrumController::home) scans for the magnet and settles just past the edge
//! of its detection zone, after which every move is a forward flap count. The sensor is re-read
//! after each flap so that a move which finds the magnet somewhere other than the home flap snaps
//! its position back to home and finishes from there.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! drum.home()?;
//!
//! loop {
//!     let c = next_character();
//!     drum.go_to_character(c)?;
//! }
//! ```
//!
//! Every operation blocks until the mechanism has stopped. The `*_until` variants poll an abort
//! predicate before each motor step; an aborted move keeps the last whole flap it reached and
//! should be followed by a re-home.

use crate::config::DrumConfig;
use crate::error::{ConfigError, Error};
use crate::motors::{Actuator, HomeSensor};

/// Snapshot returned by [`DrumController::status`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub homed: bool,
    pub position: Option<u8>,
    pub character: Option<u8>,
    /// Live sensor reading at the time of the call.
    pub at_home: bool,
}

/// A mid-move re-sync: the sensor fired while the tracked position was `believed`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Drift {
    pub believed: u8,
    pub corrected: u8,
}

/// Outcome of a completed move.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveReport {
    /// Flaps physically advanced, including any added by a re-sync.
    pub flaps: u16,
    pub drift: Option<Drift>,
}

/// Drum position state machine over an exclusively owned actuator and home sensor.
pub struct DrumController<'a, A, S> {
    actuator: A,
    sensor: S,
    config: DrumConfig<'a>,

    /// Flap facing the viewer, `None` until homed.
    position: Option<u8>,
    homed: bool,
}

impl<'a, A, S> DrumController<'a, A, S>
where
    A: Actuator,
    S: HomeSensor,
{
    /// Create a controller in the unknown state. No motion happens until [`home`](Self::home).
    pub fn new(actuator: A, sensor: S, config: DrumConfig<'a>) -> Result<Self, ConfigError> {
        let steps_per_flap = actuator.steps_per_flap();
        if steps_per_flap == 0 {
            return Err(ConfigError::ZeroStepsPerFlap);
        }
        // Two revolutions of steps must fit in a u32.
        if steps_per_flap
            .checked_mul(config.num_flaps() as u32 * 2)
            .is_none()
        {
            return Err(ConfigError::StepsPerFlapTooLarge { steps_per_flap });
        }
        Ok(Self {
            actuator,
            sensor,
            config,
            position: None,
            homed: false,
        })
    }

    /// Release the actuator and sensor.
    pub fn free(self) -> (A, S) {
        (self.actuator, self.sensor)
    }

    #[inline]
    pub fn config(&self) -> &DrumConfig<'a> {
        &self.config
    }

    #[inline]
    pub fn is_homed(&self) -> bool {
        self.homed
    }

    #[inline]
    pub fn position(&self) -> Option<u8> {
        self.position
    }

    /// Character currently facing the viewer, if the position is known.
    pub fn character(&self) -> Option<u8> {
        self.position.and_then(|p| self.config.charset().char_at(p))
    }

    /// Read-only snapshot including a fresh sensor reading.
    pub fn status(&self) -> Status {
        Status {
            homed: self.homed,
            position: self.position,
            character: self.character(),
            at_home: self.sensor.is_at_home(),
        }
    }

    /// Largest number of steps [`home`](Self::home) scans before giving up: two revolutions.
    pub fn homing_budget(&self) -> u32 {
        self.actuator.steps_per_flap() * self.config.num_flaps() as u32 * 2
    }

    /// Establish the absolute reference from the home sensor.
    ///
    /// On failure the position becomes unknown and the drum must be homed again before moving.
    pub fn home(&mut self) -> Result<(), Error> {
        self.home_until(|| false)
    }

    /// [`home`](Self::home), stopping with [`Error::Aborted`] as soon as `abort` returns true.
    /// An aborted homing leaves the previous state untouched.
    pub fn home_until<F>(&mut self, mut abort: F) -> Result<(), Error>
    where
        F: FnMut() -> bool,
    {
        let result = self.run_homing(&mut abort);
        self.actuator.release();
        result
    }

    fn run_homing<F>(&mut self, abort: &mut F) -> Result<(), Error>
    where
        F: FnMut() -> bool,
    {
        let steps_per_flap = self.actuator.steps_per_flap();
        let budget = self.homing_budget();
        info!("homing: scanning up to {} steps", budget);

        // Starting on the magnet would read as an immediate hit; leave the zone first.
        if self.sensor.is_at_home() {
            debug!("homing: already in home zone, stepping out");
            for _ in 0..2 * steps_per_flap {
                self.step(abort)?;
            }
        }

        let mut found = false;
        for _ in 0..budget {
            self.step(abort)?;
            if self.sensor.is_at_home() {
                found = true;
                break;
            }
        }

        if !found {
            self.homed = false;
            self.position = None;
            error!("homing: sensor not found within {} steps", budget);
            return Err(Error::HomingFailed { steps: budget });
        }

        // Walk through the zone so every homing ends on the same edge.
        let mut overshoot = 0;
        while overshoot < steps_per_flap && self.sensor.is_at_home() {
            self.step(abort)?;
            overshoot += 1;
        }

        let home = self.config.home_position();
        self.position = Some(home);
        self.homed = true;
        info!("homing: done at flap {} after {} overshoot steps", home, overshoot);
        Ok(())
    }

    /// Advance forward to flap `target`.
    ///
    /// Fails without moving if the drum is not homed or `target` is not a flap index. Moving to
    /// the current flap succeeds without touching the motor.
    pub fn go_to_position(&mut self, target: i32) -> Result<MoveReport, Error> {
        self.go_to_position_until(target, || false)
    }

    /// [`go_to_position`](Self::go_to_position) with an abort predicate polled before every
    /// motor step.
    pub fn go_to_position_until<F>(&mut self, target: i32, mut abort: F) -> Result<MoveReport, Error>
    where
        F: FnMut() -> bool,
    {
        let num_flaps = self.config.num_flaps();

        let current = match (self.homed, self.position) {
            (true, Some(p)) => p,
            _ => return Err(Error::NotHomed),
        };

        let target = u8::try_from(target)
            .ok()
            .filter(|&t| t < num_flaps)
            .ok_or(Error::PositionOutOfRange {
                position: target,
                num_flaps,
            })?;

        if target == current {
            return Ok(MoveReport::default());
        }

        let result = self.run_move(current, target, &mut abort);
        self.actuator.release();
        result
    }

    /// Look up `c` (ASCII case-insensitive, first match) and move to its flap.
    pub fn go_to_character(&mut self, c: u8) -> Result<MoveReport, Error> {
        self.go_to_character_until(c, || false)
    }

    pub fn go_to_character_until<F>(&mut self, c: u8, abort: F) -> Result<MoveReport, Error>
    where
        F: FnMut() -> bool,
    {
        let target = self
            .config
            .charset()
            .position_of(c)
            .ok_or(Error::CharacterNotFound(c))?;
        self.go_to_position_until(target as i32, abort)
    }

    fn run_move<F>(&mut self, current: u8, target: u8, abort: &mut F) -> Result<MoveReport, Error>
    where
        F: FnMut() -> bool,
    {
        let home = self.config.home_position();
        let mut position = current;
        let mut remaining = self.flaps_between(current, target);
        let mut report = MoveReport::default();

        debug!("move: {} -> {} ({} flaps)", current, target, remaining);

        while remaining > 0 {
            for _ in 0..self.actuator.steps_per_flap() {
                self.step(abort)?;
            }
            position = self.next_flap(position);
            self.position = Some(position);
            remaining -= 1;
            report.flaps += 1;

            // One re-sync per move: after snapping, fewer than a full revolution remains, so the
            // magnet cannot legitimately be seen again before the target.
            let at_home = self.sensor.is_at_home();
            if at_home && position != home && report.drift.is_none() {
                warn!("drift: home sensor seen at flap {}, re-syncing to {}", position, home);
                report.drift = Some(Drift {
                    believed: position,
                    corrected: home,
                });
                position = home;
                self.position = Some(home);
                remaining = self.flaps_between(home, target);
            }
        }

        info!("move: at flap {} after {} flaps", position, report.flaps);
        Ok(report)
    }

    /// One motor step forward, unless `abort` says otherwise.
    #[inline]
    fn step<F>(&mut self, abort: &mut F) -> Result<(), Error>
    where
        F: FnMut() -> bool,
    {
        if abort() {
            warn!("operation aborted");
            return Err(Error::Aborted);
        }
        self.actuator.advance(1);
        Ok(())
    }

    #[inline]
    fn next_flap(&self, position: u8) -> u8 {
        ((position as u16 + 1) % self.config.num_flaps() as u16) as u8
    }

    /// Forward flap count from `from` to `to`.
    #[inline]
    fn flaps_between(&self, from: u8, to: u8) -> u16 {
        let n = self.config.num_flaps() as u16;
        (to as u16 + n - from as u16) % n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motors::SimDrum;
    use rstest::rstest;

    const SPF: u32 = 8;

    type SimController<'d> = DrumController<
        'static,
        crate::motors::SimActuator<'d>,
        crate::motors::SimSensor<'d>,
    >;

    fn controller(drum: &SimDrum) -> SimController<'_> {
        DrumController::new(drum.actuator(), drum.sensor(), DrumConfig::reference()).unwrap()
    }

    /// Magnet covering half a flap, starting 100 steps into the revolution.
    fn magnet_drum() -> SimDrum {
        SimDrum::new(SPF, 40, 100, SPF / 2)
    }

    fn homed_at(drum: &SimDrum, position: i32) -> SimController<'_> {
        let mut ctl = controller(drum);
        ctl.home().unwrap();
        ctl.go_to_position(position).unwrap();
        ctl
    }

    #[test]
    fn starts_unknown() {
        let drum = magnet_drum();
        let ctl = controller(&drum);
        assert!(!ctl.is_homed());
        assert_eq!(ctl.position(), None);
        assert_eq!(ctl.character(), None);
    }

    #[test]
    fn rejects_zero_steps_per_flap() {
        let drum = SimDrum::without_magnet(0, 1);
        let result = DrumController::new(drum.actuator(), drum.sensor(), DrumConfig::reference());
        assert!(matches!(result, Err(ConfigError::ZeroStepsPerFlap)));
    }

    #[test]
    fn rejects_steps_per_flap_that_overflow_the_homing_budget() {
        let spf = u32::MAX / 40;
        let drum = SimDrum::without_magnet(spf, 1);
        let result = DrumController::new(drum.actuator(), drum.sensor(), DrumConfig::reference());
        assert!(matches!(
            result,
            Err(ConfigError::StepsPerFlapTooLarge { steps_per_flap }) if steps_per_flap == spf
        ));

        // Largest value that still fits two revolutions of 40 flaps.
        let drum = SimDrum::without_magnet(u32::MAX / 80, 1);
        let ctl = controller(&drum);
        assert_eq!(ctl.homing_budget(), u32::MAX / 80 * 80);
    }

    #[test]
    fn homing_settles_on_the_trailing_edge_of_the_magnet() {
        let drum = magnet_drum();
        let mut ctl = controller(&drum);

        ctl.home().unwrap();

        assert!(ctl.is_homed());
        assert_eq!(ctl.position(), Some(2));
        assert_eq!(ctl.character(), Some(b'B'));
        assert_eq!(drum.angle(), 100 + SPF / 2);
        assert_eq!(drum.releases(), 1);
    }

    #[test]
    fn homing_detects_at_step_100_and_walks_out() {
        // Sensor active from scan step 100 for one flap's worth of steps.
        let drum = SimDrum::new(SPF, 40, 100, SPF);
        let mut ctl = controller(&drum);

        ctl.home().unwrap();

        assert!(ctl.is_homed());
        assert_eq!(ctl.position(), Some(2));
        assert_eq!(drum.commanded_steps(), 100 + SPF);
    }

    #[test]
    fn homing_from_inside_the_zone_steps_out_first() {
        let drum = magnet_drum();
        drum.set_angle(101);
        let mut ctl = controller(&drum);

        ctl.home().unwrap();

        assert_eq!(ctl.position(), Some(2));
        assert_eq!(drum.angle(), 100 + SPF / 2);
        // Two flaps out, then nearly a full revolution back round to the magnet.
        assert!(drum.commanded_steps() > drum.steps_per_rev());
    }

    #[test]
    fn homing_is_repeatable() {
        let drum = magnet_drum();
        let mut ctl = controller(&drum);

        ctl.home().unwrap();
        let first = drum.angle();
        ctl.go_to_position(17).unwrap();
        ctl.home().unwrap();

        assert_eq!(drum.angle(), first);
        assert_eq!(ctl.position(), Some(2));
    }

    #[test]
    fn homing_failure_resets_to_unknown() {
        let blind = SimDrum::without_magnet(SPF, 40);
        let mut ctl = controller(&blind);

        let err = ctl.home().unwrap_err();

        assert_eq!(err, Error::HomingFailed { steps: SPF * 40 * 2 });
        assert!(!ctl.is_homed());
        assert_eq!(ctl.position(), None);
        assert_eq!(blind.commanded_steps(), SPF * 40 * 2);
        assert_eq!(blind.releases(), 1);
    }

    #[test]
    fn failed_rehome_forgets_a_known_position() {
        // Homed once, then the magnet disappears.
        let drum = SimDrum::new(SPF, 40, 100, SPF / 2);
        let mut ctl = controller(&drum);
        ctl.home().unwrap();

        let blind = SimDrum::without_magnet(SPF, 40);
        let mut ctl = DrumController {
            actuator: blind.actuator(),
            sensor: blind.sensor(),
            config: *ctl.config(),
            position: ctl.position(),
            homed: ctl.is_homed(),
        };

        assert!(matches!(ctl.home(), Err(Error::HomingFailed { .. })));
        assert!(!ctl.is_homed());
        assert_eq!(ctl.position(), None);
        assert!(matches!(ctl.go_to_position(3), Err(Error::NotHomed)));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(21)]
    #[case(39)]
    fn reaches_every_target_without_drift(#[case] target: i32) {
        let drum = magnet_drum();
        let mut ctl = controller(&drum);
        ctl.home().unwrap();
        let home_angle = drum.angle();

        let report = ctl.go_to_position(target).unwrap();

        assert_eq!(ctl.position(), Some(target as u8));
        assert_eq!(
            ctl.character(),
            Some(DrumConfig::reference().charset().as_bytes()[target as usize])
        );
        assert_eq!(report.drift, None);
        let flaps = (target as u32 + 40 - 2) % 40;
        assert_eq!(report.flaps as u32, flaps);
        assert_eq!(
            drum.angle(),
            (home_angle + flaps * SPF) % drum.steps_per_rev()
        );
    }

    #[test]
    fn every_target_from_every_position() {
        let drum = SimDrum::without_magnet(1, 40);
        let mut ctl = controller(&drum);
        ctl.position = Some(2);
        ctl.homed = true;

        for target in 0..40 {
            for from in 0..40 {
                ctl.go_to_position(from).unwrap();
                ctl.go_to_position(target).unwrap();
                assert_eq!(ctl.position(), Some(target as u8));
                assert_eq!(ctl.status().character, ctl.config().charset().char_at(target as u8));
            }
        }
    }

    #[test]
    fn moving_to_current_position_is_a_no_op() {
        let drum = magnet_drum();
        let mut ctl = homed_at(&drum, 7);
        let calls = drum.advance_calls();
        let releases = drum.releases();

        let report = ctl.go_to_position(7).unwrap();

        assert_eq!(report, MoveReport::default());
        assert_eq!(drum.advance_calls(), calls);
        assert_eq!(drum.releases(), releases);
        assert_eq!(ctl.position(), Some(7));
        assert!(ctl.is_homed());
    }

    #[test]
    fn moving_before_homing_fails_without_motion() {
        let drum = magnet_drum();
        let mut ctl = controller(&drum);

        assert_eq!(ctl.go_to_position(5), Err(Error::NotHomed));
        assert_eq!(ctl.go_to_character(b'A'), Err(Error::NotHomed));
        assert_eq!(drum.advance_calls(), 0);
        assert!(!ctl.is_homed());
        assert_eq!(ctl.position(), None);
    }

    #[rstest]
    #[case(-1)]
    #[case(40)]
    #[case(256)]
    #[case(i32::MIN)]
    fn out_of_range_target_fails_without_motion(#[case] target: i32) {
        let drum = magnet_drum();
        let mut ctl = homed_at(&drum, 4);
        let calls = drum.advance_calls();

        assert_eq!(
            ctl.go_to_position(target),
            Err(Error::PositionOutOfRange {
                position: target,
                num_flaps: 40
            })
        );
        assert_eq!(drum.advance_calls(), calls);
        assert_eq!(ctl.position(), Some(4));
    }

    #[test]
    fn character_lookup_ignores_case() {
        let drum = magnet_drum();
        let mut ctl = controller(&drum);
        ctl.home().unwrap();

        ctl.go_to_character(b'a').unwrap();
        let lower = ctl.position();
        ctl.go_to_character(b'Q').unwrap();
        ctl.go_to_character(b'A').unwrap();

        assert_eq!(lower, Some(1));
        assert_eq!(ctl.position(), lower);
        assert_eq!(ctl.character(), Some(b'A'));
    }

    #[test]
    fn unknown_character_fails_without_motion() {
        let drum = magnet_drum();
        let mut ctl = homed_at(&drum, 12);
        let calls = drum.advance_calls();

        assert_eq!(ctl.go_to_character(b'#'), Err(Error::CharacterNotFound(b'#')));
        assert_eq!(drum.advance_calls(), calls);
        assert_eq!(ctl.position(), Some(12));
    }

    #[test]
    fn drift_detected_mid_move_snaps_to_home_and_still_lands_on_target() {
        let drum = SimDrum::without_magnet(SPF, 40);
        let mut ctl = controller(&drum);
        ctl.position = Some(5);
        ctl.homed = true;

        // Sensor fires once, right after the third flap (tracked position 8).
        drum.pulse_at_step(3 * SPF);
        let report = ctl.go_to_position(10).unwrap();

        assert_eq!(
            report.drift,
            Some(Drift {
                believed: 8,
                corrected: 2
            })
        );
        assert_eq!(ctl.position(), Some(10));
        assert_eq!(report.flaps, 3 + 8);
        assert_eq!(drum.commanded_steps(), (3 + 8) * SPF);
    }

    #[test]
    fn sensor_at_the_home_flap_is_not_drift() {
        let drum = SimDrum::without_magnet(SPF, 40);
        let mut ctl = controller(&drum);
        ctl.position = Some(38);
        ctl.homed = true;

        // Fourth flap lands on flap 2, where the magnet belongs.
        drum.pulse_at_step(4 * SPF);
        let report = ctl.go_to_position(6).unwrap();

        assert_eq!(report.drift, None);
        assert_eq!(report.flaps, 8);
        assert_eq!(ctl.position(), Some(6));
    }

    #[test]
    fn resync_lands_on_target_for_every_offset() {
        // (position, target, detection flap) over a small drum.
        const N: u8 = 12;
        const HOME: u8 = 2;
        let chars = b"ABCDEFGHIJKL";
        let config = DrumConfig::new(chars, HOME).unwrap();
        let drum = SimDrum::without_magnet(1, N);

        for from in 0..N {
            for target in 0..N {
                let distance = (target as u32 + N as u32 - from as u32) % N as u32;
                for k in 1..=distance {
                    let mut ctl =
                        DrumController::new(drum.actuator(), drum.sensor(), config).unwrap();
                    ctl.position = Some(from);
                    ctl.homed = true;

                    let start = drum.commanded_steps();
                    drum.pulse_at_step(start + k);
                    let report = ctl.go_to_position(target as i32).unwrap();

                    let seen_at = ((from as u32 + k) % N as u32) as u8;
                    let expected = if seen_at == HOME {
                        distance
                    } else {
                        k + (target as u32 + N as u32 - HOME as u32) % N as u32
                    };
                    assert_eq!(
                        ctl.position(),
                        Some(target),
                        "from {from} to {target}, pulse after flap {k}"
                    );
                    assert_eq!(report.flaps as u32, expected);
                    assert_eq!(report.drift.is_some(), seen_at != HOME);
                    drum.pulse_at_step(u32::MAX);
                }
            }
        }
    }

    #[test]
    fn physical_slip_is_corrected_on_the_next_pass() {
        // Half-flap magnet; homing leaves the drum on its trailing edge.
        let drum = SimDrum::new(SPF, 40, 100, SPF / 2);
        let mut ctl = controller(&drum);
        ctl.home().unwrap();
        let home_angle = drum.angle();

        // The drum runs ahead by most of a flap, which puts a flap boundary inside the magnet one
        // flap before the controller expects it.
        drum.set_angle(home_angle + SPF - 2);
        let report = ctl.go_to_position(1).unwrap();

        assert_eq!(
            report.drift,
            Some(Drift {
                believed: 1,
                corrected: 2
            })
        );
        assert_eq!(ctl.position(), Some(1));
        assert_eq!(report.flaps, 39 + 39);
    }

    #[test]
    fn lagging_drum_is_corrected_when_the_magnet_arrives_early() {
        let drum = magnet_drum();
        let mut ctl = controller(&drum);
        ctl.home().unwrap();

        // The drum falls 10 steps behind. A 39-flap move stops just short of the magnet, so
        // nothing is seen yet.
        drum.miss_steps(10);
        let report = ctl.go_to_position(1).unwrap();
        assert_eq!(report.drift, None);
        assert_eq!(ctl.position(), Some(1));

        // Two flaps later the magnet passes under the sensor while the controller believes it
        // is at flap 3.
        let report = ctl.go_to_position(5).unwrap();
        assert_eq!(
            report.drift,
            Some(Drift {
                believed: 3,
                corrected: 2
            })
        );
        assert_eq!(report.flaps, 2 + 3);
        assert_eq!(ctl.position(), Some(5));
        assert_eq!(ctl.character(), Some(b'E'));
    }

    #[test]
    fn status_is_a_pure_live_read() {
        let drum = magnet_drum();
        let mut ctl = controller(&drum);

        let before = ctl.status();
        assert_eq!(
            before,
            Status {
                homed: false,
                position: None,
                character: None,
                at_home: false
            }
        );

        ctl.home().unwrap();
        let calls = drum.advance_calls();
        let reads = drum.sensor_reads();

        let status = ctl.status();
        assert!(status.homed);
        assert_eq!(status.position, Some(2));
        assert_eq!(status.character, Some(b'B'));
        assert_eq!(drum.sensor_reads(), reads + 1);

        drum.set_angle(100);
        assert!(ctl.status().at_home);
        assert_eq!(ctl.position(), Some(2));
        assert_eq!(drum.advance_calls(), calls);
    }

    #[test]
    fn aborted_move_keeps_last_whole_flap() {
        let drum = magnet_drum();
        let mut ctl = homed_at(&drum, 10);
        let start = drum.commanded_steps();

        let mut polls = 0;
        let result = ctl.go_to_position_until(20, || {
            polls += 1;
            polls > 3 * SPF + SPF / 2
        });

        assert_eq!(result, Err(Error::Aborted));
        assert_eq!(ctl.position(), Some(13));
        assert!(ctl.is_homed());
        assert_eq!(drum.commanded_steps() - start, 3 * SPF + SPF / 2);
    }

    #[test]
    fn aborted_homing_leaves_state_untouched() {
        let drum = magnet_drum();
        let mut ctl = controller(&drum);

        let mut polls = 0;
        let result = ctl.home_until(|| {
            polls += 1;
            polls > 10
        });

        assert_eq!(result, Err(Error::Aborted));
        assert!(!ctl.is_homed());
        assert_eq!(ctl.position(), None);
        assert_eq!(drum.commanded_steps(), 10);
        assert_eq!(drum.releases(), 1);
    }
}
