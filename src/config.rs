// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Drum configuration: the printed alphabet and the home reference.
//!
//! The number of flaps is the length of the character set, so a configuration can never describe
//! a drum whose alphabet and flap count disagree.

use crate::error::ConfigError;

/// Reference alphabet, one byte per flap, in drum order.
pub const REFERENCE_CHARSET: &[u8] = b" ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789:.-";

/// Flap facing the viewer when the drum settles just past the magnet.
pub const DEFAULT_HOME_POSITION: u8 = 2;

/// 28BYJ-48 half-stepping: 4096 steps per revolution over 40 flaps.
pub const DEFAULT_STEPS_PER_FLAP: u32 = 102;

/// Fixed per-step delay; the mechanism never ramps.
pub const DEFAULT_STEP_DELAY_US: u32 = 1_200;

/// Ordered position ↔ character table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CharacterMap<'a> {
    chars: &'a [u8],
}

impl<'a> CharacterMap<'a> {
    /// Wrap a non-empty alphabet of at most 255 flaps.
    pub fn new(chars: &'a [u8]) -> Result<Self, ConfigError> {
        if chars.is_empty() {
            return Err(ConfigError::EmptyCharacterSet);
        }
        if chars.len() > u8::MAX as usize {
            return Err(ConfigError::TooManyFlaps(chars.len()));
        }
        Ok(Self { chars })
    }

    /// Number of flaps on the drum.
    #[inline]
    pub fn len(&self) -> u8 {
        self.chars.len() as u8
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character printed on flap `position`.
    #[inline]
    pub fn char_at(&self, position: u8) -> Option<u8> {
        self.chars.get(position as usize).copied()
    }

    /// First flap showing `c`, ignoring ASCII case.
    pub fn position_of(&self, c: u8) -> Option<u8> {
        self.chars
            .iter()
            .position(|&flap| flap.eq_ignore_ascii_case(&c))
            .map(|i| i as u8)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.chars
    }
}

/// Geometry of one drum.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrumConfig<'a> {
    charset: CharacterMap<'a>,
    home_position: u8,
}

impl<'a> DrumConfig<'a> {
    pub fn new(chars: &'a [u8], home_position: u8) -> Result<Self, ConfigError> {
        let charset = CharacterMap::new(chars)?;
        if home_position >= charset.len() {
            return Err(ConfigError::HomeOutOfRange {
                home: home_position,
                num_flaps: charset.len(),
            });
        }
        Ok(Self {
            charset,
            home_position,
        })
    }

    #[inline]
    pub fn charset(&self) -> &CharacterMap<'a> {
        &self.charset
    }

    #[inline]
    pub fn num_flaps(&self) -> u8 {
        self.charset.len()
    }

    #[inline]
    pub fn home_position(&self) -> u8 {
        self.home_position
    }
}

impl DrumConfig<'static> {
    /// The 40-flap reference drum homing to flap 2.
    pub fn reference() -> Self {
        Self {
            charset: CharacterMap {
                chars: REFERENCE_CHARSET,
            },
            home_position: DEFAULT_HOME_POSITION,
        }
    }
}

impl Default for DrumConfig<'static> {
    fn default() -> Self {
        Self::reference()
    }
}
