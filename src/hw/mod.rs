// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level wrappers. The LED wrapper is HAL-agnostic; the USART and pin map are specific to the
//! STM32F7 board and only built with the `firmware` feature.

pub mod led;
#[cfg(feature = "firmware")]
pub mod pins;
#[cfg(feature = "firmware")]
pub mod usart;

pub use led::{ActiveLevel, Led};
#[cfg(feature = "firmware")]
pub use pins::BoardPins;
#[cfg(feature = "firmware")]
pub use usart::Usart;
