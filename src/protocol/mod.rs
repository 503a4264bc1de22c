// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! ASCII command protocol: byte parser, reply lines and the dispatcher tying them to a drum.

pub mod dispatch;
pub mod messages;
pub mod parser;

pub use dispatch::execute;
pub use messages::{Command, Reply};
pub use parser::Parser;
