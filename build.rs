// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

use std::env;

fn main() {
    // Linker scripts apply to the firmware binary only.
    if env::var_os("CARGO_FEATURE_FIRMWARE").is_some() {
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
    }
    if env::var_os("CARGO_FEATURE_RTT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
}
