// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Toggle the soft-core LED every 10 microseconds.
//!
//! Build with `cargo build -p blinky-firmware --release --target riscv32i-unknown-none-elf`.

#![no_std]
#![no_main]

use blinky_hal::memory_map::{COUNTER_ADDR, LED_ADDR};
use blinky_hal::{Blinker, ReadOnly, Reg, WriteOnly, BLINK_INTERVAL_US};
use panic_halt as _;
use riscv_rt::entry;

#[entry]
fn main() -> ! {
    // SAFETY: fixed soft-core registers, owned by this program alone.
    let led = unsafe { Reg::<u8, WriteOnly>::new(LED_ADDR) };
    let micros = unsafe { Reg::<u32, ReadOnly>::new(COUNTER_ADDR) };

    match Blinker::new(led, micros, BLINK_INTERVAL_US).run() {
        Ok(never) | Err(never) => match never {},
    }
}
