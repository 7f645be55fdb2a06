// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Memory map of the RV32I soft-core.

/// LED output, one byte, write-only. 255 = on, 0 = off.
pub const LED_ADDR: usize = 0xFFFF_FFFF;

/// Microsecond counter, four bytes, read-only.
///
/// Precondition: the hardware increments it exactly once per microsecond.
pub const COUNTER_ADDR: usize = 0xFFFF_FFF4;

/// Unified instruction/data RAM at address 0, in 32-bit words.
pub const RAM_WORDS: usize = 2048;
