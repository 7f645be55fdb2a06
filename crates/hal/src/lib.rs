// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Register access and the LED toggle loop.
//!
//! Everything here is `no_std` so the same [`Blinker`] runs on the RV32I
//! soft-core and inside the host simulator.

#![cfg_attr(not(test), no_std)]

pub mod blink;
pub mod memory_map;
pub mod register;
pub mod time;

use core::convert::Infallible;

pub use blink::{Blinker, Level, BLINK_INTERVAL_US};
pub use register::{ReadOnly, ReadWrite, Readable, Reg, Writable, WriteOnly};
pub use time::Micros;

/// A single-byte LED output.
pub trait Led {
    type Error;

    fn write(&mut self, level: u8) -> Result<(), Self::Error>;
}

/// A free-running microsecond counter.
pub trait Clock {
    type Error;

    fn now(&mut self) -> Result<Micros, Self::Error>;
}

impl<A: Writable> Led for Reg<u8, A> {
    type Error = Infallible;

    #[inline(always)]
    fn write(&mut self, level: u8) -> Result<(), Self::Error> {
        Reg::write(self, level);
        Ok(())
    }
}

impl<A: Readable> Clock for Reg<u32, A> {
    type Error = Infallible;

    #[inline(always)]
    fn now(&mut self) -> Result<Micros, Self::Error> {
        Ok(Micros(self.read()))
    }
}
