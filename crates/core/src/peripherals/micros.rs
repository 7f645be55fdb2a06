// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{SimResult, SimulationError};
use std::cell::Cell;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Simulated time base, shared by every peripheral that needs to know "now".
/// One tick is one microsecond; wraps at 2^32 like the hardware counter.
#[derive(Debug, Clone, Default)]
pub struct SimClock(Arc<AtomicU32>);

impl SimClock {
    pub fn new(start: u32) -> Self {
        Self(Arc::new(AtomicU32::new(start)))
    }

    pub fn now(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, ticks: u32) {
        self.0.store(ticks, Ordering::SeqCst);
    }

    pub fn advance(&self, ticks: u32) {
        // fetch_add wraps on overflow
        self.0.fetch_add(ticks, Ordering::SeqCst);
    }
}

/// Free-running 32-bit microsecond counter, read-only.
///
/// Reading the low byte latches the whole count; bytes 1..=3 come from the
/// latch so a little-endian 32-bit read is never torn.
#[derive(Debug)]
pub struct MicrosCounter {
    clock: SimClock,
    latch: Cell<u32>,
}

impl MicrosCounter {
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            latch: Cell::new(0),
        }
    }
}

impl crate::Peripheral for MicrosCounter {
    fn read(&self, offset: u64) -> SimResult<u8> {
        let value = match offset {
            0 => {
                let now = self.clock.now();
                self.latch.set(now);
                now
            }
            1..=3 => self.latch.get(),
            _ => return Err(SimulationError::MemoryViolation(offset)),
        };
        Ok((value >> (offset * 8)) as u8)
    }

    fn write(&mut self, offset: u64, _value: u8) -> SimResult<()> {
        tracing::warn!("Ignoring write to read-only counter (offset {})", offset);
        Err(SimulationError::ReadOnlyRegister(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Peripheral;

    #[test]
    fn test_clock_wraps() {
        let clock = SimClock::new(u32::MAX - 1);
        clock.advance(3);
        assert_eq!(clock.now(), 1);
    }

    #[test]
    fn test_counter_latches_on_low_byte() {
        let clock = SimClock::new(0x1122_33FF);
        let counter = MicrosCounter::new(clock.clone());

        assert_eq!(counter.read(0).unwrap(), 0xFF);
        // Time moves on mid-read; the upper bytes still belong to the latched value.
        clock.advance(1);
        assert_eq!(counter.read(1).unwrap(), 0x33);
        assert_eq!(counter.read(2).unwrap(), 0x22);
        assert_eq!(counter.read(3).unwrap(), 0x11);

        assert_eq!(counter.read(0).unwrap(), 0x00);
        assert_eq!(counter.read(1).unwrap(), 0x34);
    }

    #[test]
    fn test_counter_rejects_writes() {
        let mut counter = MicrosCounter::new(SimClock::new(5));
        assert_eq!(
            counter.write(0, 0),
            Err(SimulationError::ReadOnlyRegister(0))
        );
        assert_eq!(counter.read(0).unwrap(), 5);
    }
}
