// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use core::convert::Infallible;

use crate::{Clock, Led, Micros};

/// Half-period of the blink, in counter ticks.
pub const BLINK_INTERVAL_US: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Off,
    On,
}

impl Level {
    pub const fn value(self) -> u8 {
        match self {
            Level::Off => 0,
            Level::On => 255,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Level::Off => Level::On,
            Level::On => Level::Off,
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.value()
    }
}

/// Busy-wait LED toggler.
///
/// The LED register is write-only, so the current level is the last value
/// this driver wrote. Nothing else may write the register.
#[derive(Debug)]
pub struct Blinker<L, C> {
    led: L,
    clock: C,
    interval: u32,
    level: Level,
}

impl<L, C, E> Blinker<L, C>
where
    L: Led<Error = E>,
    C: Clock<Error = E>,
{
    pub fn new(led: L, clock: C, interval: u32) -> Self {
        Self {
            led,
            clock,
            interval,
            level: Level::Off,
        }
    }

    /// Last level written to the LED.
    ///
    /// Reports [`Level::Off`] until [`start`](Self::start) has written the
    /// register, even though the register itself has not been touched yet.
    /// A `toggle` before `start` therefore switches the LED on.
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn start(&mut self) -> Result<(), E> {
        self.set(Level::On)
    }

    /// Poll the counter until it is no longer before `target`.
    /// Returns the reading that ended the wait.
    pub fn wait_until(&mut self, target: Micros) -> Result<Micros, E> {
        loop {
            let now = self.clock.now()?;
            if now.has_reached(target) {
                return Ok(now);
            }
        }
    }

    pub fn toggle(&mut self) -> Result<Level, E> {
        let next = self.level.toggled();
        self.set(next)?;
        Ok(next)
    }

    /// One period: read the counter, wait out the interval, flip the LED.
    pub fn step(&mut self) -> Result<Level, E> {
        let target = self.clock.now()?.wrapping_add(self.interval);
        self.wait_until(target)?;
        self.toggle()
    }

    /// Switch the LED on and toggle it forever.
    ///
    /// Only returns if the underlying registers fail, which never happens on
    /// hardware where `E` is [`Infallible`].
    pub fn run(mut self) -> Result<Infallible, E> {
        self.start()?;
        loop {
            self.step()?;
        }
    }

    pub fn release(self) -> (L, C) {
        (self.led, self.clock)
    }

    fn set(&mut self, level: Level) -> Result<(), E> {
        self.led.write(level.value())?;
        self.level = level;
        Ok(())
    }
}
