// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::peripherals::SimClock;
use crate::{SimResult, SimulationError};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// One write to the LED register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedEvent {
    /// Counter value when the write landed.
    pub at: u32,
    pub level: u8,
}

/// Single-byte LED output register.
/// Firmware only writes it; the bus reads back the latched level for inspection.
#[derive(Debug)]
pub struct Led {
    level: u8,
    clock: SimClock,
    history: Vec<LedEvent>,
}

impl Led {
    pub fn new(clock: SimClock) -> Self {
        Self {
            level: 0,
            clock,
            history: Vec::new(),
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn history(&self) -> &[LedEvent] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl crate::Peripheral for Led {
    fn read(&self, offset: u64) -> SimResult<u8> {
        match offset {
            0 => Ok(self.level),
            _ => Err(SimulationError::MemoryViolation(offset)),
        }
    }

    fn write(&mut self, offset: u64, value: u8) -> SimResult<()> {
        if offset != 0 {
            return Err(SimulationError::MemoryViolation(offset));
        }
        let at = self.clock.now();
        tracing::debug!("LED <- {} at {:#x}", value, at);
        self.level = value;
        self.history.push(LedEvent { at, level: value });
        Ok(())
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}
