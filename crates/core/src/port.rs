// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Bus-backed implementations of the HAL register traits, so the firmware's
//! own toggle loop can run against the simulated board.

use crate::bus::SystemBus;
use crate::{Bus, SimulationError, SimulationObserver};
use blinky_hal::{Clock, Led, Micros};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// LED register reached through the bus.
pub struct BusLed {
    bus: Rc<RefCell<SystemBus>>,
    addr: u64,
    observers: Vec<Arc<dyn SimulationObserver>>,
}

impl BusLed {
    pub fn new(
        bus: Rc<RefCell<SystemBus>>,
        addr: u64,
        observers: Vec<Arc<dyn SimulationObserver>>,
    ) -> Self {
        Self {
            bus,
            addr,
            observers,
        }
    }
}

impl Led for BusLed {
    type Error = SimulationError;

    fn write(&mut self, level: u8) -> Result<(), SimulationError> {
        let mut bus = self.bus.borrow_mut();
        bus.write_u8(self.addr, level)?;
        let now = bus.counter();
        for observer in &self.observers {
            observer.on_led_write(now, level);
        }
        Ok(())
    }
}

/// Microsecond counter reached through the bus.
///
/// Every poll costs `poll_cost` ticks of simulated time, which stands in for
/// the instructions the polling loop spends between two reads.
pub struct BusClock {
    bus: Rc<RefCell<SystemBus>>,
    addr: u64,
    poll_cost: u32,
    polls: u64,
    observers: Vec<Arc<dyn SimulationObserver>>,
}

impl BusClock {
    pub fn new(
        bus: Rc<RefCell<SystemBus>>,
        addr: u64,
        poll_cost: u32,
        observers: Vec<Arc<dyn SimulationObserver>>,
    ) -> Self {
        Self {
            bus,
            addr,
            poll_cost,
            polls: 0,
            observers,
        }
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }
}

impl Clock for BusClock {
    type Error = SimulationError;

    fn now(&mut self) -> Result<Micros, SimulationError> {
        let bus = self.bus.borrow();
        let now = bus.read_u32(self.addr)?;
        bus.advance(self.poll_cost);
        self.polls += 1;
        for observer in &self.observers {
            observer.on_counter_poll(now);
        }
        Ok(Micros(now))
    }
}
