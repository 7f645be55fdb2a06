// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod bus;
pub mod memory;
pub mod metrics;
pub mod peripherals;
pub mod port;
pub mod report;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use blinky_hal::Blinker;

use crate::port::{BusClock, BusLed};
use crate::report::SimulationReport;


#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("Memory access violation at {0:#x}")]
    MemoryViolation(u64),
    #[error("Write to read-only register at {0:#x}")]
    ReadOnlyRegister(u64),
    #[error("Peripheral '{0}' is not mapped on the bus")]
    MissingPeripheral(String),
}

impl SimulationError {
    /// Rebase a peripheral-relative fault onto the bus address space.
    pub(crate) fn relocate(self, base: u64) -> Self {
        match self {
            SimulationError::MemoryViolation(offset) => {
                SimulationError::MemoryViolation(base + offset)
            }
            SimulationError::ReadOnlyRegister(offset) => {
                SimulationError::ReadOnlyRegister(base + offset)
            }
            other => other,
        }
    }
}

pub type SimResult<T> = Result<T, SimulationError>;

/// Trait for observing simulation events in a modular way.
pub trait SimulationObserver: std::fmt::Debug + Send + Sync {
    fn on_simulation_start(&self) {}
    fn on_simulation_stop(&self) {}
    fn on_counter_poll(&self, _now: u32) {}
    fn on_led_write(&self, _now: u32, _level: u8) {}
}

/// Trait representing a memory-mapped peripheral
pub trait Peripheral: std::fmt::Debug + Send {
    fn read(&self, offset: u64) -> SimResult<u8>;
    fn write(&mut self, offset: u64, value: u8) -> SimResult<()>;
    fn as_any(&self) -> Option<&dyn std::any::Any> {
        None
    }
    fn as_any_mut(&mut self) -> Option<&mut dyn std::any::Any> {
        None
    }
}

/// Trait representing the system bus
pub trait Bus {
    fn read_u8(&self, addr: u64) -> SimResult<u8>;
    fn write_u8(&mut self, addr: u64, value: u8) -> SimResult<()>;

    fn read_u32(&self, addr: u64) -> SimResult<u32> {
        let b0 = self.read_u8(addr)? as u32;
        let b1 = self.read_u8(addr + 1)? as u32;
        let b2 = self.read_u8(addr + 2)? as u32;
        let b3 = self.read_u8(addr + 3)? as u32;
        // Little Endian
        Ok(b0 | (b1 << 8) | (b2 << 16) | (b3 << 24))
    }

    fn write_u32(&mut self, addr: u64, value: u32) -> SimResult<()> {
        self.write_u8(addr, (value & 0xFF) as u8)?;
        self.write_u8(addr + 1, ((value >> 8) & 0xFF) as u8)?;
        self.write_u8(addr + 2, ((value >> 16) & 0xFF) as u8)?;
        self.write_u8(addr + 3, ((value >> 24) & 0xFF) as u8)?;
        Ok(())
    }
}

/// Host-side board: the simulated bus plus the timing the toggle loop runs with.
pub struct Machine {
    pub bus: Rc<RefCell<bus::SystemBus>>,
    pub board: String,
    pub led_addr: u64,
    pub counter_addr: u64,
    pub interval: u32,
    pub poll_cost: u32,
    pub observers: Vec<Arc<dyn SimulationObserver>>,
}

impl Machine {
    /// The RV32I soft-core with its default memory map.
    pub fn new() -> Self {
        let config = blinky_config::BoardConfig::default();
        Self {
            bus: Rc::new(RefCell::new(bus::SystemBus::new())),
            board: config.name,
            led_addr: config.led_address,
            counter_addr: config.counter_address,
            interval: config.blink_interval_us,
            poll_cost: config.simulation.poll_cost_us,
            observers: Vec::new(),
        }
    }

    pub fn from_config(config: &blinky_config::BoardConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let bus = bus::SystemBus::from_config(config)?;
        bus.set_counter(config.simulation.counter_start);
        Ok(Self {
            bus: Rc::new(RefCell::new(bus)),
            board: config.name.clone(),
            led_addr: config.led_address,
            counter_addr: config.counter_address,
            interval: config.blink_interval_us,
            poll_cost: config.simulation.poll_cost_us,
            observers: Vec::new(),
        })
    }

    /// Switch the LED on, then run `toggles` periods of the toggle loop.
    pub fn run(&mut self, toggles: u64) -> SimResult<SimulationReport> {
        let counter_start = {
            let mut bus = self.bus.borrow_mut();
            bus.led_mut()?.clear_history();
            bus.counter()
        };
        tracing::info!(
            "Running {} toggles on '{}' (interval {}us, poll cost {}us, counter at {:#x})",
            toggles,
            self.board,
            self.interval,
            self.poll_cost,
            counter_start
        );

        for observer in &self.observers {
            observer.on_simulation_start();
        }

        let led = BusLed::new(self.bus.clone(), self.led_addr, self.observers.clone());
        let clock = BusClock::new(
            self.bus.clone(),
            self.counter_addr,
            self.poll_cost.max(1),
            self.observers.clone(),
        );
        let mut blinker = Blinker::new(led, clock, self.interval);

        blinker.start()?;
        for _ in 0..toggles {
            blinker.step()?;
        }
        let (_, clock) = blinker.release();

        for observer in &self.observers {
            observer.on_simulation_stop();
        }

        let bus = self.bus.borrow();
        let trace = bus.led()?.history().to_vec();
        let report = SimulationReport::new(
            self.board.clone(),
            self.interval,
            counter_start,
            bus.counter(),
            clock.polls(),
            trace,
        );
        tracing::info!(
            "Finished after {} polls, counter at {:#x}",
            report.polls,
            report.final_counter
        );
        Ok(report)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
