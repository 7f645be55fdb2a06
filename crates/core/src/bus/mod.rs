// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::memory::LinearMemory;
use crate::peripherals::{Led, MicrosCounter, SimClock};
use crate::{Peripheral, SimResult, SimulationError};
use blinky_config::BoardConfig;

#[derive(Debug)]
pub struct PeripheralEntry {
    pub name: String,
    pub base: u64,
    pub size: u64,
    pub dev: Box<dyn Peripheral>,
}

impl PeripheralEntry {
    fn contains(&self, addr: u64) -> bool {
        addr >= self.base && addr < self.base + self.size
    }
}

pub struct SystemBus {
    pub ram: LinearMemory,
    pub peripherals: Vec<PeripheralEntry>,
    clock: SimClock,
}

impl SystemBus {
    /// Soft-core memory map: 8 KiB of RAM at 0, counter and LED at the top of
    /// the address space.
    pub fn new() -> Self {
        let board = BoardConfig::default();
        Self::with_map(
            LinearMemory::new(blinky_hal::memory_map::RAM_WORDS * 4, 0),
            board.led_address,
            board.counter_address,
        )
    }

    pub fn from_config(config: &BoardConfig) -> anyhow::Result<Self> {
        let ram_size = config.ram_size()?;
        tracing::debug!(
            "Mapping '{}': RAM {:#x}+{:#x}, LED {:#x}, counter {:#x}",
            config.name,
            config.ram.base,
            ram_size,
            config.led_address,
            config.counter_address
        );
        Ok(Self::with_map(
            LinearMemory::new(ram_size as usize, config.ram.base),
            config.led_address,
            config.counter_address,
        ))
    }

    fn with_map(ram: LinearMemory, led_addr: u64, counter_addr: u64) -> Self {
        let clock = SimClock::default();
        let peripherals = vec![
            PeripheralEntry {
                name: "led".to_string(),
                base: led_addr,
                size: blinky_config::LED_WIDTH,
                dev: Box::new(Led::new(clock.clone())),
            },
            PeripheralEntry {
                name: "counter".to_string(),
                base: counter_addr,
                size: blinky_config::COUNTER_WIDTH,
                dev: Box::new(MicrosCounter::new(clock.clone())),
            },
        ];
        Self {
            ram,
            peripherals,
            clock,
        }
    }

    pub fn counter(&self) -> u32 {
        self.clock.now()
    }

    pub fn set_counter(&self, ticks: u32) {
        self.clock.set(ticks);
    }

    /// Let `ticks` microseconds pass.
    pub fn advance(&self, ticks: u32) {
        self.clock.advance(ticks);
    }

    pub fn led(&self) -> SimResult<&Led> {
        self.peripherals
            .iter()
            .find(|p| p.name == "led")
            .and_then(|p| p.dev.as_any())
            .and_then(|any| any.downcast_ref::<Led>())
            .ok_or_else(|| SimulationError::MissingPeripheral("led".to_string()))
    }

    pub fn led_mut(&mut self) -> SimResult<&mut Led> {
        self.peripherals
            .iter_mut()
            .find(|p| p.name == "led")
            .and_then(|p| p.dev.as_any_mut())
            .and_then(|any| any.downcast_mut::<Led>())
            .ok_or_else(|| SimulationError::MissingPeripheral("led".to_string()))
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::Bus for SystemBus {
    fn read_u8(&self, addr: u64) -> SimResult<u8> {
        if let Some(byte) = self.ram.read_u8(addr) {
            return Ok(byte);
        }
        if let Some(p) = self.peripherals.iter().find(|p| p.contains(addr)) {
            return p.dev.read(addr - p.base).map_err(|e| e.relocate(p.base));
        }
        Err(SimulationError::MemoryViolation(addr))
    }

    fn write_u8(&mut self, addr: u64, value: u8) -> SimResult<()> {
        if self.ram.write_u8(addr, value) {
            return Ok(());
        }
        if let Some(p) = self.peripherals.iter_mut().find(|p| p.contains(addr)) {
            return p
                .dev
                .write(addr - p.base, value)
                .map_err(|e| e.relocate(p.base));
        }
        Err(SimulationError::MemoryViolation(addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bus;

    #[test]
    fn test_default_map() {
        let mut bus = SystemBus::new();
        bus.set_counter(0xCAFE_F00D);

        assert_eq!(bus.read_u32(0xFFFF_FFF4).unwrap(), 0xCAFE_F00D);
        bus.write_u8(0xFFFF_FFFF, 255).unwrap();
        assert_eq!(bus.led().unwrap().level(), 255);
        assert_eq!(bus.read_u8(0xFFFF_FFFF).unwrap(), 255);
    }

    #[test]
    fn test_ram_round_trip() {
        let mut bus = SystemBus::new();
        bus.write_u32(0x1FFC, 0xDEAD_BEEF).unwrap();
        assert_eq!(bus.read_u32(0x1FFC).unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn test_unmapped_access() {
        let mut bus = SystemBus::new();
        assert_eq!(
            bus.read_u8(0x2000),
            Err(SimulationError::MemoryViolation(0x2000))
        );
        assert_eq!(
            bus.write_u8(0xFFFF_FFF0, 1),
            Err(SimulationError::MemoryViolation(0xFFFF_FFF0))
        );
    }

    #[test]
    fn test_counter_write_is_rejected_at_bus_address() {
        let mut bus = SystemBus::new();
        assert_eq!(
            bus.write_u32(0xFFFF_FFF4, 0),
            Err(SimulationError::ReadOnlyRegister(0xFFFF_FFF4))
        );
    }

    #[test]
    fn test_from_config_moves_registers() {
        let config = BoardConfig {
            led_address: 0x4000_0000,
            counter_address: 0x4000_0010,
            ..BoardConfig::default()
        };
        let mut bus = SystemBus::from_config(&config).unwrap();
        bus.write_u8(0x4000_0000, 255).unwrap();
        bus.advance(42);
        assert_eq!(bus.read_u32(0x4000_0010).unwrap(), 42);
        assert!(bus.write_u8(0xFFFF_FFFF, 255).is_err());
    }
}
