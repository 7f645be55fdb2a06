// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use blinky_hal::memory_map::{COUNTER_ADDR, LED_ADDR, RAM_WORDS};
use blinky_hal::BLINK_INTERVAL_US;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

/// Width of the LED register in bytes.
pub const LED_WIDTH: u64 = 1;
/// Width of the microsecond counter in bytes.
pub const COUNTER_WIDTH: u64 = 4;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MemoryRange {
    pub base: u64,
    pub size: String, // e.g. "8KiB"
}

/// Memory map and timing of the board the toggle loop runs on.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    pub name: String,
    #[serde(default = "default_ram")]
    pub ram: MemoryRange,
    #[serde(default = "default_led_address")]
    pub led_address: u64,
    #[serde(default = "default_counter_address")]
    pub counter_address: u64,
    #[serde(default = "default_blink_interval")]
    pub blink_interval_us: u32,
    #[serde(default)]
    pub simulation: SimulationLimits,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SimulationLimits {
    /// Number of toggles to run after the LED is switched on.
    pub toggles: u64,
    /// Counter value at power-on.
    pub counter_start: u32,
    /// Counter ticks that elapse per poll of the counter.
    pub poll_cost_us: u32,
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            toggles: 16,
            counter_start: 0,
            poll_cost_us: 1,
        }
    }
}

fn default_ram() -> MemoryRange {
    MemoryRange {
        base: 0,
        size: format!("{}KiB", RAM_WORDS * 4 / 1024),
    }
}

fn default_led_address() -> u64 {
    LED_ADDR as u64
}

fn default_counter_address() -> u64 {
    COUNTER_ADDR as u64
}

fn default_blink_interval() -> u32 {
    BLINK_INTERVAL_US
}

impl Default for BoardConfig {
    /// The RV32I soft-core the firmware is built for.
    fn default() -> Self {
        Self {
            name: "rv32i-soft-core".to_string(),
            ram: default_ram(),
            led_address: default_led_address(),
            counter_address: default_counter_address(),
            blink_interval_us: default_blink_interval(),
            simulation: SimulationLimits::default(),
        }
    }
}

impl BoardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open board descriptor at {:?}", path.as_ref()))?;
        let board: Self =
            serde_yaml::from_reader(f).context("Failed to parse Board Descriptor")?;
        board.validate()?;
        Ok(board)
    }

    pub fn ram_size(&self) -> Result<u64> {
        parse_size(&self.ram.size)
    }

    pub fn led_range(&self) -> Range<u64> {
        self.led_address..self.led_address.saturating_add(LED_WIDTH)
    }

    pub fn counter_range(&self) -> Range<u64> {
        self.counter_address..self.counter_address.saturating_add(COUNTER_WIDTH)
    }

    pub fn validate(&self) -> Result<()> {
        const BUS_END: u64 = 1 << 32;

        if self.blink_interval_us == 0 {
            anyhow::bail!("'blink_interval_us' must be greater than zero");
        }
        if self.blink_interval_us > i32::MAX as u32 {
            anyhow::bail!(
                "'blink_interval_us' of {} does not fit the counter's wrap window",
                self.blink_interval_us
            );
        }
        if self.counter_address % COUNTER_WIDTH != 0 {
            anyhow::bail!(
                "'counter_address' {:#x} is not aligned to {} bytes",
                self.counter_address,
                COUNTER_WIDTH
            );
        }

        let ram = self.ram.base..self.ram.base.saturating_add(self.ram_size()?);
        let regions = [
            ("ram", ram),
            ("led", self.led_range()),
            ("counter", self.counter_range()),
        ];
        for (name, range) in &regions {
            if range.end > BUS_END {
                anyhow::bail!("Region '{}' ends at {:#x}, past the 32-bit bus", name, range.end);
            }
        }
        for (i, (a_name, a)) in regions.iter().enumerate() {
            for (b_name, b) in &regions[i + 1..] {
                if a.start < b.end && b.start < a.end {
                    anyhow::bail!("Region '{}' overlaps region '{}'", a_name, b_name);
                }
            }
        }

        self.simulation.validate()?;

        // The final poll of a wait can land up to one poll cost past the
        // target, which must still order after it.
        let overshoot = self.blink_interval_us as u64 + self.simulation.poll_cost_us as u64;
        if overshoot > i32::MAX as u64 {
            anyhow::bail!(
                "'blink_interval_us' {} plus 'poll_cost_us' {} does not fit the counter's wrap window",
                self.blink_interval_us,
                self.simulation.poll_cost_us
            );
        }
        Ok(())
    }
}

impl SimulationLimits {
    pub fn validate(&self) -> Result<()> {
        if self.poll_cost_us == 0 {
            anyhow::bail!("'poll_cost_us' must be greater than zero or the counter never advances");
        }
        if self.poll_cost_us > i32::MAX as u32 {
            anyhow::bail!(
                "'poll_cost_us' of {} does not fit the counter's wrap window",
                self.poll_cost_us
            );
        }
        Ok(())
    }
}

pub fn parse_size(size_str: &str) -> Result<u64> {
    use human_size::{Byte, Size, SpecificSize};
    let s: Size = size_str
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid size format: {}", e))?;
    let bytes: SpecificSize<Byte> = s.into();
    Ok(bytes.value() as u64)
}
