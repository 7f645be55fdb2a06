// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::SimulationObserver;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Marks `last_write` as empty; counter values only use the low 32 bits.
const NO_WRITE: u64 = u64::MAX;

#[derive(Debug)]
pub struct ToggleMetrics {
    led_writes: AtomicU64,
    poll_count: AtomicU64,
    last_write: AtomicU64,
    min_interval: AtomicU64,
    max_interval: AtomicU64,
    start_time: Instant,
}

impl Default for ToggleMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ToggleMetrics {
    pub fn new() -> Self {
        Self {
            led_writes: AtomicU64::new(0),
            poll_count: AtomicU64::new(0),
            last_write: AtomicU64::new(NO_WRITE),
            min_interval: AtomicU64::new(u64::MAX),
            max_interval: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn reset(&self) {
        self.led_writes.store(0, Ordering::SeqCst);
        self.poll_count.store(0, Ordering::SeqCst);
        self.last_write.store(NO_WRITE, Ordering::SeqCst);
        self.min_interval.store(u64::MAX, Ordering::SeqCst);
        self.max_interval.store(0, Ordering::SeqCst);
    }

    pub fn get_led_writes(&self) -> u64 {
        self.led_writes.load(Ordering::SeqCst)
    }

    pub fn get_polls(&self) -> u64 {
        self.poll_count.load(Ordering::SeqCst)
    }

    /// Shortest gap between consecutive LED writes, in counter ticks.
    pub fn get_min_interval(&self) -> Option<u32> {
        match self.min_interval.load(Ordering::SeqCst) {
            u64::MAX => None,
            ticks => Some(ticks as u32),
        }
    }

    pub fn get_max_interval(&self) -> Option<u32> {
        self.get_min_interval()
            .map(|_| self.max_interval.load(Ordering::SeqCst) as u32)
    }

    /// Average counter polls per toggle; the initial switch-on is not a toggle.
    pub fn get_polls_per_toggle(&self) -> f64 {
        let toggles = self.get_led_writes().saturating_sub(1);
        if toggles > 0 {
            self.get_polls() as f64 / toggles as f64
        } else {
            0.0
        }
    }

    /// Host polls per wall-clock second.
    pub fn get_polls_per_sec(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.get_polls() as f64 / elapsed
        } else {
            0.0
        }
    }
}

impl SimulationObserver for ToggleMetrics {
    fn on_simulation_start(&self) {
        // Intervals never span two runs.
        self.last_write.store(NO_WRITE, Ordering::SeqCst);
    }

    fn on_counter_poll(&self, _now: u32) {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_led_write(&self, now: u32, _level: u8) {
        self.led_writes.fetch_add(1, Ordering::SeqCst);

        let previous = self.last_write.swap(now as u64, Ordering::SeqCst);
        if previous != NO_WRITE {
            let ticks = now.wrapping_sub(previous as u32) as u64;
            self.min_interval.fetch_min(ticks, Ordering::SeqCst);
            self.max_interval.fetch_max(ticks, Ordering::SeqCst);
        }
    }
}
