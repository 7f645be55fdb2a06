// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use blinky_hal::{Level, Micros};
use serde::{Deserialize, Serialize};

pub use crate::peripherals::LedEvent;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyViolation {
    #[error("LED was never switched on")]
    NeverStarted,
    #[error("first LED write was {0}, expected 255")]
    StartedOff(u8),
    #[error("LED write #{index} stored {value}, expected 0 or 255")]
    InvalidLevel { index: usize, value: u8 },
    #[error("LED write #{index} repeated level {value} instead of toggling")]
    NotAlternating { index: usize, value: u8 },
    #[error("LED write #{index} came {ticks} ticks after the previous one, interval is {interval}")]
    ShortInterval {
        index: usize,
        ticks: u32,
        interval: u32,
    },
}

/// Outcome of a simulated run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub board: String,
    pub interval_us: u32,
    pub counter_start: u32,
    pub final_counter: u32,
    pub toggles: u64,
    pub polls: u64,
    pub min_interval: Option<u32>,
    pub max_interval: Option<u32>,
    pub trace: Vec<LedEvent>,
}

impl SimulationReport {
    pub fn new(
        board: String,
        interval_us: u32,
        counter_start: u32,
        final_counter: u32,
        polls: u64,
        trace: Vec<LedEvent>,
    ) -> Self {
        let gaps = trace
            .windows(2)
            .map(|pair| Micros(pair[1].at).ticks_since(Micros(pair[0].at)));
        let min_interval = gaps.clone().min();
        let max_interval = gaps.max();

        Self {
            board,
            interval_us,
            counter_start,
            final_counter,
            toggles: trace.len().saturating_sub(1) as u64,
            polls,
            min_interval,
            max_interval,
            trace,
        }
    }

    /// Check the recorded trace: the LED starts on, only ever holds 0 or 255,
    /// strictly alternates, and no toggle comes sooner than the interval.
    pub fn verify(&self) -> Result<(), PropertyViolation> {
        let first = self.trace.first().ok_or(PropertyViolation::NeverStarted)?;
        if first.level != Level::On.value() {
            return Err(PropertyViolation::StartedOff(first.level));
        }

        for (index, event) in self.trace.iter().enumerate() {
            if event.level != Level::On.value() && event.level != Level::Off.value() {
                return Err(PropertyViolation::InvalidLevel {
                    index,
                    value: event.level,
                });
            }
        }

        for (i, pair) in self.trace.windows(2).enumerate() {
            let index = i + 1;
            if pair[1].level == pair[0].level {
                return Err(PropertyViolation::NotAlternating {
                    index,
                    value: pair[1].level,
                });
            }
            let ticks = Micros(pair[1].at).ticks_since(Micros(pair[0].at));
            if ticks < self.interval_us {
                return Err(PropertyViolation::ShortInterval {
                    index,
                    ticks,
                    interval: self.interval_us,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(trace: &[(u32, u8)]) -> SimulationReport {
        let trace = trace
            .iter()
            .map(|&(at, level)| LedEvent { at, level })
            .collect();
        SimulationReport::new("test".to_string(), 10, 0, 0, 0, trace)
    }

    #[test]
    fn test_good_trace() {
        let r = report(&[(0, 255), (11, 0), (22, 255), (40, 0)]);
        assert_eq!(r.verify(), Ok(()));
        assert_eq!(r.toggles, 3);
        assert_eq!(r.min_interval, Some(11));
        assert_eq!(r.max_interval, Some(18));
    }

    #[test]
    fn test_interval_across_wrap() {
        let r = report(&[(u32::MAX - 4, 255), (6, 0)]);
        assert_eq!(r.verify(), Ok(()));
        assert_eq!(r.min_interval, Some(11));
    }

    #[test]
    fn test_empty_trace() {
        assert_eq!(report(&[]).verify(), Err(PropertyViolation::NeverStarted));
    }

    #[test]
    fn test_started_off() {
        assert_eq!(
            report(&[(0, 0), (10, 255)]).verify(),
            Err(PropertyViolation::StartedOff(0))
        );
    }

    #[test]
    fn test_invalid_level() {
        assert_eq!(
            report(&[(0, 255), (10, 128)]).verify(),
            Err(PropertyViolation::InvalidLevel {
                index: 1,
                value: 128
            })
        );
    }

    #[test]
    fn test_repeated_level() {
        assert_eq!(
            report(&[(0, 255), (10, 0), (20, 0)]).verify(),
            Err(PropertyViolation::NotAlternating { index: 2, value: 0 })
        );
    }

    #[test]
    fn test_short_interval() {
        assert_eq!(
            report(&[(0, 255), (9, 0)]).verify(),
            Err(PropertyViolation::ShortInterval {
                index: 1,
                ticks: 9,
                interval: 10
            })
        );
    }
}
