// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

/// A reading of the 32-bit microsecond counter.
///
/// The counter wraps at 2^32, so ordering is serial-number ordering: `a` is
/// before `b` when `a - b` (mod 2^32) is negative as an `i32`. This stays
/// correct across the wrap as long as the two readings are less than 2^31
/// ticks apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Micros(pub u32);

impl Micros {
    pub const fn ticks(self) -> u32 {
        self.0
    }

    pub const fn wrapping_add(self, ticks: u32) -> Self {
        Self(self.0.wrapping_add(ticks))
    }

    pub const fn is_before(self, other: Self) -> bool {
        (self.0.wrapping_sub(other.0) as i32) < 0
    }

    pub const fn has_reached(self, target: Self) -> bool {
        !self.is_before(target)
    }

    /// Ticks elapsed from `earlier` to `self`.
    pub const fn ticks_since(self, earlier: Self) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }
}

impl From<u32> for Micros {
    fn from(ticks: u32) -> Self {
        Self(ticks)
    }
}
