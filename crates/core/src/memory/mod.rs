// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_addr: u64,
    pub data: Vec<u8>,
}

impl Segment {
    /// First address past the segment, or `None` if it runs off the end of
    /// the address space.
    pub fn end_addr(&self) -> Option<u64> {
        self.start_addr.checked_add(self.data.len() as u64)
    }
}

/// Loadable contents of a firmware image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramImage {
    pub entry_point: u64,
    pub segments: Vec<Segment>,
}

impl ProgramImage {
    pub fn new(entry_point: u64) -> Self {
        Self {
            entry_point,
            segments: Vec::new(),
        }
    }

    pub fn add_segment(&mut self, start_addr: u64, data: Vec<u8>) {
        self.segments.push(Segment { start_addr, data });
    }

    /// Highest address covered by any segment, exclusive.
    /// `None` if some segment runs off the end of the address space.
    pub fn end_addr(&self) -> Option<u64> {
        self.segments
            .iter()
            .try_fold(0, |end, segment| Some(end.max(segment.end_addr()?)))
    }
}

/// A simple flat memory storage
#[derive(Debug)]
pub struct LinearMemory {
    pub data: Vec<u8>,
    pub base_addr: u64,
}

impl LinearMemory {
    pub fn new(size: usize, base_addr: u64) -> Self {
        Self {
            data: vec![0; size],
            base_addr,
        }
    }

    fn index(&self, addr: u64) -> Option<usize> {
        if addr >= self.base_addr && addr < self.mem_end() {
            Some((addr - self.base_addr) as usize)
        } else {
            None
        }
    }

    pub fn read_u8(&self, addr: u64) -> Option<u8> {
        self.index(addr).map(|i| self.data[i])
    }

    pub fn write_u8(&mut self, addr: u64, value: u8) -> bool {
        match self.index(addr) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    fn mem_end(&self) -> u64 {
        self.base_addr.saturating_add(self.data.len() as u64)
    }

    pub fn load_from_segment(&mut self, segment: &Segment) -> bool {
        match segment.end_addr() {
            Some(end) if segment.start_addr >= self.base_addr && end <= self.mem_end() => {
                let offset = (segment.start_addr - self.base_addr) as usize;
                self.data[offset..offset + segment.data.len()].copy_from_slice(&segment.data);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_segment_inside_memory() {
        let mut mem = LinearMemory::new(16, 0x100);
        let segment = Segment {
            start_addr: 0x104,
            data: vec![1, 2, 3, 4],
        };
        assert!(mem.load_from_segment(&segment));
        assert_eq!(mem.read_u8(0x104), Some(1));
        assert_eq!(mem.read_u8(0x107), Some(4));
        assert_eq!(mem.read_u8(0x110), None);
    }

    #[test]
    fn test_load_segment_past_end() {
        let mut mem = LinearMemory::new(8, 0);
        let segment = Segment {
            start_addr: 6,
            data: vec![0xAA; 4],
        };
        assert!(!mem.load_from_segment(&segment));
        assert_eq!(mem.read_u8(6), Some(0));
    }

    #[test]
    fn test_image_end_addr() {
        let mut image = ProgramImage::new(0);
        assert_eq!(image.end_addr(), Some(0));
        image.add_segment(0x10, vec![0; 8]);
        image.add_segment(0x0, vec![0; 4]);
        assert_eq!(image.end_addr(), Some(0x18));
    }

    #[test]
    fn test_segment_past_address_space() {
        let mut image = ProgramImage::new(0);
        image.add_segment(0x10, vec![0; 8]);
        image.add_segment(u64::MAX - 3, vec![0xAA; 8]);
        assert_eq!(image.segments[1].end_addr(), None);
        assert_eq!(image.end_addr(), None);

        let mut mem = LinearMemory::new(16, 0);
        assert!(!mem.load_from_segment(&image.segments[1]));
        assert!(mem.data.iter().all(|&b| b == 0));

        // A segment ending exactly at the top still has an end.
        let top = Segment {
            start_addr: u64::MAX - 3,
            data: vec![0; 3],
        };
        assert_eq!(top.end_addr(), Some(u64::MAX));
    }
}
