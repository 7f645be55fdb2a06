// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! `$readmemh` memory images: one 32-bit word per line, eight hex digits,
//! word 0 at address 0.

use anyhow::{bail, Result};
use blinky_core::memory::{LinearMemory, ProgramImage};
use std::fmt::Write;
use tracing::debug;

/// Size of the soft-core's unified memory, in words.
pub const DEFAULT_MEMORY_WORDS: usize = blinky_hal::memory_map::RAM_WORDS;

const ZERO_WORD: &str = "00000000";

/// Largest memory the 32-bit bus can address, in bytes.
const BUS_BYTES: u64 = 1 << 32;

/// Lay `image` out in a memory of `words` words and render it, one line per word.
pub fn render_hex(image: &ProgramImage, words: usize) -> Result<String> {
    let bytes = match words.checked_mul(4) {
        Some(bytes) if bytes as u64 <= BUS_BYTES => bytes,
        _ => bail!("A {}-word memory does not fit the 32-bit bus", words),
    };
    let mut memory = LinearMemory::new(bytes, 0);

    for segment in &image.segments {
        if !memory.load_from_segment(segment) {
            bail!(
                "Segment of {} bytes at {:#x} does not fit in a {}-word memory",
                segment.data.len(),
                segment.start_addr,
                words
            );
        }
        debug!(
            "Placed {} bytes at {:#x}",
            segment.data.len(),
            segment.start_addr
        );
    }

    let mut out = String::with_capacity(words.saturating_mul(ZERO_WORD.len() + 1));
    for chunk in memory.data.chunks_exact(4) {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{:08x}", word);
    }
    Ok(out)
}

/// Append zero words until `text` holds `words` lines.
/// Images already at or past that size are returned unchanged.
pub fn pad_hex(text: &str, words: usize) -> String {
    let current = text.lines().count();
    if current >= words {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + (words - current) * (ZERO_WORD.len() + 1));
    out.push_str(text);
    if !text.is_empty() && !text.ends_with('\n') {
        out.push('\n');
    }
    for _ in current..words {
        out.push_str(ZERO_WORD);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_places_words_little_endian() {
        let mut image = ProgramImage::new(0);
        image.add_segment(0, vec![0x13, 0x05, 0xf0, 0x0f]);
        image.add_segment(8, vec![0xef, 0xbe, 0xad, 0xde]);

        let hex = render_hex(&image, 4).unwrap();
        assert_eq!(hex, "0ff00513\n00000000\ndeadbeef\n00000000\n");
    }

    #[test]
    fn test_render_default_size() {
        let image = ProgramImage::new(0);
        let hex = render_hex(&image, DEFAULT_MEMORY_WORDS).unwrap();
        assert_eq!(hex.lines().count(), 2048);
        assert!(hex.lines().all(|l| l == ZERO_WORD));
    }

    #[test]
    fn test_render_rejects_oversized_image() {
        let mut image = ProgramImage::new(0);
        image.add_segment(12, vec![0; 8]);
        let err = render_hex(&image, 4).unwrap_err();
        assert!(err.to_string().contains("does not fit"));
    }

    #[test]
    fn test_render_rejects_segment_past_address_space() {
        let mut image = ProgramImage::new(0);
        image.add_segment(u64::MAX - 3, vec![0; 8]);
        let err = render_hex(&image, 4).unwrap_err();
        assert!(err.to_string().contains("does not fit"));
    }

    #[test]
    fn test_render_rejects_unaddressable_memory() {
        let image = ProgramImage::new(0);
        for words in [usize::MAX, usize::MAX / 4 + 1] {
            let err = render_hex(&image, words).unwrap_err();
            assert!(err.to_string().contains("does not fit the 32-bit bus"));
        }
    }

    #[test]
    fn test_pad_short_image() {
        let padded = pad_hex("0ff00513\n0000006f\n", 4);
        assert_eq!(padded, "0ff00513\n0000006f\n00000000\n00000000\n");
    }

    #[test]
    fn test_pad_missing_trailing_newline() {
        let padded = pad_hex("0ff00513", 2);
        assert_eq!(padded, "0ff00513\n00000000\n");
    }

    #[test]
    fn test_pad_full_image_untouched() {
        let text = "00000001\n00000002\n00000003";
        assert_eq!(pad_hex(text, 3), text);
        assert_eq!(pad_hex(text, 2), text);
    }

    #[test]
    fn test_pad_empty_image() {
        assert_eq!(pad_hex("", 2), "00000000\n00000000\n");
    }
}
