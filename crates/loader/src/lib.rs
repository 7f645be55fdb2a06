// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod hex;

use anyhow::{anyhow, Context, Result};
use blinky_core::memory::ProgramImage;
use goblin::elf::program_header::PT_LOAD;
use goblin::elf::Elf;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub use hex::{pad_hex, render_hex, DEFAULT_MEMORY_WORDS};

pub fn load_elf(path: &Path) -> Result<ProgramImage> {
    let buffer = fs::read(path).with_context(|| format!("Failed to read ELF file: {:?}", path))?;
    parse_elf(&buffer)
}

pub fn parse_elf(buffer: &[u8]) -> Result<ProgramImage> {
    let elf = Elf::parse(buffer).context("Failed to parse ELF binary")?;

    if elf.is_64 {
        warn!("ELF is 64-bit; the soft-core only executes RV32I");
    }
    info!("ELF Entry Point: {:#x}", elf.entry);

    let mut program_image = ProgramImage::new(elf.entry);

    for ph in &elf.program_headers {
        if ph.p_type != PT_LOAD {
            continue;
        }
        // Physical address: where the bytes live in the memory image.
        let start_addr = ph.p_paddr;
        let size = ph.p_filesz as usize;
        let offset = ph.p_offset as usize;

        if size == 0 {
            continue;
        }

        debug!(
            "Found Loadable Segment: Addr={:#x}, Size={} bytes, Offset={:#x}",
            start_addr, size, offset
        );

        let end = offset
            .checked_add(size)
            .filter(|&end| end <= buffer.len())
            .ok_or_else(|| anyhow!("Segment out of bounds in ELF file"))?;

        program_image.add_segment(start_addr, buffer[offset..end].to_vec());
    }

    if program_image.segments.is_empty() {
        warn!("No loadable segments found in ELF file");
    }

    Ok(program_image)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal RV32 executable with one 8-byte loadable segment at `paddr`.
    fn tiny_elf(paddr: u32, entry: u32) -> Vec<u8> {
        let mut elf = Vec::new();
        elf.extend_from_slice(&[0x7f, b'E', b'L', b'F', 1, 1, 1, 0]);
        elf.extend_from_slice(&[0; 8]);
        elf.extend_from_slice(&2u16.to_le_bytes()); // ET_EXEC
        elf.extend_from_slice(&0xF3u16.to_le_bytes()); // EM_RISCV
        elf.extend_from_slice(&1u32.to_le_bytes());
        elf.extend_from_slice(&entry.to_le_bytes());
        elf.extend_from_slice(&52u32.to_le_bytes()); // e_phoff
        elf.extend_from_slice(&0u32.to_le_bytes()); // e_shoff
        elf.extend_from_slice(&0u32.to_le_bytes()); // e_flags
        elf.extend_from_slice(&52u16.to_le_bytes()); // e_ehsize
        elf.extend_from_slice(&32u16.to_le_bytes()); // e_phentsize
        elf.extend_from_slice(&1u16.to_le_bytes()); // e_phnum
        elf.extend_from_slice(&40u16.to_le_bytes()); // e_shentsize
        elf.extend_from_slice(&0u16.to_le_bytes()); // e_shnum
        elf.extend_from_slice(&0u16.to_le_bytes()); // e_shstrndx

        elf.extend_from_slice(&PT_LOAD.to_le_bytes());
        elf.extend_from_slice(&84u32.to_le_bytes()); // p_offset
        elf.extend_from_slice(&paddr.to_le_bytes()); // p_vaddr
        elf.extend_from_slice(&paddr.to_le_bytes()); // p_paddr
        elf.extend_from_slice(&8u32.to_le_bytes()); // p_filesz
        elf.extend_from_slice(&8u32.to_le_bytes()); // p_memsz
        elf.extend_from_slice(&5u32.to_le_bytes()); // R+X
        elf.extend_from_slice(&4u32.to_le_bytes());

        // li a0, 255 ; j .
        elf.extend_from_slice(&0x0ff0_0513u32.to_le_bytes());
        elf.extend_from_slice(&0x0000_006fu32.to_le_bytes());
        elf
    }

    #[test]
    fn test_parse_loadable_segment() {
        let image = parse_elf(&tiny_elf(0x10, 0x10)).unwrap();

        assert_eq!(image.entry_point, 0x10);
        assert_eq!(image.segments.len(), 1);
        assert_eq!(image.segments[0].start_addr, 0x10);
        assert_eq!(
            image.segments[0].data,
            vec![0x13, 0x05, 0xf0, 0x0f, 0x6f, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_truncated_segment() {
        let mut elf = tiny_elf(0, 0);
        elf.truncate(elf.len() - 4);
        assert!(parse_elf(&elf).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = parse_elf(b"definitely not an elf").unwrap_err();
        assert!(err.to_string().contains("Failed to parse ELF"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_elf(Path::new("does/not/exist.elf")).unwrap_err();
        assert!(err.to_string().contains("Failed to read ELF file"));
    }
}
