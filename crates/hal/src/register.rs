// Blinky - Bare-metal LED Toggle
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Typed memory-mapped registers.
//!
//! A [`Reg`] is bound to one fixed address for its whole life. Every
//! `read`/`write` is exactly one volatile access, so the compiler can neither
//! cache a value across polls nor merge or reorder the accesses.

use core::marker::PhantomData;
use core::ptr;

/// Access marker: the register can only be read.
#[derive(Debug)]
pub struct ReadOnly;

/// Access marker: the register can only be written.
#[derive(Debug)]
pub struct WriteOnly;

/// Access marker: the register can be read and written.
#[derive(Debug)]
pub struct ReadWrite;

pub trait Readable {}
pub trait Writable {}

impl Readable for ReadOnly {}
impl Readable for ReadWrite {}
impl Writable for WriteOnly {}
impl Writable for ReadWrite {}

pub struct Reg<T, A> {
    addr: usize,
    _marker: PhantomData<(*mut T, A)>,
}

impl<T: Copy, A> Reg<T, A> {
    /// Bind a register to `addr`.
    ///
    /// # Safety
    ///
    /// `addr` must be a register (or memory) that is valid and suitably
    /// aligned for `T` for as long as the returned value exists, and no other
    /// code may access it concurrently.
    pub const unsafe fn new(addr: usize) -> Self {
        Self {
            addr,
            _marker: PhantomData,
        }
    }

    pub const fn addr(&self) -> usize {
        self.addr
    }
}

impl<T: Copy, A: Readable> Reg<T, A> {
    #[inline(always)]
    pub fn read(&self) -> T {
        // SAFETY: upheld by the contract of `Reg::new`.
        unsafe { ptr::read_volatile(self.addr as *const T) }
    }
}

impl<T: Copy, A: Writable> Reg<T, A> {
    #[inline(always)]
    pub fn write(&mut self, value: T) {
        // SAFETY: upheld by the contract of `Reg::new`.
        unsafe { ptr::write_volatile(self.addr as *mut T, value) }
    }
}

impl<T, A> core::fmt::Debug for Reg<T, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reg")
            .field("addr", &format_args!("{:#x}", self.addr))
            .finish()
    }
}
