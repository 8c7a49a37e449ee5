//! Guest linear-memory access.
//!
//! The host functions never see native pointers. Guests pass `u32` offsets
//! into their own linear memory and every access goes through
//! [`GuestMemory`], which bounds-checks the range before touching it.
//!
//! In production the memory is the slice wasmtime hands out for the
//! guest's `memory` export ([`SliceMemory`] over `Memory::data_mut`). Unit
//! tests use the same type over a plain `Vec<u8>`.

use crate::error::{HttpError, HttpResult};

/// The three primitives the sandbox runtime provides.
pub trait GuestMemory {
    /// Borrow `len` bytes starting at `ptr`.
    fn read_bytes(&self, ptr: u32, len: u32) -> HttpResult<&[u8]>;

    /// Write `data` at `ptr`, refusing anything larger than `capacity`.
    fn write_bytes(&mut self, ptr: u32, capacity: u32, data: &[u8]) -> HttpResult<()>;

    /// Write a little-endian 32-bit integer at `ptr`.
    fn write_u32(&mut self, ptr: u32, value: u32) -> HttpResult<()>;

    /// Borrow `len` bytes at `ptr` as UTF-8. `what` names the argument in errors.
    fn read_str(&self, ptr: u32, len: u32, what: &'static str) -> HttpResult<&str> {
        let bytes = self.read_bytes(ptr, len)?;
        std::str::from_utf8(bytes).map_err(|_| HttpError::Utf8(what))
    }
}

/// [`GuestMemory`] over a borrowed byte slice.
pub struct SliceMemory<'a> {
    data: &'a mut [u8],
}

impl<'a> SliceMemory<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data }
    }

    fn range(&self, ptr: u32, len: usize) -> HttpResult<std::ops::Range<usize>> {
        let start = ptr as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(start..end),
            _ => Err(HttpError::MemoryAccess(format!(
                "{len} bytes at {ptr} exceeds memory size {}",
                self.data.len()
            ))),
        }
    }
}

impl GuestMemory for SliceMemory<'_> {
    fn read_bytes(&self, ptr: u32, len: u32) -> HttpResult<&[u8]> {
        let range = self.range(ptr, len as usize)?;
        Ok(&self.data[range])
    }

    fn write_bytes(&mut self, ptr: u32, capacity: u32, data: &[u8]) -> HttpResult<()> {
        if data.len() > capacity as usize {
            return Err(HttpError::BufferTooSmall {
                needed: data.len(),
                capacity: capacity as usize,
            });
        }
        let range = self.range(ptr, data.len())?;
        self.data[range].copy_from_slice(data);
        Ok(())
    }

    fn write_u32(&mut self, ptr: u32, value: u32) -> HttpResult<()> {
        let range = self.range(ptr, 4)?;
        self.data[range].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }
}
