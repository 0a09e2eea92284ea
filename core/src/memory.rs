//! Bounded views over module linear memory
//!
//! A [`MemoryView`] borrows the memory bytes, so the borrow checker already
//! rules out keeping one alive across anything that needs the store mutably
//! (calling back into the module, which may grow and move the memory). Views
//! are rebuilt at every point of use.
//!
//! All multi-byte reads are little-endian, matching the wasm32 target.

use anyhow::Result;
use byteorder::{ByteOrder, LittleEndian};
use wasmtime::{AsContext, Caller, Memory};

use crate::error::BridgeError;
use crate::gl::GlApi;
use crate::wasm::BridgeContext;

/// Bounds-checked window into linear memory
#[derive(Debug, Clone, Copy)]
pub struct MemoryView<'a> {
    bytes: &'a [u8],
    /// Address of `bytes[0]` in linear memory
    base: u64,
}

impl<'a> MemoryView<'a> {
    /// View covering the whole of linear memory
    pub fn new(memory: &'a [u8]) -> Self {
        Self {
            bytes: memory,
            base: 0,
        }
    }

    /// Sub-window of `len` bytes starting `offset` bytes into this view
    pub fn window(&self, offset: u32, len: u32) -> Result<MemoryView<'a>, BridgeError> {
        let start = offset as usize;
        let end = start
            .checked_add(len as usize)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| self.out_of_bounds(offset as u64, len as u64))?;
        Ok(Self {
            bytes: &self.bytes[start..end],
            base: self.base + offset as u64,
        })
    }

    /// Sub-window from `offset` to the end of this view
    pub fn tail(&self, offset: u32) -> Result<MemoryView<'a>, BridgeError> {
        let start = offset as usize;
        if start > self.bytes.len() {
            return Err(self.out_of_bounds(offset as u64, 0));
        }
        Ok(Self {
            bytes: &self.bytes[start..],
            base: self.base + offset as u64,
        })
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Linear memory address of the first byte
    pub fn address(&self) -> u64 {
        self.base
    }

    pub fn read_u8(&self, at: u32) -> Result<u8, BridgeError> {
        Ok(self.window(at, 1)?.bytes[0])
    }

    pub fn read_u32(&self, at: u32) -> Result<u32, BridgeError> {
        Ok(LittleEndian::read_u32(self.window(at, 4)?.bytes))
    }

    pub fn read_i32(&self, at: u32) -> Result<i32, BridgeError> {
        Ok(LittleEndian::read_i32(self.window(at, 4)?.bytes))
    }

    pub fn read_f64(&self, at: u32) -> Result<f64, BridgeError> {
        Ok(LittleEndian::read_f64(self.window(at, 8)?.bytes))
    }

    /// Decode the whole view as UTF-8, replacing invalid sequences
    pub fn decode_utf8(&self) -> String {
        String::from_utf8_lossy(self.bytes).into_owned()
    }

    /// Length of the NUL-terminated string starting at `offset`
    ///
    /// A string with no terminator before the end of the view is out of
    /// bounds.
    pub fn c_str_len(&self, offset: u32) -> Result<u32, BridgeError> {
        let tail = self.tail(offset)?;
        tail.bytes
            .iter()
            .position(|&b| b == 0)
            .map(|len| len as u32)
            .ok_or_else(|| self.out_of_bounds(offset as u64, tail.len() as u64 + 1))
    }

    fn out_of_bounds(&self, offset: u64, len: u64) -> BridgeError {
        BridgeError::OutOfBounds {
            offset: self.base + offset,
            len,
            size: self.base + self.bytes.len() as u64,
        }
    }
}

// ============================================================================
// Store-level accessors
// ============================================================================

/// Linear memory of the module the caller belongs to
pub fn linear_memory<G: GlApi>(caller: &Caller<'_, BridgeContext<G>>) -> Result<Memory> {
    Ok(caller.data().memory.ok_or(BridgeError::MissingMemory)?)
}

/// Copy `len` bytes at `offset` out of linear memory
pub fn read_bytes(memory: Memory, store: impl AsContext, offset: u32, len: u32) -> Result<Vec<u8>> {
    let view = MemoryView::new(memory.data(&store));
    Ok(view.window(offset, len)?.bytes().to_vec())
}

/// Decode `len` bytes at `offset` as UTF-8
pub fn decode_utf8<G: GlApi>(
    caller: &Caller<'_, BridgeContext<G>>,
    offset: u32,
    len: u32,
) -> Result<String> {
    let memory = linear_memory(caller)?;
    let view = MemoryView::new(memory.data(caller));
    Ok(view.window(offset, len)?.decode_utf8())
}

/// Length of the NUL-terminated string at `offset`
///
/// Asks the module's own `strlen` when it exports one. Otherwise the host
/// scans for the terminator.
pub fn c_str_len<G: GlApi>(caller: &mut Caller<'_, BridgeContext<G>>, offset: u32) -> Result<u32> {
    if let Some(strlen) = caller.data().strlen.clone() {
        return strlen.call(&mut *caller, offset);
    }
    let memory = linear_memory(caller)?;
    Ok(MemoryView::new(memory.data(&*caller)).c_str_len(offset)?)
}

/// Decode the NUL-terminated string at `offset`
pub fn decode_cstring<G: GlApi>(caller: &mut Caller<'_, BridgeContext<G>>, offset: u32) -> Result<String> {
    let len = c_str_len(caller, offset)?;
    decode_utf8(caller, offset, len)
}

/// Write `bytes` into linear memory at `offset`
pub fn write_bytes<G: GlApi>(
    caller: &mut Caller<'_, BridgeContext<G>>,
    offset: u32,
    bytes: &[u8],
) -> Result<()> {
    let memory = linear_memory(caller)?;
    memory
        .write(&mut *caller, offset as usize, bytes)
        .map_err(|_| BridgeError::OutOfBounds {
            offset: offset as u64,
            len: bytes.len() as u64,
            size: memory.data_size(&*caller) as u64,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_with(offset: usize, bytes: &[u8], size: usize) -> Vec<u8> {
        let mut memory = vec![0xAAu8; size];
        memory[offset..offset + bytes.len()].copy_from_slice(bytes);
        memory
    }

    #[test]
    fn test_window_reads_exact_bytes() {
        let memory = memory_with(8, &[1, 2, 3, 4], 32);
        let view = MemoryView::new(&memory).window(8, 4).unwrap();
        assert_eq!(view.bytes(), &[1, 2, 3, 4]);
        assert_eq!(view.address(), 8);
    }

    #[test]
    fn test_window_never_sees_outside_bytes() {
        let memory = memory_with(8, &[1, 2, 3, 4], 32);
        let view = MemoryView::new(&memory).window(8, 4).unwrap();
        assert!(view.read_u8(4).is_err());
        assert!(view.read_u32(1).is_err());
        assert!(view.window(2, 3).is_err());
        assert!(view.window(0, 4).is_ok());
    }

    #[test]
    fn test_out_of_bounds_reports_absolute_addresses() {
        let memory = vec![0u8; 16];
        let view = MemoryView::new(&memory);
        assert_eq!(
            view.window(12, 8).unwrap_err(),
            BridgeError::OutOfBounds {
                offset: 12,
                len: 8,
                size: 16
            }
        );
        let inner = view.window(4, 8).unwrap();
        assert_eq!(
            inner.read_u32(6).unwrap_err(),
            BridgeError::OutOfBounds {
                offset: 10,
                len: 4,
                size: 12
            }
        );
    }

    #[test]
    fn test_window_offset_overflow_is_out_of_bounds() {
        let memory = vec![0u8; 16];
        assert!(MemoryView::new(&memory).window(u32::MAX, 2).is_err());
        assert!(MemoryView::new(&memory).tail(17).is_err());
        assert_eq!(MemoryView::new(&memory).tail(16).unwrap().len(), 0);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_tail_covers_full_4gib_memory() {
        // 65536 pages, the wasm32 maximum
        let memory = vec![0u8; 1 << 32];
        let view = MemoryView::new(&memory);
        assert_eq!(view.tail(0).unwrap().len(), 1 << 32);

        let tail = view.tail(u32::MAX).unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail.address(), u32::MAX as u64);
    }

    #[test]
    fn test_little_endian_reads() {
        let mut memory = vec![0u8; 16];
        memory[0..4].copy_from_slice(&0xDEADBEEFu32.to_le_bytes());
        memory[4..8].copy_from_slice(&(-7i32).to_le_bytes());
        memory[8..16].copy_from_slice(&3.5f64.to_le_bytes());
        let view = MemoryView::new(&memory);
        assert_eq!(view.read_u32(0).unwrap(), 0xDEADBEEF);
        assert_eq!(view.read_i32(4).unwrap(), -7);
        assert_eq!(view.read_f64(8).unwrap(), 3.5);
    }

    #[test]
    fn test_utf8_multibyte_decode() {
        let text = "héllo wörld ✓ 日本 🦀";
        let memory = memory_with(5, text.as_bytes(), 64);
        let view = MemoryView::new(&memory)
            .window(5, text.len() as u32)
            .unwrap();
        assert_eq!(view.decode_utf8(), text);
    }

    #[test]
    fn test_utf8_invalid_bytes_are_replaced() {
        let memory = [b'o', b'k', 0xFF, b'!'];
        assert_eq!(MemoryView::new(&memory).decode_utf8(), "ok\u{FFFD}!");
    }

    #[test]
    fn test_c_str_len_scans_to_terminator() {
        let memory = memory_with(3, b"main\0rest", 16);
        let view = MemoryView::new(&memory);
        assert_eq!(view.c_str_len(3).unwrap(), 4);
        assert_eq!(view.c_str_len(7).unwrap(), 0);
    }

    #[test]
    fn test_c_str_len_without_terminator_is_out_of_bounds() {
        let memory = [b'a', b'b', b'c'];
        assert!(matches!(
            MemoryView::new(&memory).c_str_len(1),
            Err(BridgeError::OutOfBounds { offset: 1, .. })
        ));
    }
}
