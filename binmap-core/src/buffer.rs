//! Buffer traits for byte-order aware scalar access.
//!
//! This module provides:
//! - [`ReadBuffer`] trait for read-only buffer access
//! - [`WriteBuffer`] trait for read-write buffer access
//!
//! Scalars are moved through their raw bit pattern: the codec turns a
//! [`Value`] into bits with [`ScalarType::to_bits`], the buffer lays the
//! low `width` bytes out in the requested [`ByteOrder`], and decoding runs
//! the same path backwards.

use crate::types::{ByteOrder, ScalarType};
use crate::value::Value;

/// Trait for read-only buffer access.
pub trait ReadBuffer {
    /// Returns the buffer as a byte slice.
    fn as_slice(&self) -> &[u8];

    /// Returns the length of the buffer in bytes.
    fn len(&self) -> usize;

    /// Returns true if the buffer is empty.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a slice of bytes at the given offset and length.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to start from
    /// * `len` - Number of bytes to read
    #[inline(always)]
    fn get_bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.as_slice()[offset..offset + len]
    }

    /// Reads an unsigned integer of `width` bytes (1 to 8).
    ///
    /// # Arguments
    /// * `offset` - Byte offset to read from
    /// * `width` - Number of bytes
    /// * `order` - Byte order of the stored value
    #[inline]
    fn get_uint(&self, offset: usize, width: usize, order: ByteOrder) -> u64 {
        let src = self.get_bytes(offset, width);
        let mut raw = [0u8; 8];
        if order.is_big_endian() {
            raw[8 - width..].copy_from_slice(src);
            u64::from_be_bytes(raw)
        } else {
            raw[..width].copy_from_slice(src);
            u64::from_le_bytes(raw)
        }
    }

    /// Reads a scalar of the given type.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to read from
    /// * `scalar` - Scalar type stored at the offset
    /// * `order` - Byte order of the stored value
    #[inline]
    fn get_scalar(&self, offset: usize, scalar: ScalarType, order: ByteOrder) -> Value {
        scalar.from_bits(self.get_uint(offset, scalar.width(), order))
    }
}

/// Trait for read-write buffer access.
pub trait WriteBuffer: ReadBuffer {
    /// Returns the buffer as a mutable byte slice.
    fn as_mut_slice(&mut self) -> &mut [u8];

    /// Writes a byte slice at the given offset.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to write to
    /// * `src` - Source bytes to copy
    #[inline(always)]
    fn put_bytes(&mut self, offset: usize, src: &[u8]) {
        self.as_mut_slice()[offset..offset + src.len()].copy_from_slice(src);
    }

    /// Writes the low `width` bytes (1 to 8) of `bits`.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to write to
    /// * `width` - Number of bytes
    /// * `bits` - Value to write
    /// * `order` - Byte order to write in
    #[inline]
    fn put_uint(&mut self, offset: usize, width: usize, bits: u64, order: ByteOrder) {
        if order.is_big_endian() {
            self.put_bytes(offset, &bits.to_be_bytes()[8 - width..]);
        } else {
            self.put_bytes(offset, &bits.to_le_bytes()[..width]);
        }
    }

    /// Writes a scalar of the given type.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to write to
    /// * `scalar` - Scalar type to encode as
    /// * `value` - Value, already checked against `scalar`
    /// * `order` - Byte order to write in
    #[inline]
    fn put_scalar(&mut self, offset: usize, scalar: ScalarType, value: &Value, order: ByteOrder) {
        self.put_uint(offset, scalar.width(), scalar.to_bits(value), order);
    }

    /// Fills a range with zeros.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to start from
    /// * `len` - Number of bytes to zero
    #[inline]
    fn zero(&mut self, offset: usize, len: usize) {
        self.as_mut_slice()[offset..offset + len].fill(0);
    }
}

/// Implement ReadBuffer for byte slices.
impl ReadBuffer for [u8] {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }

    #[inline(always)]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }
}

/// Implement WriteBuffer for byte slices.
impl WriteBuffer for [u8] {
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [u8] {
        self
    }
}

/// Implement ReadBuffer for `Vec<u8>`.
impl ReadBuffer for Vec<u8> {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }

    #[inline(always)]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// Implement WriteBuffer for `Vec<u8>`.
impl WriteBuffer for Vec<u8> {
    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [u8] {
        self
    }
}
