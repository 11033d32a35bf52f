//! Growable, random-access byte buffer.
//!
//! Writes append at the cursor (or overwrite, after [`Buffer::set_position`]
//! moves it back); reads consume from the cursor. Multi-byte values are
//! big-endian.

use crate::error::DecodeError;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    bytes: Vec<u8>,
    pos: usize,
}

impl Buffer {
    pub fn new() -> Self {
        Buffer::default()
    }

    /// Wrap existing bytes, cursor at the start.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Buffer { bytes, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor. Positions past the end are clamped.
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.bytes.len());
    }

    #[inline]
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    // === Writing ===

    /// Write `data` at the cursor, overwriting and then extending.
    pub fn put_bytes(&mut self, data: &[u8]) {
        let end = self.pos + data.len();
        let overlap = end.min(self.bytes.len()).saturating_sub(self.pos);
        self.bytes[self.pos..self.pos + overlap].copy_from_slice(&data[..overlap]);
        self.bytes.extend_from_slice(&data[overlap..]);
        self.pos = end;
    }

    #[inline]
    pub fn put_u8(&mut self, v: u8) {
        self.put_bytes(&[v]);
    }

    #[inline]
    pub fn put_u16(&mut self, v: u16) {
        self.put_bytes(&v.to_be_bytes());
    }

    #[inline]
    pub fn put_i16(&mut self, v: i16) {
        self.put_bytes(&v.to_be_bytes());
    }

    #[inline]
    pub fn put_i32(&mut self, v: i32) {
        self.put_bytes(&v.to_be_bytes());
    }

    #[inline]
    pub fn put_u32(&mut self, v: u32) {
        self.put_bytes(&v.to_be_bytes());
    }

    #[inline]
    pub fn put_u64(&mut self, v: u64) {
        self.put_bytes(&v.to_be_bytes());
    }

    // === Reading ===

    /// Consume `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&[u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::UnexpectedEnd {
                pos: self.pos,
                wanted: n,
                len: self.bytes.len(),
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.bytes[start..self.pos])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    #[inline]
    pub fn get_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take_array::<1>()?[0])
    }

    #[inline]
    pub fn get_u16(&mut self) -> Result<u16, DecodeError> {
        self.take_array().map(u16::from_be_bytes)
    }

    #[inline]
    pub fn get_i16(&mut self) -> Result<i16, DecodeError> {
        self.take_array().map(i16::from_be_bytes)
    }

    #[inline]
    pub fn get_i32(&mut self) -> Result<i32, DecodeError> {
        self.take_array().map(i32::from_be_bytes)
    }

    #[inline]
    pub fn get_u32(&mut self) -> Result<u32, DecodeError> {
        self.take_array().map(u32::from_be_bytes)
    }

    #[inline]
    pub fn get_u64(&mut self) -> Result<u64, DecodeError> {
        self.take_array().map(u64::from_be_bytes)
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.bytes.len())
            .field("pos", &self.pos)
            .finish()
    }
}
