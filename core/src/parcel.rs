//! Length-prefixed binary stream used for machine save-states.
//!
//! Every component appends its registers and memories in declaration
//! order with the primitive writers below, and reads them back in the
//! exact same order. All multi-byte primitives are little-endian;
//! `bytes` payloads carry a `u32` length prefix.

use std::fmt;

/// Magic placed at the start of every state file.
pub const STATE_MAGIC: [u8; 4] = *b"DBST";
/// Bumped whenever the serialized layout of any component changes.
pub const STATE_VERSION: u16 = 1;

/// Failures surfaced by `load_state`.
///
/// The first three cover a stream that is not usable at all (wrong
/// magic, unknown version, truncation); `Content` covers a decoded
/// value that violates a machine invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    BadMagic,
    UnsupportedVersion(u16),
    UnexpectedEnd,
    Content(&'static str),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::BadMagic => write!(f, "not a state stream (bad magic)"),
            StateError::UnsupportedVersion(version) => {
                write!(f, "unsupported state version: {}", version)
            }
            StateError::UnexpectedEnd => write!(f, "state stream ended prematurely"),
            StateError::Content(what) => {
                write!(f, "state stream holds an impossible value: {}", what)
            }
        }
    }
}

impl std::error::Error for StateError {}

/// Append-only writer over a byte buffer.
pub struct Parcel {
    data: Vec<u8>,
}

impl Parcel {
    pub fn new() -> Self {
        Parcel {
            data: Vec::with_capacity(0x10000),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn write_bool(&mut self, value: bool) {
        self.data.push(value as u8);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i8(&mut self, value: i8) {
        self.data.push(value as u8);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a `u32` length prefix followed by the raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_u32(bytes.len() as u32);
        self.data.extend_from_slice(bytes);
    }
}

/// Cursor-based reader over a byte slice, the inverse of [`Parcel`].
pub struct ParcelReader<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> ParcelReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ParcelReader { data, cursor: 0 }
    }

    /// How many bytes are left past the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], StateError> {
        if self.cursor + count > self.data.len() {
            return Err(StateError::UnexpectedEnd);
        }
        let slice = &self.data[self.cursor..self.cursor + count];
        self.cursor += count;
        Ok(slice)
    }

    pub fn read_bool(&mut self) -> Result<bool, StateError> {
        Ok(self.take(1)?[0] != 0)
    }

    pub fn read_u8(&mut self) -> Result<u8, StateError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, StateError> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, StateError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, StateError> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    pub fn read_i8(&mut self) -> Result<i8, StateError> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_i16(&mut self) -> Result<i16, StateError> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_i32(&mut self) -> Result<i32, StateError> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_i64(&mut self) -> Result<i64, StateError> {
        Ok(self.read_u64()? as i64)
    }

    /// Read a length-prefixed byte run into `out`, which must have the
    /// exact length that was serialized.
    pub fn read_bytes_into(&mut self, out: &mut [u8]) -> Result<(), StateError> {
        let count = self.read_u32()? as usize;
        if count != out.len() {
            return Err(StateError::Content("byte run length mismatch"));
        }
        out.copy_from_slice(self.take(count)?);
        Ok(())
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, StateError> {
        let count = self.read_u32()? as usize;
        Ok(self.take(count)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primitives_roundtrip() {
        let mut parcel = Parcel::new();
        parcel.write_bool(true);
        parcel.write_u8(0xAB);
        parcel.write_u16(0xBEEF);
        parcel.write_u32(0xDEAD_BEEF);
        parcel.write_u64(0x0123_4567_89AB_CDEF);
        parcel.write_i8(-5);
        parcel.write_i64(-1_000_000_000_000);
        parcel.write_bytes(&[1, 2, 3]);

        let bytes = parcel.into_bytes();
        let mut reader = ParcelReader::new(&bytes);

        assert_eq!(reader.read_bool().unwrap(), true);
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
        assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
        assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.read_u64().unwrap(), 0x0123_4567_89AB_CDEF);
        assert_eq!(reader.read_i8().unwrap(), -5);
        assert_eq!(reader.read_i64().unwrap(), -1_000_000_000_000);
        assert_eq!(reader.read_bytes().unwrap(), vec![1, 2, 3]);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn multi_byte_values_are_little_endian() {
        let mut parcel = Parcel::new();
        parcel.write_u16(0x1234);
        assert_eq!(parcel.into_bytes(), vec![0x34, 0x12]);
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let mut parcel = Parcel::new();
        parcel.write_u32(42);
        let mut bytes = parcel.into_bytes();
        bytes.pop();

        let mut reader = ParcelReader::new(&bytes);
        assert_eq!(reader.read_u32(), Err(StateError::UnexpectedEnd));
    }

    #[test]
    fn byte_run_length_must_match() {
        let mut parcel = Parcel::new();
        parcel.write_bytes(&[0; 8]);
        let bytes = parcel.into_bytes();

        let mut reader = ParcelReader::new(&bytes);
        let mut out = [0u8; 4];
        assert!(matches!(
            reader.read_bytes_into(&mut out),
            Err(StateError::Content(_))
        ));
    }
}
