//! Little-endian cursor over an in-memory byte buffer.

use crate::errors::StorageError;

/// A read cursor over a borrowed byte slice.
///
/// Every read either returns exactly the requested bytes or fails with
/// [`StorageError::Truncated`] without moving the cursor.
#[derive(Debug, Clone)]
pub struct RecordStream<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> RecordStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Read `count` raw bytes
    pub fn read(&mut self, count: usize) -> Result<&'a [u8], StorageError> {
        if count > self.remaining() {
            return Err(StorageError::Truncated {
                offset: self.position,
                needed: count,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], StorageError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, StorageError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, StorageError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, StorageError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }
}
