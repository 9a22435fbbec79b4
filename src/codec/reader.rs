use crate::error::{Error, Result};

/// Byte reader over packed channel data
///
/// Multi-byte values are read big-endian.
pub struct ByteReader<'a> {
    input: &'a [u8],
    /// Next byte to read
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Read a single byte
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8> {
        let byte = *self.input.get(self.pos).ok_or(Error::UnexpectedEof)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read a 16-bit value, high byte first
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a 32-bit value, high byte first
    pub fn read_u32_be(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Borrow the next `n` bytes
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(Error::UnexpectedEof)?;
        let bytes = self.input.get(self.pos..end).ok_or(Error::UnexpectedEof)?;
        self.pos = end;
        Ok(bytes)
    }

    /// Read a count header body after its first byte: the low 7 bits, or a
    /// 16-bit word when they are zero
    pub fn read_count(&mut self, first: u8) -> Result<u32> {
        match first & 0x7F {
            0 => Ok(self.read_u16_be()? as u32),
            n => Ok(n as u32),
        }
    }

    /// Read an offset header: one byte, or a zero byte and a 16-bit word
    pub fn read_offset(&mut self) -> Result<u32> {
        let offset = match self.read_byte()? {
            0 => self.read_u16_be()? as u32,
            n => n as u32,
        };
        if offset == 0 {
            return Err(Error::InvalidOffset);
        }
        Ok(offset)
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
