use crate::error::{Error, Result};
use crate::lz::cost::{LONG_COUNT_THRESHOLD, LONG_OFFSET_THRESHOLD};

/// Flag OR'ed into a count header that introduces literals
pub const LITERAL_FLAG: u8 = 0x80;

/// Flag for a count header that introduces a match
pub const MATCH_FLAG: u8 = 0x00;

/// Largest value the 2-byte extended count or offset can hold
pub const MAX_EXTENDED: u32 = u16::MAX as u32;

/// Byte writer for packed channel output
///
/// Multi-byte values are written big-endian.
pub struct ByteWriter {
    output: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self { output: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity) }
    }

    /// Write a single byte
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }

    /// Write a 16-bit value, high byte first
    pub fn write_u16_be(&mut self, value: u16) {
        self.output.extend_from_slice(&value.to_be_bytes());
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    /// Write a count header: one byte `count | flag` below 128, else
    /// `flag` followed by the count as a 16-bit word
    pub fn write_count(&mut self, count: u32, flag: u8) -> Result<()> {
        if count < LONG_COUNT_THRESHOLD {
            self.write_byte(count as u8 | flag);
        } else if count <= MAX_EXTENDED {
            self.write_byte(flag);
            self.write_u16_be(count as u16);
        } else {
            return Err(Error::EncodingOverflow {
                what: "count",
                value: count as u64,
                max: MAX_EXTENDED as u64,
            });
        }
        Ok(())
    }

    /// Write an offset header: one byte below 256, else a zero byte
    /// followed by the offset as a 16-bit word
    pub fn write_offset(&mut self, offset: u32) -> Result<()> {
        if offset == 0 {
            return Err(Error::ZeroOffset);
        }
        if offset < LONG_OFFSET_THRESHOLD {
            self.write_byte(offset as u8);
        } else if offset <= MAX_EXTENDED {
            self.write_byte(0);
            self.write_u16_be(offset as u16);
        } else {
            return Err(Error::EncodingOverflow {
                what: "offset",
                value: offset as u64,
                max: MAX_EXTENDED as u64,
            });
        }
        Ok(())
    }

    /// Finish and return the output bytes
    pub fn finish(self) -> Vec<u8> {
        self.output
    }

    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_bytes(count: u32, flag: u8) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_count(count, flag).unwrap();
        writer.finish()
    }

    fn offset_bytes(offset: u32) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_offset(offset).unwrap();
        writer.finish()
    }

    #[test]
    fn test_count_short() {
        assert_eq!(count_bytes(1, LITERAL_FLAG), vec![0x81]);
        assert_eq!(count_bytes(127, LITERAL_FLAG), vec![0xFF]);
        assert_eq!(count_bytes(3, MATCH_FLAG), vec![0x03]);
        assert_eq!(count_bytes(127, MATCH_FLAG), vec![0x7F]);
    }

    #[test]
    fn test_count_extended() {
        assert_eq!(count_bytes(128, LITERAL_FLAG), vec![0x80, 0x00, 0x80]);
        assert_eq!(count_bytes(128, MATCH_FLAG), vec![0x00, 0x00, 0x80]);
        assert_eq!(count_bytes(0x1234, MATCH_FLAG), vec![0x00, 0x12, 0x34]);
        assert_eq!(count_bytes(65535, LITERAL_FLAG), vec![0x80, 0xFF, 0xFF]);
    }

    #[test]
    fn test_count_overflow() {
        let mut writer = ByteWriter::new();
        let err = writer.write_count(65536, MATCH_FLAG).unwrap_err();
        assert!(matches!(err, Error::EncodingOverflow { what: "count", value: 65536, .. }));
        assert!(writer.is_empty());
    }

    #[test]
    fn test_offset_boundary() {
        assert_eq!(offset_bytes(1), vec![0x01]);
        assert_eq!(offset_bytes(255), vec![0xFF]);
        assert_eq!(offset_bytes(256), vec![0x00, 0x01, 0x00]);
        assert_eq!(offset_bytes(65535), vec![0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn test_offset_zero_rejected() {
        let mut writer = ByteWriter::new();
        assert!(matches!(writer.write_offset(0), Err(Error::ZeroOffset)));
        assert!(writer.is_empty());
    }

    #[test]
    fn test_offset_overflow() {
        let mut writer = ByteWriter::new();
        assert!(matches!(
            writer.write_offset(70000),
            Err(Error::EncodingOverflow { what: "offset", .. })
        ));
    }
}
