use super::constants::*;
use crate::error::{Error, Result};
use std::io::Read;

/// Fixed header of a YM5/YM6 register log (big-endian fields)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ym56Header {
    pub magic: u32,
    pub frame_count: u32,
    pub attributes: u32,
    pub digidrum_count: u16,
    pub clock_hz: u32,
    pub player_hz: u16,
    pub loop_frame: u32,
    pub skip_bytes: u16,
}

impl Ym56Header {
    /// Parse the fixed header from a reader
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; YM56_HEADER_SIZE];
        reader.read_exact(&mut buf).map_err(|_| Error::UnexpectedEof)?;

        let magic = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if magic != YM5_MAGIC && magic != YM6_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }
        if buf[4..12] != YM56_CHECK {
            return Err(Error::UnsupportedFormat("missing LeOnArD! check string".to_string()));
        }

        Ok(Ym56Header {
            magic,
            frame_count: u32::from_be_bytes([buf[12], buf[13], buf[14], buf[15]]),
            attributes: u32::from_be_bytes([buf[16], buf[17], buf[18], buf[19]]),
            digidrum_count: u16::from_be_bytes([buf[20], buf[21]]),
            clock_hz: u32::from_be_bytes([buf[22], buf[23], buf[24], buf[25]]),
            player_hz: u16::from_be_bytes([buf[26], buf[27]]),
            loop_frame: u32::from_be_bytes([buf[28], buf[29], buf[30], buf[31]]),
            skip_bytes: u16::from_be_bytes([buf[32], buf[33]]),
        })
    }

    /// Check if register data is stored register by register
    pub fn is_interleaved(&self) -> bool {
        self.attributes & ATTR_INTERLEAVED != 0
    }

    /// Check if the tune carries digidrum samples
    pub fn has_digidrums(&self) -> bool {
        self.digidrum_count != 0
    }
}

/// Song strings following the digidrum block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongInfo {
    pub name: String,
    pub author: String,
    pub comment: String,
}

impl SongInfo {
    pub fn parse<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(SongInfo {
            name: read_null_terminated_string(reader)?,
            author: read_null_terminated_string(reader)?,
            comment: read_null_terminated_string(reader)?,
        })
    }
}

/// Skip `count` digidrum samples, each a big-endian u32 size then the data
pub fn skip_digidrums<R: Read>(reader: &mut R, count: u16) -> Result<()> {
    for _ in 0..count {
        let mut size_buf = [0u8; 4];
        reader.read_exact(&mut size_buf).map_err(|_| Error::UnexpectedEof)?;
        let size = u32::from_be_bytes(size_buf) as u64;
        let skipped = std::io::copy(&mut (&mut *reader).take(size), &mut std::io::sink())?;
        if skipped != size {
            return Err(Error::UnexpectedEof);
        }
    }
    Ok(())
}

/// Read a null-terminated string from a reader
fn read_null_terminated_string<R: Read>(reader: &mut R) -> Result<String> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        reader.read_exact(&mut byte).map_err(|_| Error::UnexpectedEof)?;
        if byte[0] == 0 {
            break;
        }
        bytes.push(byte[0]);
    }

    // Atari-era strings are not guaranteed UTF-8; fall back to Latin-1
    String::from_utf8(bytes.clone()).or_else(|_| Ok(bytes.iter().map(|&b| b as char).collect()))
}
