//! Register log loading.
//!
//! A register log holds one byte per register per frame. Loading splits it
//! into one channel buffer per register. The packer compresses either those
//! 14 channels or the 13 streams left after folding the mixer into the
//! volume registers.

pub mod constants;
pub mod header;
pub mod mixer;

pub use constants::*;
pub use header::{SongInfo, Ym56Header};
pub use mixer::{fold_mixer, unfold_mixer};

use crate::error::{Error, Result};

/// Source format of a register log
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Ym3,
    Ym5,
    Ym6,
}

impl LogFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ym3 => "YM3",
            Self::Ym5 => "YM5",
            Self::Ym6 => "YM6",
        }
    }
}

/// Register log split into per-register channels
#[derive(Clone, Debug)]
pub struct RegisterLog {
    pub format: LogFormat,
    /// YM5/YM6 header, if present
    pub header: Option<Ym56Header>,
    /// YM5/YM6 song strings, if present
    pub info: Option<SongInfo>,
    frame_count: usize,
    channels: Vec<Vec<u8>>,
}

impl RegisterLog {
    /// Detect the format from the magic and split the register data
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::UnsupportedFormat(
                "too small for a register log header".to_string(),
            ));
        }
        let magic = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        match magic {
            YM3_MAGIC => Self::parse_ym3(data),
            YM5_MAGIC | YM6_MAGIC => Self::parse_ym56(data),
            other => Err(Error::InvalidMagic(other)),
        }
    }

    fn parse_ym3(data: &[u8]) -> Result<Self> {
        let body = &data[4..];
        if body.len() % NUM_REGISTERS != 0 {
            return Err(Error::BadRegisterDataSize { size: body.len(), registers: NUM_REGISTERS });
        }
        let frame_count = body.len() / NUM_REGISTERS;
        Ok(Self {
            format: LogFormat::Ym3,
            header: None,
            info: None,
            frame_count,
            channels: split_register_major(body, frame_count),
        })
    }

    fn parse_ym56(data: &[u8]) -> Result<Self> {
        let mut reader = data;
        let header = Ym56Header::parse(&mut reader)?;

        if reader.len() < header.skip_bytes as usize {
            return Err(Error::UnexpectedEof);
        }
        reader = &reader[header.skip_bytes as usize..];
        header::skip_digidrums(&mut reader, header.digidrum_count)?;
        let info = SongInfo::parse(&mut reader)?;

        let frame_count = header.frame_count as usize;
        let register_bytes = frame_count
            .checked_mul(NUM_REGISTERS)
            .ok_or_else(|| Error::UnsupportedFormat("frame count too large".to_string()))?;
        let body = reader.get(..register_bytes).ok_or(Error::UnexpectedEof)?;

        let channels = if header.is_interleaved() {
            split_register_major(body, frame_count)
        } else {
            split_frame_major(body, frame_count)
        };

        let format = if header.magic == YM5_MAGIC { LogFormat::Ym5 } else { LogFormat::Ym6 };
        Ok(Self { format, header: Some(header), info: Some(info), frame_count, channels })
    }

    /// Build a log from already-split channels of equal length
    pub fn from_channels(channels: Vec<Vec<u8>>) -> Result<Self> {
        if channels.len() != NUM_REGISTERS {
            return Err(Error::UnsupportedFormat(format!(
                "expected {} channels, got {}",
                NUM_REGISTERS,
                channels.len()
            )));
        }
        let frame_count = channels[0].len();
        if channels.iter().any(|c| c.len() != frame_count) {
            return Err(Error::UnsupportedFormat("channels differ in length".to_string()));
        }
        Ok(Self { format: LogFormat::Ym3, header: None, info: None, frame_count, channels })
    }

    /// Build a log from 13 mixer-folded streams
    pub fn from_streams(streams: Vec<Vec<u8>>) -> Result<Self> {
        Self::from_channels(unfold_mixer(&streams)?)
    }

    /// Build a log from unpacked channels: 13 folded streams or 14 registers
    pub fn from_unpacked(channels: Vec<Vec<u8>>) -> Result<Self> {
        if channels.len() == NUM_STREAMS {
            Self::from_streams(channels)
        } else {
            Self::from_channels(channels)
        }
    }

    /// The 13 streams with the mixer folded into the volume registers
    pub fn folded_streams(&self) -> Result<Vec<Vec<u8>>> {
        fold_mixer(&self.channels)
    }

    /// Serialize as YM3: magic followed by the channels back to back
    pub fn to_ym3(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.frame_count * NUM_REGISTERS);
        out.extend_from_slice(&YM3_MAGIC.to_be_bytes());
        for channel in &self.channels {
            out.extend_from_slice(channel);
        }
        out
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn channels(&self) -> &[Vec<u8>] {
        &self.channels
    }

    pub fn into_channels(self) -> Vec<Vec<u8>> {
        self.channels
    }

    /// Total register bytes across all channels
    pub fn data_size(&self) -> usize {
        self.frame_count * self.channels.len()
    }
}

/// Register r occupies bytes `[r * frames, (r + 1) * frames)`
fn split_register_major(body: &[u8], frame_count: usize) -> Vec<Vec<u8>> {
    (0..NUM_REGISTERS)
        .map(|reg| body[reg * frame_count..(reg + 1) * frame_count].to_vec())
        .collect()
}

/// Frame f occupies bytes `[f * 14, (f + 1) * 14)`
fn split_frame_major(body: &[u8], frame_count: usize) -> Vec<Vec<u8>> {
    let mut channels = vec![Vec::with_capacity(frame_count); NUM_REGISTERS];
    for frame in body.chunks_exact(NUM_REGISTERS) {
        for (channel, &value) in channels.iter_mut().zip(frame) {
            channel.push(value);
        }
    }
    channels
}
