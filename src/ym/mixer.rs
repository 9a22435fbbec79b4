//! Folding the mixer register into the volume streams.
//!
//! Volume registers only use bits 0-4, so each channel's tone and noise
//! enable bits from the mixer ride along in bits 6 and 7 of its volume
//! byte. This drops the mixer stream, leaving 13 streams to pack.

use super::constants::*;
use crate::error::{Error, Result};

const TONE_BIT: u8 = 1 << 6;
const NOISE_BIT: u8 = 1 << 7;
const FOLD_MASK: u8 = TONE_BIT | NOISE_BIT;

/// Split 14 register channels into 13 streams with the mixer folded in
///
/// Mixer bits 6 and 7 are not carried. Fails with `VolumeHighBits` if a
/// volume byte already uses bits 6 or 7.
pub fn fold_mixer(registers: &[Vec<u8>]) -> Result<Vec<Vec<u8>>> {
    let frames = equal_length(registers, NUM_REGISTERS)?;
    let mixer = &registers[MIXER_REGISTER];

    let mut streams: Vec<Vec<u8>> = Vec::with_capacity(NUM_STREAMS);
    streams.extend(registers[..MIXER_REGISTER].iter().cloned());

    for channel in 0..3 {
        let register = FIRST_VOLUME_REGISTER + channel;
        let mut folded = Vec::with_capacity(frames);
        for (frame, (&volume, &mix)) in registers[register].iter().zip(mixer).enumerate() {
            if volume & FOLD_MASK != 0 {
                return Err(Error::VolumeHighBits { register, frame, value: volume });
            }
            let mut value = volume;
            if mix & (1 << channel) != 0 {
                value |= TONE_BIT;
            }
            if mix & (1 << (channel + 3)) != 0 {
                value |= NOISE_BIT;
            }
            folded.push(value);
        }
        streams.push(folded);
    }

    streams.extend(registers[FIRST_VOLUME_REGISTER + 3..].iter().cloned());
    Ok(streams)
}

/// Rebuild 14 register channels from 13 folded streams
pub fn unfold_mixer(streams: &[Vec<u8>]) -> Result<Vec<Vec<u8>>> {
    let frames = equal_length(streams, NUM_STREAMS)?;
    let volumes = &streams[MIXER_REGISTER..MIXER_REGISTER + 3];

    let mut mixer = vec![0u8; frames];
    for (channel, volume) in volumes.iter().enumerate() {
        for (mix, &value) in mixer.iter_mut().zip(volume) {
            if value & TONE_BIT != 0 {
                *mix |= 1 << channel;
            }
            if value & NOISE_BIT != 0 {
                *mix |= 1 << (channel + 3);
            }
        }
    }

    let mut registers: Vec<Vec<u8>> = Vec::with_capacity(NUM_REGISTERS);
    registers.extend(streams[..MIXER_REGISTER].iter().cloned());
    registers.push(mixer);
    registers.extend(volumes.iter().map(|v| v.iter().map(|&b| b & !FOLD_MASK).collect()));
    registers.extend(streams[MIXER_REGISTER + 3..].iter().cloned());
    Ok(registers)
}

/// Frame count shared by all `expected` buffers
fn equal_length(buffers: &[Vec<u8>], expected: usize) -> Result<usize> {
    if buffers.len() != expected {
        return Err(Error::UnsupportedFormat(format!(
            "expected {} channels, got {}",
            expected,
            buffers.len()
        )));
    }
    let frames = buffers[0].len();
    if buffers.iter().any(|b| b.len() != frames) {
        return Err(Error::UnsupportedFormat("channels differ in length".to_string()));
    }
    Ok(frames)
}
