pub mod channel;
pub mod parallel;
pub mod single;
pub mod tune;

pub use channel::{compress_channel, decompress_channel, PackedChannel};
pub use parallel::ParallelPacker;
pub use single::SingleThreadedPacker;
pub use tune::{
    channel_window_candidates, tune_channel_windows, tune_window, tune_window_two_pass, TuneResult,
};

use std::io::Write;

use crate::container::ContainerWriter;
use crate::error::Result;
use crate::{ChannelStats, PackStats};

/// Decode every channel of a packed file
pub fn unpack_file(data: &[u8]) -> Result<Vec<Vec<u8>>> {
    crate::container::read_container(data)?.into_iter().map(decompress_channel).collect()
}

/// Write packed channels (already in channel order) as a container
pub(crate) fn write_packed<W: Write>(
    packed: &[PackedChannel],
    output: W,
    verified: bool,
) -> Result<PackStats> {
    let streams: Vec<&[u8]> = packed.iter().map(|p| p.data.as_slice()).collect();

    let mut writer = ContainerWriter::new(output);
    let output_bytes = writer.write_streams(&streams)?;
    writer.finish()?;

    let mut stats = PackStats { output_bytes, verified, ..Default::default() };
    for channel in packed {
        stats.input_bytes += channel.input_bytes as u64;
        stats.parse += channel.parse;
        stats.channels.push(ChannelStats {
            index: channel.index,
            window: channel.window,
            input_bytes: channel.input_bytes as u64,
            packed_bytes: channel.data.len() as u64,
            parse: channel.parse,
        });
    }
    Ok(stats)
}
