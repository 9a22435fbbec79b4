pub mod codec;
pub mod container;
pub mod error;
pub mod lz;
pub mod packer;
pub mod ym;

pub use error::{Error, Result};
pub use lz::{Match, ParseStats, ParseStrategy, Token, TokenStream, DEFAULT_WINDOW};
pub use packer::{
    compress_channel, decompress_channel, parallel::ParallelPacker, single::SingleThreadedPacker,
    tune::{
        channel_window_candidates, tune_channel_windows, tune_window, tune_window_two_pass,
        TuneResult,
    },
    unpack_file, PackedChannel,
};
pub use ym::RegisterLog;

use std::io::Write;

/// Configuration for packing
#[derive(Clone, Debug)]
pub struct PackConfig {
    /// Match window in bytes (default: 512)
    pub window: usize,
    /// Per-channel window overrides, by channel index
    pub channel_windows: Vec<usize>,
    /// How matches are chosen
    pub strategy: ParseStrategy,
    /// Number of threads for parallel packing (0 = auto, 1 = single-threaded)
    pub num_threads: usize,
    /// Decode every packed channel and compare against its input
    pub verify: bool,
}

impl PackConfig {
    /// Window used for channel `index`
    pub fn window_for(&self, index: usize) -> usize {
        self.channel_windows.get(index).copied().unwrap_or(self.window)
    }
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            channel_windows: Vec::new(),
            strategy: ParseStrategy::Lazy,
            num_threads: 0,
            verify: false,
        }
    }
}

/// Per-channel statistics from a packing operation
#[derive(Clone, Debug, Default)]
pub struct ChannelStats {
    pub index: usize,
    pub window: usize,
    pub input_bytes: u64,
    pub packed_bytes: u64,
    pub parse: ParseStats,
}

/// Statistics from a packing operation
#[derive(Clone, Debug, Default)]
pub struct PackStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub channels: Vec<ChannelStats>,
    /// Parse counters summed over all channels
    pub parse: ParseStats,
    /// Every channel was decoded and compared after packing
    pub verified: bool,
}

impl PackStats {
    /// Output size as a percentage of input size
    pub fn ratio_percent(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            100.0 * self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// Trait for the complete packing operation
pub trait Packer {
    /// Pack every channel and write the container to `output`
    fn pack<C, W>(&mut self, channels: &[C], output: W) -> Result<PackStats>
    where
        C: AsRef<[u8]> + Sync,
        W: Write;
}

/// Pack `channels` into an in-memory container with the packer `config` selects
pub fn pack_to_vec<C: AsRef<[u8]> + Sync>(
    channels: &[C],
    config: &PackConfig,
) -> Result<(Vec<u8>, PackStats)> {
    let mut output = Vec::new();
    let stats = if config.num_threads == 1 {
        SingleThreadedPacker::new(config.clone()).pack(channels, &mut output)?
    } else {
        ParallelPacker::new(config.clone()).pack(channels, &mut output)?
    };
    Ok((output, stats))
}
