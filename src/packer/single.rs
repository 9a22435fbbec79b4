use super::channel::pack_channel;
use super::write_packed;
use crate::error::Result;
use crate::{PackConfig, PackStats, Packer};
use std::io::{BufWriter, Write};

/// Single-threaded packer implementation
pub struct SingleThreadedPacker {
    config: PackConfig,
}

impl SingleThreadedPacker {
    pub fn new(config: PackConfig) -> Self {
        Self { config }
    }
}

impl Packer for SingleThreadedPacker {
    fn pack<C, W>(&mut self, channels: &[C], output: W) -> Result<PackStats>
    where
        C: AsRef<[u8]> + Sync,
        W: Write,
    {
        let packed = channels
            .iter()
            .enumerate()
            .map(|(index, data)| {
                pack_channel(
                    index,
                    data.as_ref(),
                    self.config.window_for(index),
                    self.config.strategy,
                    self.config.verify,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        write_packed(&packed, BufWriter::new(output), self.config.verify)
    }
}
