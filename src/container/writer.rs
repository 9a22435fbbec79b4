use super::OFFSET_ENTRY_SIZE;
use crate::error::{Error, Result};
use std::io::Write;

/// Absolute start position of each stream in the assembled file
pub fn offset_table<S: AsRef<[u8]>>(streams: &[S]) -> Result<Vec<u32>> {
    let mut offsets = Vec::with_capacity(streams.len());
    let mut position = (streams.len() * OFFSET_ENTRY_SIZE) as u64;

    for stream in streams {
        let offset = u32::try_from(position).map_err(|_| Error::EncodingOverflow {
            what: "container offset",
            value: position,
            max: u32::MAX as u64,
        })?;
        offsets.push(offset);
        position += stream.as_ref().len() as u64;
    }
    Ok(offsets)
}

/// Writes the offset table and channel payloads of a packed file
pub struct ContainerWriter<W: Write> {
    writer: W,
}

impl<W: Write> ContainerWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the offset table followed by every stream, returning bytes written
    pub fn write_streams<S: AsRef<[u8]>>(&mut self, streams: &[S]) -> Result<u64> {
        let offsets = offset_table(streams)?;

        let mut written = 0u64;
        for offset in &offsets {
            self.writer.write_all(&offset.to_be_bytes())?;
            written += OFFSET_ENTRY_SIZE as u64;
        }
        for stream in streams {
            self.writer.write_all(stream.as_ref())?;
            written += stream.as_ref().len() as u64;
        }
        Ok(written)
    }

    /// Flush and finish writing
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Assemble a packed file in memory
pub fn write_container<S: AsRef<[u8]>>(streams: &[S]) -> Result<Vec<u8>> {
    let total: usize =
        streams.len() * OFFSET_ENTRY_SIZE + streams.iter().map(|s| s.as_ref().len()).sum::<usize>();
    let mut writer = ContainerWriter::new(Vec::with_capacity(total));
    writer.write_streams(streams)?;
    writer.finish()
}
