use super::OFFSET_ENTRY_SIZE;
use crate::codec::ByteReader;
use crate::error::{Error, Result};

/// Split a packed file into its channel payloads
///
/// The channel count is recovered from the first offset, which always
/// points just past the offset table.
pub fn read_container(data: &[u8]) -> Result<Vec<&[u8]>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ByteReader::new(data);
    let first = reader.read_u32_be().map_err(|_| invalid("truncated offset table"))? as usize;
    if first == 0 || first % OFFSET_ENTRY_SIZE != 0 || first > data.len() {
        return Err(invalid(&format!("bad first offset {}", first)));
    }

    let channel_count = first / OFFSET_ENTRY_SIZE;
    let mut offsets = Vec::with_capacity(channel_count + 1);
    offsets.push(first);
    for _ in 1..channel_count {
        offsets.push(reader.read_u32_be()? as usize);
    }
    offsets.push(data.len());

    for pair in offsets.windows(2) {
        if pair[1] < pair[0] || pair[1] > data.len() {
            return Err(invalid(&format!("offset {} out of order or past end", pair[1])));
        }
    }

    Ok(offsets.windows(2).map(|pair| &data[pair[0]..pair[1]]).collect())
}

fn invalid(reason: &str) -> Error {
    Error::InvalidContainer(reason.to_string())
}
