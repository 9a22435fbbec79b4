use crate::codec::{decode, encode};
use crate::error::{Error, Result};
use crate::lz::{parse, ParseStats, ParseStrategy};

/// Packed bytes and counters for one channel
#[derive(Clone, Debug)]
pub struct PackedChannel {
    pub index: usize,
    pub window: usize,
    pub input_bytes: usize,
    pub data: Vec<u8>,
    pub parse: ParseStats,
}

/// Parse and encode one channel buffer
pub fn compress_channel(
    data: &[u8],
    window: usize,
    strategy: ParseStrategy,
) -> Result<(Vec<u8>, ParseStats)> {
    let parsed = parse(data, window, strategy);

    let covered = parsed.tokens.uncompressed_size();
    if covered != data.len() {
        return Err(Error::TokenCoverage { expected: data.len(), found: covered });
    }

    let packed = encode(data, &parsed.tokens)?;
    Ok((packed, parsed.stats))
}

/// Decode one packed channel
pub fn decompress_channel(packed: &[u8]) -> Result<Vec<u8>> {
    decode(packed)
}

/// Compress channel `index`, decoding it again when `verify` is set
pub(crate) fn pack_channel(
    index: usize,
    data: &[u8],
    window: usize,
    strategy: ParseStrategy,
    verify: bool,
) -> Result<PackedChannel> {
    let (packed, parse) = compress_channel(data, window, strategy)?;

    if verify && decompress_channel(&packed)? != data {
        return Err(Error::VerifyMismatch { channel: index });
    }

    Ok(PackedChannel { index, window, input_bytes: data.len(), data: packed, parse })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_round_trip() {
        let data: Vec<u8> = (0..2000u32).map(|i| ((i / 3) % 11) as u8).collect();
        for strategy in [ParseStrategy::Greedy, ParseStrategy::Lazy, ParseStrategy::LazyCheapest] {
            let (packed, stats) = compress_channel(&data, 512, strategy).unwrap();
            assert!(packed.len() < data.len());
            assert_eq!(stats.match_bytes + stats.literal_bytes, data.len() as u64);
            assert_eq!(decompress_channel(&packed).unwrap(), data);
        }
    }

    #[test]
    fn test_empty_channel() {
        let (packed, stats) = compress_channel(&[], 512, ParseStrategy::Lazy).unwrap();
        assert!(packed.is_empty());
        assert_eq!(stats, ParseStats::default());
        assert!(decompress_channel(&packed).unwrap().is_empty());
    }

    #[test]
    fn test_pack_channel_verify() {
        let data = b"abcabcabcabcabc".to_vec();
        let packed = pack_channel(3, &data, 512, ParseStrategy::Lazy, true).unwrap();
        assert_eq!(packed.index, 3);
        assert_eq!(packed.input_bytes, 15);
        assert_eq!(packed.data, vec![0x83, b'a', b'b', b'c', 0x0C, 0x03]);
    }

    #[test]
    fn test_long_literal_run_overflows() {
        // no byte value repeats within reach, so every byte is a literal
        let data: Vec<u8> = (0..70_000u32).map(|i| (i % 251) as u8).collect();
        let result = compress_channel(&data, 200, ParseStrategy::Greedy);
        assert!(matches!(result, Err(Error::EncodingOverflow { what: "count", .. })));
    }

    #[test]
    fn test_long_held_value_overflows() {
        // one literal, then a single match of 69_999 bytes: longer than a count can hold
        let data = vec![0x0Fu8; 70_000];
        for strategy in [ParseStrategy::Greedy, ParseStrategy::Lazy] {
            assert!(matches!(
                compress_channel(&data, 512, strategy),
                Err(Error::EncodingOverflow { what: "count", value: 69_999, .. })
            ));
        }
        // a 65_536-byte hold still fits
        let data = vec![0x0Fu8; 65_536];
        let (packed, _) = compress_channel(&data, 512, ParseStrategy::Lazy).unwrap();
        assert_eq!(decompress_channel(&packed).unwrap(), data);
    }
}
