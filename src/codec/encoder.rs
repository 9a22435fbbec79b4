use super::writer::{ByteWriter, LITERAL_FLAG, MATCH_FLAG};
use crate::error::{Error, Result};
use crate::lz::tokens::Token;

/// Serialize `tokens` over `data` into the packed byte format
///
/// Literal runs are copied from `data`; matches only advance the read
/// cursor. The tokens must cover `data` exactly.
pub fn encode<'t>(data: &[u8], tokens: impl IntoIterator<Item = &'t Token>) -> Result<Vec<u8>> {
    let mut writer = ByteWriter::with_capacity(data.len() / 2 + 16);
    let mut cursor = 0usize;

    for token in tokens {
        if token.literal_run_length > 0 {
            let end = cursor + token.literal_run_length as usize;
            let literals = data
                .get(cursor..end)
                .ok_or(Error::TokenCoverage { expected: data.len(), found: end })?;
            writer.write_count(token.literal_run_length, LITERAL_FLAG)?;
            writer.write_bytes(literals);
            cursor = end;
        }

        if let Some(m) = token.matched {
            if m.offset as usize > cursor {
                return Err(Error::InvalidBackReference { offset: m.offset, available: cursor });
            }
            writer.write_count(m.length, MATCH_FLAG)?;
            writer.write_offset(m.offset)?;
            cursor += m.length as usize;
        }
    }

    if cursor != data.len() {
        return Err(Error::TokenCoverage { expected: data.len(), found: cursor });
    }
    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lz::tokens::{Match, TokenStream};

    #[test]
    fn test_encode_empty() {
        assert!(encode(b"", &TokenStream::new()).unwrap().is_empty());
    }

    #[test]
    fn test_encode_literals_and_match() {
        let data = b"abcabcabc";
        let mut tokens = TokenStream::new();
        tokens.add_literals(3);
        tokens.add_match(Match::new(6, 3));
        let packed = encode(data, &tokens).unwrap();
        assert_eq!(packed, vec![0x83, b'a', b'b', b'c', 0x06, 0x03]);
    }

    #[test]
    fn test_encode_127_literals_short_header() {
        let data = vec![0x55u8; 127];
        let mut tokens = TokenStream::new();
        tokens.add_literals(127);
        let packed = encode(&data, &tokens).unwrap();
        assert_eq!(packed.len(), 128);
        assert_eq!(packed[0], 0xFF);
    }

    #[test]
    fn test_encode_128_literals_long_header() {
        let data = vec![0x55u8; 128];
        let mut tokens = TokenStream::new();
        tokens.add_literals(128);
        let packed = encode(&data, &tokens).unwrap();
        assert_eq!(packed.len(), 131);
        assert_eq!(&packed[..3], &[0x80, 0x00, 0x80]);
    }

    #[test]
    fn test_encode_long_offset() {
        let mut data: Vec<u8> = (0..=255u8).collect();
        data.extend_from_slice(&[0, 1, 2]);
        let mut tokens = TokenStream::new();
        tokens.add_literals(256);
        tokens.add_match(Match::new(3, 256));
        let packed = encode(&data, &tokens).unwrap();
        assert_eq!(&packed[packed.len() - 4..], &[0x03, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_encode_rejects_short_coverage() {
        let mut tokens = TokenStream::new();
        tokens.add_literals(2);
        let err = encode(b"abc", &tokens).unwrap_err();
        assert!(matches!(err, Error::TokenCoverage { expected: 3, found: 2 }));
    }

    #[test]
    fn test_encode_rejects_overrun() {
        let mut tokens = TokenStream::new();
        tokens.add_literals(4);
        assert!(matches!(encode(b"abc", &tokens), Err(Error::TokenCoverage { .. })));
    }

    #[test]
    fn test_encode_rejects_zero_offset() {
        let tokens = [Token { literal_run_length: 1, matched: Some(Match { length: 3, offset: 0 }) }];
        assert!(matches!(encode(b"aaaa", &tokens), Err(Error::ZeroOffset)));
    }

    #[test]
    fn test_encode_rejects_reference_before_start() {
        let tokens = [Token { literal_run_length: 1, matched: Some(Match::new(3, 2)) }];
        assert!(matches!(
            encode(b"aaaa", &tokens),
            Err(Error::InvalidBackReference { offset: 2, available: 1 })
        ));
    }

    #[test]
    fn test_encode_match_length_overflow() {
        let data = vec![0u8; 70_001];
        let tokens =
            [Token { literal_run_length: 1, matched: Some(Match::new(70_000, 1)) }];
        assert!(matches!(
            encode(&data, &tokens),
            Err(Error::EncodingOverflow { what: "count", value: 70_000, .. })
        ));
    }
}
