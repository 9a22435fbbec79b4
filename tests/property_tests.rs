use proptest::prelude::*;
use regpack::codec::{decode, encode};
use regpack::container::{read_container, write_container};
use regpack::lz::{find_longest_match, parse, MatchFinder, MIN_MATCH};
use regpack::{compress_channel, ParseStrategy};

fn strategy() -> impl Strategy<Value = ParseStrategy> {
    prop_oneof![
        Just(ParseStrategy::Greedy),
        Just(ParseStrategy::Lazy),
        Just(ParseStrategy::LazyCheapest),
    ]
}

proptest! {
    #[test]
    fn test_channel_roundtrip(
        // small alphabet so matches are common
        data in prop::collection::vec(0..4u8, 0..600),
        window in 1..700usize,
        strategy in strategy(),
    ) {
        let (packed, stats) = compress_channel(&data, window, strategy).unwrap();
        prop_assert_eq!(decode(&packed).unwrap(), data.clone());
        prop_assert_eq!(stats.match_bytes + stats.literal_bytes, data.len() as u64);
    }

    #[test]
    fn test_tokens_cover_input(
        data in prop::collection::vec(any::<u8>(), 0..400),
        window in 1..512usize,
        strategy in strategy(),
    ) {
        let parsed = parse(&data, window, strategy);
        prop_assert_eq!(parsed.tokens.uncompressed_size(), data.len());

        for token in &parsed.tokens {
            if let Some(m) = token.matched {
                prop_assert!(m.length >= MIN_MATCH);
                prop_assert!(m.offset >= 1 && m.offset as usize <= window);
            }
        }
        // a literal run is always closed by the token that holds it
        for pair in parsed.tokens.as_slice().windows(2) {
            prop_assert!(pair[0].matched.is_some());
        }

        let packed = encode(&data, &parsed.tokens).unwrap();
        prop_assert_eq!(decode(&packed).unwrap(), data);
    }

    #[test]
    fn test_finder_matches_reference(
        data in prop::collection::vec(0..3u8, 1..300),
        window in 1..64usize,
    ) {
        let finder = MatchFinder::new(&data, window);
        for pos in 0..data.len() {
            prop_assert_eq!(finder.find_longest(pos), find_longest_match(&data, pos, window));
        }
    }

    #[test]
    fn test_decode_never_panics(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&input);
    }

    #[test]
    fn test_container_roundtrip(
        streams in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..50), 0..16),
    ) {
        let file = write_container(&streams).unwrap();
        let read = read_container(&file).unwrap();
        // a file of empty streams only has its offset table, which still reads back
        prop_assert_eq!(read.len(), streams.len());
        for (r, s) in read.iter().zip(&streams) {
            prop_assert_eq!(*r, s.as_slice());
        }
    }

    #[test]
    fn test_read_container_never_panics(input in prop::collection::vec(any::<u8>(), 0..128)) {
        let _ = read_container(&input);
    }
}
