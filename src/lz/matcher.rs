use super::cost::CostModel;
use super::tokens::Match;

/// Minimum match length worth a back-reference
pub const MIN_MATCH: u32 = 3;

/// Match window used for register logs when none is configured
pub const DEFAULT_WINDOW: usize = 512;

/// Hash table size for the chained finder (power of 2)
const HASH_BITS: u32 = 16;
const HASH_SIZE: usize = 1 << HASH_BITS;

/// Number of bytes at `pos` equal to the bytes `offset` positions earlier
///
/// The comparison may run past `pos` into the bytes being matched.
#[inline]
fn match_length(data: &[u8], pos: usize, offset: usize) -> u32 {
    let back = pos - offset;
    data[pos..].iter().zip(&data[back..]).take_while(|(a, b)| a == b).count() as u32
}

/// Longest match at `pos` within `max_dist` bytes back, by exhaustive scan
///
/// Offsets are tried from 1 upwards and only a strictly longer match replaces
/// the current best, so ties go to the smaller offset.
pub fn find_longest_match(data: &[u8], pos: usize, max_dist: usize) -> Option<Match> {
    let limit = pos.min(max_dist);
    let mut best: Option<Match> = None;

    for offset in 1..=limit {
        let length = match_length(data, pos, offset);
        if length >= MIN_MATCH && length > best.map_or(0, |m| m.length) {
            best = Some(Match::new(length, offset as u32));
        }
    }
    best
}

/// Match at `pos` with the lowest cost per byte, by exhaustive scan
///
/// Candidates are scored `cost / length`. Scores must beat 1.0 (one byte per
/// byte) and the running best strictly, so ties go to the smaller offset.
pub fn find_cheapest_match<C: CostModel>(
    model: &C,
    data: &[u8],
    pos: usize,
    max_dist: usize,
) -> Option<Match> {
    let limit = pos.min(max_dist);
    let mut best: Option<Match> = None;
    let mut best_rate = 1.0f64;

    for offset in 1..=limit {
        let length = match_length(data, pos, offset);
        if length < MIN_MATCH {
            continue;
        }
        let candidate = Match::new(length, offset as u32);
        let rate = model.calc_cost(0, Some(&candidate)) as f64 / length as f64;
        if rate < best_rate {
            best_rate = rate;
            best = Some(candidate);
        }
    }
    best
}

#[inline]
fn hash3(data: &[u8], pos: usize) -> usize {
    let v = (data[pos] as u32) << 16 | (data[pos + 1] as u32) << 8 | data[pos + 2] as u32;
    (v.wrapping_mul(0x9E37_79B1) >> (32 - HASH_BITS)) as usize
}

/// Hash-chained match finder over one channel buffer
///
/// Every earlier position sharing a 3-byte prefix hash is linked, and chains
/// are walked nearest-first without a length cap. Any match of at least
/// `MIN_MATCH` bytes shares its prefix, so results are identical to
/// [`find_longest_match`] and [`find_cheapest_match`], only faster.
pub struct MatchFinder<'a> {
    data: &'a [u8],
    max_dist: usize,
    /// prev[pos] = previous position with the same hash, plus one (0 = none)
    prev: Vec<u32>,
}

impl<'a> MatchFinder<'a> {
    pub fn new(data: &'a [u8], max_dist: usize) -> Self {
        let mut prev = vec![0u32; data.len()];
        if data.len() >= MIN_MATCH as usize {
            let mut head = vec![0u32; HASH_SIZE];
            for pos in 0..=data.len() - MIN_MATCH as usize {
                let h = hash3(data, pos);
                prev[pos] = head[h];
                head[h] = pos as u32 + 1;
            }
        }
        Self { data, max_dist, prev }
    }

    /// Walk candidate offsets at `pos` in increasing order, passing each match
    fn for_each_candidate(&self, pos: usize, mut visit: impl FnMut(Match)) {
        if pos + (MIN_MATCH as usize) > self.data.len() {
            return;
        }
        let mut link = self.prev[pos];
        while link != 0 {
            let candidate = (link - 1) as usize;
            let offset = pos - candidate;
            if offset > self.max_dist {
                break;
            }
            let length = match_length(self.data, pos, offset);
            if length >= MIN_MATCH {
                visit(Match::new(length, offset as u32));
            }
            link = self.prev[candidate];
        }
    }

    /// Same result as [`find_longest_match`] on this buffer and window
    pub fn find_longest(&self, pos: usize) -> Option<Match> {
        let mut best: Option<Match> = None;
        self.for_each_candidate(pos, |m| {
            if m.length > best.map_or(0, |b| b.length) {
                best = Some(m);
            }
        });
        best
    }

    /// Same result as [`find_cheapest_match`] on this buffer and window
    pub fn find_cheapest<C: CostModel>(&self, model: &C, pos: usize) -> Option<Match> {
        let mut best: Option<Match> = None;
        let mut best_rate = 1.0f64;
        self.for_each_candidate(pos, |m| {
            let rate = model.calc_cost(0, Some(&m)) as f64 / m.length as f64;
            if rate < best_rate {
                best_rate = rate;
                best = Some(m);
            }
        });
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lz::cost::EncoderState;

    fn pseudo_random(size: usize, seed: u64) -> Vec<u8> {
        let mut state = seed;
        (0..size)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                // small alphabet so that matches are common
                (state % 5) as u8
            })
            .collect()
    }

    #[test]
    fn test_no_match_at_start() {
        assert_eq!(find_longest_match(b"aaaa", 0, 512), None);
    }

    #[test]
    fn test_overlapping_run() {
        let data = b"aaaaaaaa";
        assert_eq!(find_longest_match(data, 1, 512), Some(Match::new(7, 1)));
    }

    #[test]
    fn test_short_match_rejected() {
        // "ab" repeats, but only two bytes long
        assert_eq!(find_longest_match(b"abxab", 3, 512), None);
    }

    #[test]
    fn test_tie_prefers_smaller_offset() {
        // "abc" at offsets 3 and 6, both length 3
        let data = b"abcabcabc";
        let m = find_longest_match(data, 6, 512).unwrap();
        assert_eq!(m, Match::new(3, 3));
    }

    #[test]
    fn test_longer_match_wins_over_smaller_offset() {
        let data = b"abcdXabcYabcd";
        assert_eq!(find_longest_match(data, 9, 512), Some(Match::new(4, 9)));
    }

    #[test]
    fn test_window_limits_offset() {
        let data = b"abcdefabc";
        assert_eq!(find_longest_match(data, 6, 6), Some(Match::new(3, 6)));
        assert_eq!(find_longest_match(data, 6, 5), None);
    }

    #[test]
    fn test_zero_window_is_no_match() {
        assert_eq!(find_longest_match(b"aaaaaa", 3, 0), None);
    }

    #[test]
    fn test_match_stops_at_end_of_buffer() {
        let data = b"xyzxyzxy";
        assert_eq!(find_longest_match(data, 3, 512), Some(Match::new(5, 3)));
    }

    #[test]
    fn test_cheapest_rejects_expensive_rate() {
        // offset 300 costs 3 bytes, a 3-byte match is rate 1.0 and never wins
        let mut data = vec![1u8, 2, 3];
        data.extend(std::iter::repeat(9u8).take(297));
        data.extend([1, 2, 3]);
        let state = EncoderState::new();
        assert_eq!(find_cheapest_match(&state, &data, 300, 512), None);
        assert_eq!(find_longest_match(&data, 300, 512), Some(Match::new(3, 300)));
    }

    #[test]
    fn test_cheapest_prefers_lower_rate() {
        // offset 1: "aaa" (3 bytes, rate 2/3); nothing cheaper further back
        let data = b"aaaa";
        let state = EncoderState::new();
        assert_eq!(find_cheapest_match(&state, data, 1, 512), Some(Match::new(3, 1)));
    }

    #[test]
    fn test_chained_finder_matches_reference() {
        for (seed, window) in [(1u64, 512usize), (7, 16), (42, 3), (99, 1)] {
            let data = pseudo_random(2000, seed);
            let finder = MatchFinder::new(&data, window);
            let state = EncoderState { current_literal_run: 0 };
            for pos in 0..data.len() {
                assert_eq!(
                    finder.find_longest(pos),
                    find_longest_match(&data, pos, window),
                    "longest mismatch at {} (window {})",
                    pos,
                    window
                );
                assert_eq!(
                    finder.find_cheapest(&state, pos),
                    find_cheapest_match(&state, &data, pos, window),
                    "cheapest mismatch at {} (window {})",
                    pos,
                    window
                );
            }
        }
    }

    #[test]
    fn test_chained_finder_short_buffers() {
        for data in [&b""[..], b"a", b"ab", b"abc", b"aaa"] {
            let finder = MatchFinder::new(data, 512);
            for pos in 0..data.len() {
                assert_eq!(finder.find_longest(pos), find_longest_match(data, pos, 512));
            }
        }
    }
}
