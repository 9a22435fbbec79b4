//! Parsers that turn a channel buffer into a token stream.
//!
//! - Greedy: take the longest match at every position.
//! - Lazy: weigh each match against spending its bytes as literals, and
//!   against a match starting one byte later, using a [`CostModel`].

use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use super::cost::{CostModel, EncoderState};
use super::matcher::MatchFinder;
use super::tokens::{Match, TokenStream};

/// How matches are chosen while parsing a channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParseStrategy {
    /// Longest match at every position, no lookahead
    Greedy,
    /// Longest match with cost checks and one-step lookahead
    #[default]
    Lazy,
    /// Lowest cost-per-byte match with cost checks and one-step lookahead
    LazyCheapest,
}

impl ParseStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Lazy => "lazy",
            Self::LazyCheapest => "lazy-cheapest",
        }
    }
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParseStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "lazy" => Ok(Self::Lazy),
            "lazy-cheapest" | "cheapest" => Ok(Self::LazyCheapest),
            other => Err(format!("unknown parse strategy: {}", other)),
        }
    }
}

/// Which finder the lazy parser consults at each position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchSelect {
    Longest,
    Cheapest,
}

/// Counters gathered during one parse
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Input bytes covered by matches
    pub match_bytes: u64,
    /// Input bytes emitted as literals
    pub literal_bytes: u64,
    /// Matches committed
    pub matches: u64,
    /// Matches rejected because literals were cheaper
    pub literals_over_match: u64,
    /// Matches deferred for a better one a byte later
    pub deferred: u64,
}

impl ParseStats {
    /// Percentage of input bytes covered by matches
    pub fn match_percent(&self) -> f64 {
        let total = self.match_bytes + self.literal_bytes;
        if total == 0 {
            0.0
        } else {
            100.0 * self.match_bytes as f64 / total as f64
        }
    }
}

impl AddAssign for ParseStats {
    fn add_assign(&mut self, other: Self) {
        self.match_bytes += other.match_bytes;
        self.literal_bytes += other.literal_bytes;
        self.matches += other.matches;
        self.literals_over_match += other.literals_over_match;
        self.deferred += other.deferred;
    }
}

/// Token stream plus the counters of the parse that built it
#[derive(Clone, Debug, Default)]
pub struct Parsed {
    pub tokens: TokenStream,
    pub stats: ParseStats,
}

impl Parsed {
    fn push_literal(&mut self) {
        self.tokens.add_literals(1);
        self.stats.literal_bytes += 1;
    }

    fn push_match(&mut self, m: Match) {
        self.tokens.add_match(m);
        self.stats.match_bytes += m.length as u64;
        self.stats.matches += 1;
    }
}

/// Parse `data` with the given strategy
pub fn parse(data: &[u8], max_dist: usize, strategy: ParseStrategy) -> Parsed {
    match strategy {
        ParseStrategy::Greedy => parse_greedy_with_stats(data, max_dist),
        ParseStrategy::Lazy => {
            parse_lazy_with(&mut EncoderState::new(), data, max_dist, MatchSelect::Longest)
        }
        ParseStrategy::LazyCheapest => {
            parse_lazy_with(&mut EncoderState::new(), data, max_dist, MatchSelect::Cheapest)
        }
    }
}

/// Longest match at every position, otherwise one literal
pub fn parse_greedy(data: &[u8], max_dist: usize) -> TokenStream {
    parse_greedy_with_stats(data, max_dist).tokens
}

pub fn parse_greedy_with_stats(data: &[u8], max_dist: usize) -> Parsed {
    let finder = MatchFinder::new(data, max_dist);
    let mut parsed = Parsed::default();
    let mut head = 0;

    while head < data.len() {
        match finder.find_longest(head) {
            Some(m) => {
                parsed.push_match(m);
                head += m.length as usize;
            }
            None => {
                parsed.push_literal();
                head += 1;
            }
        }
    }
    parsed
}

/// Lazy parse with the flag-byte cost model
pub fn parse_lazy(data: &[u8], max_dist: usize) -> TokenStream {
    parse_lazy_with(&mut EncoderState::new(), data, max_dist, MatchSelect::Longest).tokens
}

/// Lazy parse driven by `model`, which is reset first and updated per decision
pub fn parse_lazy_with<C: CostModel>(
    model: &mut C,
    data: &[u8],
    max_dist: usize,
    select: MatchSelect,
) -> Parsed {
    let finder = MatchFinder::new(data, max_dist);
    let find = |model: &C, pos: usize| match select {
        MatchSelect::Longest => finder.find_longest(pos),
        MatchSelect::Cheapest => finder.find_cheapest(model, pos),
    };

    model.reset();
    let mut parsed = Parsed::default();
    let mut head = 0;

    while head < data.len() {
        let mut chosen: Option<Match> = None;

        if let Some(best0) = find(&*model, head) {
            let cost_match = model.calc_cost(0, Some(&best0));
            let cost_as_literals = model.calc_cost(best0.length, None);

            if cost_as_literals < cost_match {
                parsed.stats.literals_over_match += 1;
            } else {
                chosen = Some(best0);

                // Lookahead only when the immediate decision is a match
                if head + 1 < data.len() {
                    if let Some(best1) = find(&*model, head + 1) {
                        let rate0 = cost_match as f64 / best0.length as f64;
                        let rate1 = model.calc_cost(1, Some(&best1)) as f64
                            / (1 + best1.length) as f64;
                        if rate1 < rate0 {
                            chosen = None;
                            parsed.stats.deferred += 1;
                        }
                    }
                }
            }
        }

        match chosen {
            Some(m) => {
                model.apply_match(&m);
                parsed.push_match(m);
                head += m.length as usize;
            }
            None => {
                model.apply_literals(1);
                parsed.push_literal();
                head += 1;
            }
        }
    }
    parsed
}
