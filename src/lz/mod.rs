pub mod cost;
pub mod matcher;
pub mod parser;
pub mod tokens;

pub use cost::{CostModel, EncoderState};
pub use matcher::{find_cheapest_match, find_longest_match, MatchFinder, DEFAULT_WINDOW, MIN_MATCH};
pub use parser::{
    parse, parse_greedy, parse_greedy_with_stats, parse_lazy, parse_lazy_with, MatchSelect,
    ParseStats, ParseStrategy, Parsed,
};
pub use tokens::{Match, Token, TokenStream};
