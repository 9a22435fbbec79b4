/// A back-reference: copy `length` bytes starting `offset` bytes back
///
/// `offset` may be smaller than `length`, in which case the copy overlaps
/// the bytes it is producing and replicates a repeating pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Match {
    pub length: u32,
    pub offset: u32,
}

impl Match {
    pub fn new(length: u32, offset: u32) -> Self {
        debug_assert!(offset != 0, "match offset must be non-zero");
        Self { length, offset }
    }
}

/// Zero or more literal bytes followed by at most one match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Token {
    pub literal_run_length: u32,
    pub matched: Option<Match>,
}

impl Token {
    /// Returns the uncompressed size this token represents
    pub fn uncompressed_size(&self) -> usize {
        self.literal_run_length as usize + self.matched.map_or(0, |m| m.length as usize)
    }
}

/// Whether the last token can still absorb literals
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    /// Empty stream, or the last token is closed by a match
    AwaitingToken,
    /// The last token holds an open literal run with no match yet
    AccumulatingLiterals,
}

/// Ordered token sequence built from parse decisions
///
/// Literal runs are coalesced eagerly, so every token except the last
/// ends in a match.
#[derive(Clone, Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    state: StreamState,
}

impl TokenStream {
    pub fn new() -> Self {
        Self { tokens: Vec::new(), state: StreamState::AwaitingToken }
    }

    /// Append `n` literal bytes to the open run, opening one if needed
    pub fn add_literals(&mut self, n: u32) {
        if n == 0 {
            return;
        }
        match self.state {
            StreamState::AwaitingToken => {
                self.tokens.push(Token { literal_run_length: n, matched: None });
                self.state = StreamState::AccumulatingLiterals;
            }
            StreamState::AccumulatingLiterals => {
                if let Some(last) = self.tokens.last_mut() {
                    last.literal_run_length += n;
                }
            }
        }
    }

    /// Close the current token with a match
    pub fn add_match(&mut self, m: Match) {
        match self.state {
            StreamState::AwaitingToken => {
                self.tokens.push(Token { literal_run_length: 0, matched: Some(m) });
            }
            StreamState::AccumulatingLiterals => {
                if let Some(last) = self.tokens.last_mut() {
                    last.matched = Some(m);
                }
            }
        }
        self.state = StreamState::AwaitingToken;
    }

    /// Total number of input bytes the tokens account for
    pub fn uncompressed_size(&self) -> usize {
        self.tokens.iter().map(Token::uncompressed_size).sum()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl Default for TokenStream {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
