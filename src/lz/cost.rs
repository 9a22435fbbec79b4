use super::tokens::Match;

/// Literal run length at which the count header switches to the 3-byte form
pub const LONG_COUNT_THRESHOLD: u32 = 128;

/// Match offset at which the offset header switches to the 3-byte form
pub const LONG_OFFSET_THRESHOLD: u32 = 256;

/// Byte-cost estimates that steer parse decisions
///
/// Implementations carry whatever encoder state the estimate depends on and
/// are threaded through a whole channel pass.
pub trait CostModel {
    /// Cost in bytes of emitting `num_literals` more literals, or of `m` alone if given
    fn calc_cost(&self, num_literals: u32, m: Option<&Match>) -> u32;

    /// Record `n` committed literal bytes
    fn apply_literals(&mut self, n: u32);

    /// Record a committed match
    fn apply_match(&mut self, m: &Match);

    /// Clear state before a new pass
    fn reset(&mut self);
}

/// Encoder state for the flag-byte count format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncoderState {
    /// Literal bytes in the currently open run
    pub current_literal_run: u32,
}

impl EncoderState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CostModel for EncoderState {
    fn calc_cost(&self, num_literals: u32, m: Option<&Match>) -> u32 {
        // A match is priced on its own, ignoring the pending literal run
        if let Some(m) = m {
            let mut cost = 2;
            if m.length >= LONG_COUNT_THRESHOLD {
                cost += 1;
            }
            if m.offset >= LONG_OFFSET_THRESHOLD {
                cost += 1;
            }
            return cost;
        }

        let mut cost = num_literals;
        let mut run = self.current_literal_run;
        for _ in 0..num_literals {
            if run == 0 {
                // opening a new run costs its header byte
                cost += 1;
            } else if run == LONG_COUNT_THRESHOLD - 1 {
                // crossing into the extended count
                cost += 1;
            }
            run = run.saturating_add(1);
        }
        cost
    }

    fn apply_literals(&mut self, n: u32) {
        self.current_literal_run += n;
    }

    fn apply_match(&mut self, _m: &Match) {
        self.current_literal_run = 0;
    }

    fn reset(&mut self) {
        self.current_literal_run = 0;
    }
}
