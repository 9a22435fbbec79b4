//! Window size search.
//!
//! A larger window finds more matches but the playback side must reserve one
//! window of history per channel. Each candidate is scored as the packed size
//! plus that reserved memory.

use super::channel::compress_channel;
use super::parallel::{effective_threads, run_jobs};
use super::SingleThreadedPacker;
use crate::error::Result;
use crate::{PackConfig, Packer};

const BROAD_RANGE: (usize, usize) = (64, 1024);
const BROAD_STEP: usize = 32;
const NARROW_STEP: usize = 2;

/// Per-channel search range: 8, 24, .. 1016
const CHANNEL_RANGE: (usize, usize) = (8, 1024);
const CHANNEL_STEP: usize = 16;

/// Best window found by a search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuneResult {
    pub window: usize,
    /// Packed size at `window`: the whole file, or one channel for per-channel tuning
    pub packed_size: u64,
    /// `packed_size` plus the window memory of every channel it covers
    pub score: u64,
    /// Number of candidate windows packed
    pub evaluated: usize,
}

/// Lowest score wins, ties go to the smaller window
fn pick_best(scored: impl IntoIterator<Item = TuneResult>) -> Option<TuneResult> {
    let mut best: Option<TuneResult> = None;
    let mut evaluated = 0;
    for candidate in scored {
        evaluated += 1;
        let better = match &best {
            None => true,
            Some(b) => (candidate.score, candidate.window) < (b.score, b.window),
        };
        if better {
            best = Some(candidate);
        }
    }
    best.map(|b| TuneResult { evaluated, ..b })
}

/// Pack with every candidate window and keep the lowest score
///
/// Candidates are packed in parallel, one whole file per job. Returns `None`
/// when `candidates` is empty.
pub fn tune_window<C, I>(
    channels: &[C],
    config: &PackConfig,
    candidates: I,
) -> Result<Option<TuneResult>>
where
    C: AsRef<[u8]> + Sync,
    I: IntoIterator<Item = usize>,
{
    let candidates: Vec<usize> = candidates.into_iter().collect();

    let scored = run_jobs(candidates, effective_threads(config.num_threads), |window: usize| {
        let candidate_config = PackConfig {
            window,
            channel_windows: Vec::new(),
            num_threads: 1,
            verify: false,
            ..config.clone()
        };
        let stats = SingleThreadedPacker::new(candidate_config).pack(channels, std::io::sink())?;
        Ok(TuneResult {
            window,
            packed_size: stats.output_bytes,
            score: stats.output_bytes + (window * channels.len()) as u64,
            evaluated: 1,
        })
    })?;

    Ok(pick_best(scored))
}

/// Broad search over 64..=1024 in steps of 32, then refine around the winner in steps of 2
pub fn tune_window_two_pass<C: AsRef<[u8]> + Sync>(
    channels: &[C],
    config: &PackConfig,
) -> Result<Option<TuneResult>> {
    let broad_candidates = (BROAD_RANGE.0..=BROAD_RANGE.1).step_by(BROAD_STEP);
    let Some(broad) = tune_window(channels, config, broad_candidates)? else {
        return Ok(None);
    };

    let low = broad.window.saturating_sub(BROAD_STEP).max(1);
    let high = broad.window + BROAD_STEP;
    let narrow_candidates = (low..=high).step_by(NARROW_STEP);

    Ok(tune_window(channels, config, narrow_candidates)?
        .map(|narrow| TuneResult { evaluated: broad.evaluated + narrow.evaluated, ..narrow }))
}

/// Default per-channel candidates: 8 up to 1016 in steps of 16
pub fn channel_window_candidates() -> impl Iterator<Item = usize> + Clone {
    (CHANNEL_RANGE.0..CHANNEL_RANGE.1).step_by(CHANNEL_STEP)
}

/// Pick a window for each channel on its own
///
/// Every channel is packed with every candidate and scored as its packed
/// size plus its window. Returns one result per channel, in channel order,
/// or an empty list when `candidates` is empty. The windows can be used
/// directly as [`PackConfig::channel_windows`].
pub fn tune_channel_windows<C, I>(
    channels: &[C],
    config: &PackConfig,
    candidates: I,
) -> Result<Vec<TuneResult>>
where
    C: AsRef<[u8]> + Sync,
    I: IntoIterator<Item = usize>,
{
    let candidates: Vec<usize> = candidates.into_iter().collect();
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let jobs: Vec<(usize, usize)> = (0..channels.len())
        .flat_map(|index| candidates.iter().map(move |&window| (index, window)))
        .collect();

    let strategy = config.strategy;
    let threads = effective_threads(config.num_threads);
    let scored = run_jobs(jobs, threads, |(index, window): (usize, usize)| {
        let (packed, _) = compress_channel(channels[index].as_ref(), window, strategy)?;
        let packed_size = packed.len() as u64;
        Ok(TuneResult { window, packed_size, score: packed_size + window as u64, evaluated: 1 })
    })?;

    Ok(scored
        .chunks(candidates.len())
        .filter_map(|per_channel| pick_best(per_channel.iter().copied()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Channels repeating with the given period
    fn periodic_channels(period: usize, count: usize) -> Vec<Vec<u8>> {
        (0..count)
            .map(|c| (0..period * 6).map(|i| ((i % period) * 7 + c) as u8).collect())
            .collect()
    }

    #[test]
    fn test_tune_prefers_window_covering_period() {
        let channels = periodic_channels(100, 3);
        let config = PackConfig { num_threads: 2, ..Default::default() };
        let best = tune_window(&channels, &config, [50, 100, 200]).unwrap().unwrap();

        // 50 finds no repeats, 200 finds the same matches as 100 but costs more memory
        assert_eq!(best.window, 100);
        assert_eq!(best.evaluated, 3);
        assert_eq!(best.score, best.packed_size + 300);
    }

    #[test]
    fn test_tune_smaller_window_wins() {
        // Nothing repeats, so the packed size is the same for every window
        let channels = vec![(0..200u8).collect::<Vec<_>>()];
        let config = PackConfig { num_threads: 1, ..Default::default() };
        let best = tune_window(&channels, &config, [8, 4, 6]).unwrap().unwrap();
        assert_eq!(best.window, 4);

        // with no channels every score ties at zero
        let empty: Vec<Vec<u8>> = Vec::new();
        let best = tune_window(&empty, &config, [30, 10, 20]).unwrap().unwrap();
        assert_eq!(best.window, 10);
        assert_eq!(best.score, 0);
    }

    #[test]
    fn test_tune_no_candidates() {
        let channels = periodic_channels(10, 1);
        let result = tune_window(&channels, &PackConfig::default(), []).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_tune_matches_sequential_packing() {
        let channels = periodic_channels(40, 4);
        let candidates = [16, 32, 40, 48, 64];
        let parallel = PackConfig { num_threads: 4, ..Default::default() };
        let single = PackConfig { num_threads: 1, ..Default::default() };

        let a = tune_window(&channels, &parallel, candidates).unwrap().unwrap();
        let b = tune_window(&channels, &single, candidates).unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.window, 40);
    }

    #[test]
    fn test_channel_windows() {
        // each channel repeats with its own period
        let channels: Vec<Vec<u8>> = [20usize, 100, 300]
            .iter()
            .map(|&period| (0..period * 8).map(|i| ((i % period) * 7) as u8).collect())
            .collect();
        let config = PackConfig { num_threads: 3, ..Default::default() };

        let windows = tune_channel_windows(&channels, &config, channel_window_candidates()).unwrap();
        assert_eq!(windows.len(), 3);
        // smallest candidates covering each period
        assert_eq!(windows[0].window, 24);
        assert_eq!(windows[1].window, 104);
        assert_eq!(windows[2].window, 312);
        for (result, channel) in windows.iter().zip(&channels) {
            assert_eq!(result.evaluated, 64);
            assert_eq!(result.score, result.packed_size + result.window as u64);
            let (packed, _) = compress_channel(channel, result.window, config.strategy).unwrap();
            assert_eq!(packed.len() as u64, result.packed_size);
        }

        let tuned = PackConfig {
            channel_windows: windows.iter().map(|w| w.window).collect(),
            ..config
        };
        let mut output = Vec::new();
        let stats = SingleThreadedPacker::new(tuned).pack(&channels, &mut output).unwrap();
        let used: Vec<usize> = stats.channels.iter().map(|c| c.window).collect();
        assert_eq!(used, vec![24, 104, 312]);
    }

    #[test]
    fn test_channel_windows_no_candidates() {
        let channels = periodic_channels(10, 2);
        let windows = tune_channel_windows(&channels, &PackConfig::default(), []).unwrap();
        assert!(windows.is_empty());
    }

    #[test]
    fn test_two_pass() {
        let channels = periodic_channels(150, 2);
        let config = PackConfig { num_threads: 2, ..Default::default() };
        let best = tune_window_two_pass(&channels, &config).unwrap().unwrap();

        // broad pass: 31 candidates, winner 160; narrow pass: 128..=192 step 2
        assert_eq!(best.evaluated, 31 + 33);
        assert_eq!(best.window, 150);

        let direct = tune_window(&channels, &config, [best.window]).unwrap().unwrap();
        assert_eq!(direct.score, best.score);
    }
}
