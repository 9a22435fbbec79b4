//! Parallel packer using a worker pool.
//!
//! Architecture:
//! - Dispatcher thread: send one job per channel (or per tuning candidate)
//! - Worker pool: run jobs in parallel
//! - Calling thread: collect results, restore job order, write the container

use std::collections::BTreeMap;
use std::io::{BufWriter, Write};

use crossbeam::channel::{bounded, Receiver, Sender};

use super::channel::pack_channel;
use super::write_packed;
use crate::error::{Error, Result};
use crate::{PackConfig, PackStats, Packer};

/// Outcome of one job, tagged with its position for reordering
struct JobResult<T> {
    index: usize,
    result: Result<T>,
}

/// Resolve a thread count setting (0 = auto) to 1..=32 workers
pub(crate) fn effective_threads(num_threads: usize) -> usize {
    match num_threads {
        0 => num_cpus::get().clamp(1, 32),
        n => n.clamp(1, 32),
    }
}

/// Run `work` over `jobs` on up to `num_threads` workers
///
/// Results come back in job order. When several jobs fail, the error of the
/// lowest job index is reported.
pub(crate) fn run_jobs<J, T, F>(jobs: Vec<J>, num_threads: usize, work: F) -> Result<Vec<T>>
where
    J: Send,
    T: Send,
    F: Fn(J) -> Result<T> + Sync,
{
    let num_threads = num_threads.min(jobs.len()).max(1);
    if num_threads == 1 {
        return jobs.into_iter().map(work).collect();
    }

    let expected = jobs.len();
    let channel_capacity = num_threads * 4;

    let (job_tx, job_rx): (Sender<(usize, J)>, Receiver<(usize, J)>) = bounded(channel_capacity);
    let (result_tx, result_rx): (Sender<JobResult<T>>, Receiver<JobResult<T>>) =
        bounded(channel_capacity);

    let work = &work;
    let result = crossbeam::scope(|scope| {
        for _ in 0..num_threads {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();

            scope.spawn(move |_| worker_thread(job_rx, result_tx, work));
        }

        drop(job_rx);
        drop(result_tx);

        scope.spawn(move |_| {
            for job in jobs.into_iter().enumerate() {
                if job_tx.send(job).is_err() {
                    break;
                }
            }
        });

        collect_in_order(result_rx, expected)
    });

    result.map_err(|_| Error::Internal("Thread panicked".to_string()))?
}

/// Worker thread that runs jobs until the queue closes
fn worker_thread<J, T, F>(job_rx: Receiver<(usize, J)>, result_tx: Sender<JobResult<T>>, work: &F)
where
    F: Fn(J) -> Result<T>,
{
    for (index, job) in job_rx {
        let result = work(job);
        if result_tx.send(JobResult { index, result }).is_err() {
            break;
        }
    }
}

/// Receive every result and return them in job order
fn collect_in_order<T>(result_rx: Receiver<JobResult<T>>, expected: usize) -> Result<Vec<T>> {
    let mut done: BTreeMap<usize, T> = BTreeMap::new();
    let mut first_error: Option<(usize, Error)> = None;
    let mut received = 0;

    while received < expected {
        let job = result_rx
            .recv()
            .map_err(|_| Error::Internal("Result channel disconnected".to_string()))?;
        received += 1;

        match job.result {
            Ok(value) => {
                done.insert(job.index, value);
            }
            Err(e) => {
                if first_error.as_ref().map_or(true, |(index, _)| job.index < *index) {
                    first_error = Some((job.index, e));
                }
            }
        }
    }

    if let Some((_, e)) = first_error {
        return Err(e);
    }
    Ok(done.into_values().collect())
}

/// Parallel packer implementation
pub struct ParallelPacker {
    config: PackConfig,
}

impl ParallelPacker {
    pub fn new(config: PackConfig) -> Self {
        Self { config }
    }

    pub(crate) fn effective_threads(&self) -> usize {
        effective_threads(self.config.num_threads)
    }
}

impl Packer for ParallelPacker {
    fn pack<C, W>(&mut self, channels: &[C], output: W) -> Result<PackStats>
    where
        C: AsRef<[u8]> + Sync,
        W: Write,
    {
        let num_threads = self.effective_threads().min(channels.len().max(1));

        if num_threads == 1 {
            let mut single = super::single::SingleThreadedPacker::new(self.config.clone());
            return single.pack(channels, output);
        }

        let config = &self.config;
        let packed = run_jobs((0..channels.len()).collect(), num_threads, |index: usize| {
            pack_channel(
                index,
                channels[index].as_ref(),
                config.window_for(index),
                config.strategy,
                config.verify,
            )
        })?;
        write_packed(&packed, BufWriter::new(output), self.config.verify)
    }
}
