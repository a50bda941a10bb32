//! Running independent property checks on worker threads.
//!
//! Shrink trees and arbitraries are single-threaded values, so nothing is
//! shared between jobs: each job builds its own property, runs it, and
//! returns a `Send` summary of the outcome.

use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::error::{Result, WhittleError};
use crate::sample::Failure;

/// Configuration for parallel execution
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of worker threads
    pub num_threads: usize,
    /// Run jobs on the calling thread when disabled
    pub enabled: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            enabled: true,
        }
    }
}

impl ParallelConfig {
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads,
            ..Self::default()
        }
    }

    pub fn sequential() -> Self {
        Self {
            num_threads: 1,
            enabled: false,
        }
    }
}

fn worker_panicked(worker: usize, payload: &(dyn std::any::Any + Send)) -> WhittleError {
    WhittleError::WorkerPanicked {
        worker,
        message: Failure::from_panic(payload).message,
    }
}

/// Run every job and return the results in submission order.
///
/// Jobs are dealt round-robin to at most `num_threads` scoped threads. A
/// panicking job fails the whole run.
pub fn run_all<J, R>(jobs: Vec<J>, config: &ParallelConfig) -> Result<Vec<R>>
where
    J: FnOnce() -> R + Send,
    R: Send,
{
    if jobs.is_empty() {
        return Ok(Vec::new());
    }

    let threads = config.num_threads.clamp(1, jobs.len());
    if !config.enabled || threads == 1 {
        return jobs
            .into_iter()
            .map(|job| {
                panic::catch_unwind(AssertUnwindSafe(job))
                    .map_err(|payload| worker_panicked(0, payload.as_ref()))
            })
            .collect();
    }

    let mut batches: Vec<Vec<(usize, J)>> = (0..threads).map(|_| Vec::new()).collect();
    for (index, job) in jobs.into_iter().enumerate() {
        batches[index % threads].push((index, job));
    }

    let joined = crossbeam::scope(|s| {
        let handles: Vec<_> = batches
            .into_iter()
            .enumerate()
            .map(|(worker, batch)| {
                s.spawn(move |_| {
                    debug!(worker, jobs = batch.len(), "worker started");
                    batch
                        .into_iter()
                        .map(|(index, job)| (index, job()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| {
                handle
                    .join()
                    .map_err(|payload| worker_panicked(worker, payload.as_ref()))
            })
            .collect::<Result<Vec<_>>>()
    })
    .map_err(|payload| worker_panicked(0, payload.as_ref()))??;

    let mut results: Vec<(usize, R)> = joined.into_iter().flatten().collect();
    results.sort_by_key(|(index, _)| *index);
    Ok(results.into_iter().map(|(_, result)| result).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitraries::integers;
    use crate::config::PropertyConfig;
    use crate::property::for_all;

    #[test]
    fn test_results_keep_submission_order() {
        let jobs: Vec<_> = (0..20u64).map(|i| move || i * i).collect();
        let results = run_all(jobs, &ParallelConfig::with_threads(4)).unwrap();
        assert_eq!(results, (0..20u64).map(|i| i * i).collect::<Vec<_>>());
    }

    #[test]
    fn test_sequential_and_empty() {
        let jobs: Vec<_> = (0..3).map(|i| move || i + 1).collect();
        assert_eq!(run_all(jobs, &ParallelConfig::sequential()).unwrap(), vec![1, 2, 3]);

        let none: Vec<fn() -> u8> = Vec::new();
        assert!(run_all(none, &ParallelConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_panicking_job_fails_the_run() {
        let jobs: Vec<Box<dyn FnOnce() -> u8 + Send>> = vec![
            Box::new(|| 1u8),
            Box::new(|| -> u8 { panic!("job failed") }),
            Box::new(|| 3u8),
        ];
        let error = run_all(jobs, &ParallelConfig::with_threads(3)).unwrap_err();
        assert_eq!(
            error,
            WhittleError::WorkerPanicked {
                worker: 1,
                message: "job failed".to_string()
            }
        );
    }

    #[test]
    fn test_independent_properties() {
        let jobs: Vec<_> = (0..4u64)
            .map(|seed| {
                move || {
                    let config = PropertyConfig::default().with_seed(seed).with_tries(200);
                    let report =
                        for_all(config, integers::<i32>().between(0, 1000), |v| *v < 500)?;
                    Ok::<_, WhittleError>(
                        report
                            .shrunk_parameters()
                            .map(|parameters| format!("{:?}", parameters)),
                    )
                }
            })
            .collect();

        let results = run_all(jobs, &ParallelConfig::with_threads(2)).unwrap();
        assert_eq!(results.len(), 4);
        for result in results {
            assert_eq!(result.unwrap(), Some("[500]".to_string()));
        }
    }
}
