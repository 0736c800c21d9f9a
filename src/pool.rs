use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Run `f` over `items` with at most `limit` calls in flight.
///
/// Results come back in input order regardless of completion order. The first
/// error fails the whole batch and completed results are dropped.
pub fn run_bounded<T, R, E, F>(items: &[T], limit: usize, f: F) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send + From<ThreadPoolBuildError>,
    F: Fn(usize, &T) -> Result<R, E> + Sync + Send,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let pool = build_pool(limit.max(1).min(items.len()))?;
    pool.install(|| items.par_iter().enumerate().map(|(i, item)| f(i, item)).collect())
}

fn build_pool(threads: usize) -> Result<ThreadPool, ThreadPoolBuildError> {
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("logsift-worker-{i}"))
        .build()
}
