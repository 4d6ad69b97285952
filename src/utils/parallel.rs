//! Fan-out / fan-in worker pool.

use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};
use std::sync::mpsc;

/// Run `task` on every unit in a dedicated rayon pool and collect the
/// results in unit order.
///
/// Each task receives its unit index, so callers can derive per-unit seeds
/// that do not depend on scheduling. `workers = None` uses one thread per
/// logical CPU.
pub fn fan_out<T, R, F>(
    units: Vec<T>,
    workers: Option<usize>,
    task: F,
) -> Result<Vec<R>, ThreadPoolBuildError>
where
    T: Send,
    R: Send,
    F: Fn(usize, T) -> R + Sync,
{
    let mut builder = ThreadPoolBuilder::new();
    if let Some(n) = workers {
        builder = builder.num_threads(n);
    }
    let pool = builder.build()?;

    let (tx, rx) = mpsc::channel();
    let task = &task;
    pool.scope(|scope| {
        for (idx, unit) in units.into_iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move |_| {
                // The receiver outlives the scope, so sending cannot fail
                let _ = tx.send((idx, task(idx, unit)));
            });
        }
    });
    drop(tx);

    let mut results: Vec<(usize, R)> = rx.into_iter().collect();
    results.sort_by_key(|(idx, _)| *idx);
    Ok(results.into_iter().map(|(_, r)| r).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_in_unit_order() {
        let units: Vec<u64> = (0..64).collect();
        let out = fan_out(units, Some(4), |idx, x| (idx as u64) * 1000 + x * x).unwrap();
        for (i, v) in out.iter().enumerate() {
            let i = i as u64;
            assert_eq!(*v, i * 1000 + i * i);
        }
    }

    #[test]
    fn test_empty_input() {
        let out: Vec<u8> = fan_out(Vec::<u8>::new(), None, |_, x| x).unwrap();
        assert!(out.is_empty());
    }
}
