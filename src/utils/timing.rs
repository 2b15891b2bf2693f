//! Wall-clock timing bounded by group barriers.

use crate::error::RegError;
use crate::parallel::Comm;
use std::time::{Duration, Instant};

/// Barrier, run `f`, barrier; the elapsed time covers the slowest rank.
///
/// The barriers run even when `f` fails, so no rank is left waiting.
pub fn timed<C, R, F>(comm: &C, f: F) -> Result<(R, Duration), RegError>
where
    C: Comm,
    F: FnOnce() -> R,
{
    comm.barrier()?;
    let start = Instant::now();
    let out = f();
    comm.barrier()?;
    Ok((out, start.elapsed()))
}
