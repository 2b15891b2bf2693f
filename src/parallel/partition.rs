//! Row partitioning across a fixed group of participants.
//!
//! The first `n mod P` participants receive `ceil(n / P)` rows and the rest
//! receive `floor(n / P)`, with offsets accumulated in rank order. The
//! resulting ranges are disjoint, ordered and cover `[0, n)` exactly.

use crate::error::RegError;
use std::ops::Range;

/// Per-rank `(count, offset)` pairs over a contiguous index space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    counts: Vec<usize>,
    offsets: Vec<usize>,
}

impl Partition {
    /// Split `n` rows over `parts` participants.
    pub fn rows(n: usize, parts: usize) -> Result<Self, RegError> {
        if n < 1 {
            return Err(RegError::Precondition("cannot partition zero rows".into()));
        }
        if parts < 1 {
            return Err(RegError::Precondition("cannot partition over zero workers".into()));
        }
        let base = n / parts;
        let extra = n % parts;
        let mut counts = Vec::with_capacity(parts);
        let mut offsets = Vec::with_capacity(parts);
        let mut offset = 0;
        for rank in 0..parts {
            let count = if rank < extra { base + 1 } else { base };
            counts.push(count);
            offsets.push(offset);
            offset += count;
        }
        debug_assert_eq!(offset, n);
        Ok(Partition { counts, offsets })
    }

    /// The same partition with every count and offset multiplied by `width`,
    /// i.e. the element ranges of a row-major matrix with `width` columns.
    /// Fails when the scaled total does not fit in `usize`.
    pub fn scaled(&self, width: usize) -> Result<Partition, RegError> {
        // every count and offset is bounded by the total
        self.total().checked_mul(width).ok_or_else(|| {
            RegError::Precondition(format!(
                "{} rows x {width} columns overflows the element count",
                self.total()
            ))
        })?;
        Ok(Partition {
            counts: self.counts.iter().map(|&c| c * width).collect(),
            offsets: self.offsets.iter().map(|&o| o * width).collect(),
        })
    }

    pub fn parts(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, rank: usize) -> usize {
        self.counts[rank]
    }

    pub fn offset(&self, rank: usize) -> usize {
        self.offsets[rank]
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Total number of elements covered.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn range(&self, rank: usize) -> Range<usize> {
        self.offsets[rank]..self.offsets[rank] + self.counts[rank]
    }

    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.parts()).map(move |rank| self.range(rank))
    }
}
