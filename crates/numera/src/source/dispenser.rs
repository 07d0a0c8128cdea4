use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::source::Span;

/// Dynamic work distribution over a single shared counter.
///
/// Producers racing for input call [`claim`] and receive disjoint spans of
/// the range, one atomic fetch-and-add per claim. Which producer ends up
/// with which span depends on scheduling; what is guaranteed is that no
/// value is handed out twice and, for a bounded dispenser, that no value in
/// the range is dropped.
///
/// The counter belongs to one generation request: the planner wraps the
/// dispenser in an [`Arc`] shared by that request's producers and it is
/// released with them. Unrelated requests never observe it.
///
/// ## Recommended When
/// - The range is unbounded (a static split is impossible)
/// - Streams are consumed at different rates and load balance matters
///
/// ## See Also
/// - [`EvenPartition`]
///
/// [`claim`]: Self::claim
/// [`Arc`]: std::sync::Arc
/// [`EvenPartition`]: crate::source::EvenPartition
#[derive(Debug)]
pub struct ChunkDispenser {
    #[cfg(feature = "cache-padded")]
    next: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    next: AtomicU64,
    origin: u64,
    bound: Option<u64>,
    chunk_len: u64,
}

impl ChunkDispenser {
    /// A dispenser handing out `total` values starting at `origin`, in
    /// chunks of up to `chunk_len` values.
    pub fn bounded(origin: u64, total: u64, chunk_len: u64) -> Self {
        Self::from_parts(origin, Some(total), chunk_len)
    }

    /// A dispenser handing out chunks from `origin` forever, wrapping
    /// through the top of the 64-bit domain.
    pub fn unbounded(origin: u64, chunk_len: u64) -> Self {
        Self::from_parts(origin, None, chunk_len)
    }

    fn from_parts(origin: u64, bound: Option<u64>, chunk_len: u64) -> Self {
        debug_assert!(chunk_len > 0);
        // A bounded dispenser counts claimed values from zero so the bound
        // check stays a plain comparison; an unbounded one tracks the next
        // value itself and lets the atomic add wrap in hardware.
        let first = if bound.is_some() { 0 } else { origin };
        Self {
            #[cfg(feature = "cache-padded")]
            next: crossbeam_utils::CachePadded::new(AtomicU64::new(first)),
            #[cfg(not(feature = "cache-padded"))]
            next: AtomicU64::new(first),
            origin,
            bound,
            chunk_len,
        }
    }

    /// Claims the next chunk for the calling producer.
    ///
    /// The single fetch-and-add on the shared counter is the only
    /// serialization point: every claim observes a distinct counter value,
    /// so no two producers can receive overlapping spans. `Relaxed` ordering
    /// suffices because claims need uniqueness, not ordering against any
    /// other memory.
    ///
    /// A bounded dispenser returns a short final span once fewer than
    /// `chunk_len` values remain, and the empty span on every claim after
    /// the range is exhausted; claims past the bound overshoot the counter
    /// by at most one chunk each and never reach back into the range. An
    /// unbounded dispenser always returns a full span.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn claim(&self) -> Span {
        match self.bound {
            Some(total) => {
                let claimed = self.next.fetch_add(self.chunk_len, Ordering::Relaxed);
                if claimed >= total {
                    return Span::EMPTY;
                }
                Span::new(
                    self.origin.wrapping_add(claimed),
                    self.chunk_len.min(total - claimed),
                )
            }
            None => Span::new(
                self.next.fetch_add(self.chunk_len, Ordering::Relaxed),
                self.chunk_len,
            ),
        }
    }

    /// Total number of values this dispenser will hand out, if bounded.
    pub fn bound(&self) -> Option<u64> {
        self.bound
    }

    /// Chunk capacity handed out per claim.
    pub fn chunk_len(&self) -> u64 {
        self.chunk_len
    }
}
