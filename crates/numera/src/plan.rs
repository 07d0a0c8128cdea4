use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::{Error, Result};
use crate::generator::BlockGenerator;
use crate::source::{ChunkDispenser, EvenPartition, Span};
use crate::stream::StreamSet;

/// Default number of values packed per block.
pub const DEFAULT_BLOCK_SIZE: usize = 65_536;

/// Parameters of one generation request.
///
/// A request is immutable for the lifetime of the streams planned from it.
/// The defaults describe the most common scan: start at zero, unbounded,
/// one stream, [`DEFAULT_BLOCK_SIZE`] values per block.
///
/// ```
/// use numera::ScanRequest;
///
/// let request = ScanRequest::new()
///     .with_offset(100)
///     .with_limit(1_000)
///     .with_streams(4);
/// assert_eq!(request.limit, Some(1_000));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanRequest {
    /// First value to emit.
    pub offset: u64,
    /// Total number of values to emit across all streams. `None` keeps
    /// producing until the consumer stops pulling.
    pub limit: Option<u64>,
    /// Requested degree of parallelism.
    pub streams: usize,
    /// Capacity hint for emitted blocks. The final block of a bounded range
    /// is rounded down to the remaining count.
    pub block_size: usize,
    /// Prefer a static near-equal split over dynamic dispensing when the
    /// request is bounded and parallel. Ignored for unbounded requests,
    /// which cannot be pre-partitioned.
    pub even_distribution: bool,
}

impl Default for ScanRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: None,
            streams: 1,
            block_size: DEFAULT_BLOCK_SIZE,
            even_distribution: true,
        }
    }
}

impl ScanRequest {
    /// An unbounded single-stream scan starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first value to emit.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Bounds the scan to `limit` values in total.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the requested degree of parallelism.
    pub fn with_streams(mut self, streams: usize) -> Self {
        self.streams = streams;
        self
    }

    /// Sets the block capacity hint.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Selects between static partitioning and dynamic dispensing for
    /// bounded parallel scans.
    pub fn with_even_distribution(mut self, even_distribution: bool) -> Self {
        self.even_distribution = even_distribution;
        self
    }
}

/// Plans a generation request into its parallel streams.
///
/// Strategy selection:
///
/// - No limit: every stream pulls chunks from one shared unbounded
///   [`ChunkDispenser`], whatever the distribution preference says. A static
///   partition of an unbounded range is impossible.
/// - Limit with one effective stream: a single generator walks
///   `[offset, offset + limit)` directly, with no allocator in between.
/// - Limit, parallel, even distribution: an [`EvenPartition`] assigns each
///   stream a fixed near-equal sub-range; no coordination happens after
///   planning.
/// - Limit, parallel, uneven: all streams share one bounded
///   [`ChunkDispenser`] and race for chunks, trading per-stream determinism
///   for load balance.
///
/// Streams that could never produce a value are not created: when `limit`
/// is smaller than the requested stream count the set is planned with
/// `limit` streams, and a zero limit plans an empty set. The caller reads
/// the actual count off [`StreamSet::len`].
///
/// Planning has no side effects; no value is generated until a stream is
/// pulled.
///
/// # Errors
///
/// - [`Error::ZeroStreams`] if `request.streams` is zero.
/// - [`Error::ZeroBlockSize`] if `request.block_size` is zero.
///
/// [`ChunkDispenser`]: crate::source::ChunkDispenser
/// [`EvenPartition`]: crate::source::EvenPartition
/// [`StreamSet::len`]: crate::StreamSet::len
#[cfg_attr(feature = "tracing", instrument(level = "debug"))]
pub fn plan_streams(request: &ScanRequest) -> Result<StreamSet> {
    if request.streams == 0 {
        return Err(Error::ZeroStreams);
    }
    if request.block_size == 0 {
        return Err(Error::ZeroBlockSize);
    }

    let Some(limit) = request.limit else {
        let dispenser = Arc::new(ChunkDispenser::unbounded(
            request.offset,
            request.block_size as u64,
        ));
        let generators = (0..request.streams)
            .map(|_| BlockGenerator::shared(request.block_size, Arc::clone(&dispenser)))
            .collect();
        return Ok(StreamSet::new(generators));
    };

    // Streams beyond what the limit can feed would be born exhausted; they
    // are elided rather than created empty, so the set length reflects the
    // streams that can actually produce.
    let lanes = (request.streams as u64).min(limit);

    let generators = if lanes <= 1 {
        // Covers both the empty scan (no streams at all) and the
        // single-stream walk of the whole range.
        (0..lanes)
            .map(|_| BlockGenerator::fixed(request.block_size, Span::new(request.offset, limit)))
            .collect()
    } else if request.even_distribution {
        EvenPartition::new(request.offset, limit, lanes)
            .spans()
            .map(|span| BlockGenerator::fixed(request.block_size, span))
            .collect()
    } else {
        let dispenser = Arc::new(ChunkDispenser::bounded(
            request.offset,
            limit,
            request.block_size as u64,
        ));
        (0..lanes)
            .map(|_| BlockGenerator::shared(request.block_size, Arc::clone(&dispenser)))
            .collect()
    };

    Ok(StreamSet::new(generators))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::thread::scope;

    use super::*;

    fn drain_all(set: StreamSet) -> Vec<u64> {
        let mut values = Vec::new();
        for generator in set {
            for block in generator {
                values.extend_from_slice(block.as_slice());
            }
        }
        values
    }

    fn expected_values(offset: u64, limit: u64) -> Vec<u64> {
        (0..limit).map(|k| offset.wrapping_add(k)).collect()
    }

    #[test]
    fn bounded_scans_cover_the_range_exactly_once() {
        for streams in [1usize, 2, 5, 17] {
            for even_distribution in [true, false] {
                for (offset, limit) in [(0u64, 100u64), (41, 97), (u64::MAX - 10, 30)] {
                    let request = ScanRequest::new()
                        .with_offset(offset)
                        .with_limit(limit)
                        .with_streams(streams)
                        .with_block_size(7)
                        .with_even_distribution(even_distribution);

                    let mut values = drain_all(plan_streams(&request).unwrap());
                    assert_eq!(
                        values.len() as u64,
                        limit,
                        "streams={streams} even={even_distribution} offset={offset}"
                    );

                    let mut expected = expected_values(offset, limit);
                    values.sort_unstable();
                    expected.sort_unstable();
                    assert_eq!(
                        values, expected,
                        "streams={streams} even={even_distribution} offset={offset}"
                    );
                }
            }
        }
    }

    #[test]
    fn values_ascend_within_each_stream() {
        for even_distribution in [true, false] {
            let request = ScanRequest::new()
                .with_limit(1_000)
                .with_streams(4)
                .with_block_size(16)
                .with_even_distribution(even_distribution);

            for generator in plan_streams(&request).unwrap() {
                let values: Vec<u64> = generator.flatten().collect();
                assert!(
                    values.windows(2).all(|pair| pair[0] < pair[1]),
                    "even={even_distribution}"
                );
            }
        }
    }

    #[test]
    fn single_stream_emits_in_request_order() {
        let request = ScanRequest::new()
            .with_offset(u64::MAX - 2)
            .with_limit(5)
            .with_block_size(4);

        let values = drain_all(plan_streams(&request).unwrap());
        assert_eq!(values, vec![u64::MAX - 2, u64::MAX - 1, u64::MAX, 0, 1]);
    }

    #[test]
    fn surplus_streams_are_elided() {
        let request = ScanRequest::new()
            .with_offset(9)
            .with_limit(2)
            .with_streams(5)
            .with_block_size(4);

        let set = plan_streams(&request).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(drain_all(set), vec![9, 10]);
    }

    #[test]
    fn zero_limit_plans_an_empty_set() {
        let request = ScanRequest::new().with_limit(0).with_streams(3);
        let set = plan_streams(&request).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn zero_streams_is_a_planning_error() {
        let request = ScanRequest::new().with_streams(0);
        assert_eq!(plan_streams(&request).unwrap_err(), Error::ZeroStreams);
    }

    #[test]
    fn zero_block_size_is_a_planning_error() {
        let request = ScanRequest::new().with_block_size(0);
        assert_eq!(plan_streams(&request).unwrap_err(), Error::ZeroBlockSize);
    }

    #[test]
    fn unbounded_streams_always_fill_their_blocks() {
        let request = ScanRequest::new().with_streams(4).with_block_size(32);
        let mut set = plan_streams(&request).unwrap();
        assert_eq!(set.len(), 4);

        for generator in set.iter_mut() {
            for _ in 0..8 {
                let block = generator.next_block().expect("unbounded streams never end");
                assert_eq!(block.len(), 32);
            }
        }
    }

    #[test]
    fn unbounded_chunks_do_not_overlap_across_streams() {
        let request = ScanRequest::new()
            .with_offset(500)
            .with_streams(4)
            .with_block_size(8);

        let mut seen = HashSet::new();
        for generator in plan_streams(&request).unwrap().iter_mut() {
            for _ in 0..16 {
                let block = generator.next_block().unwrap();
                for value in &block {
                    assert!(seen.insert(*value), "value {value} claimed twice");
                }
            }
        }
        assert_eq!(seen.len(), 4 * 16 * 8);
    }

    #[test]
    fn dispensed_scan_survives_concurrent_pulling() {
        const LIMIT: u64 = 10_000;

        let request = ScanRequest::new()
            .with_limit(LIMIT)
            .with_streams(5)
            .with_block_size(64)
            .with_even_distribution(false);

        let generators = plan_streams(&request).unwrap().into_vec();
        let seen = Arc::new(Mutex::new(HashSet::with_capacity(LIMIT as usize)));

        scope(|s| {
            for generator in generators {
                let seen = Arc::clone(&seen);
                s.spawn(move || {
                    for block in generator {
                        let mut seen = seen.lock().unwrap();
                        for value in &block {
                            assert!(seen.insert(*value), "value {value} emitted twice");
                        }
                    }
                });
            }
        });

        assert_eq!(seen.lock().unwrap().len(), LIMIT as usize);
    }

    #[test]
    fn abandoning_a_stream_leaves_the_rest_complete() {
        let request = ScanRequest::new()
            .with_limit(100)
            .with_streams(3)
            .with_block_size(10)
            .with_even_distribution(false);

        let mut generators = plan_streams(&request).unwrap().into_vec();

        // One stream claims a single chunk and is dropped mid-scan.
        let mut abandoned = generators.pop().unwrap();
        let first = abandoned.next_block().unwrap();
        drop(abandoned);

        let mut values: Vec<u64> = first.into_vec();
        for generator in generators {
            for block in generator {
                values.extend_from_slice(block.as_slice());
            }
        }

        // The abandoned stream's unclaimed share was picked up by the rest.
        values.sort_unstable();
        let expected: Vec<u64> = (0..100).collect();
        assert_eq!(values, expected);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn scan_request_round_trips_through_json() {
        let request = ScanRequest::new()
            .with_offset(10)
            .with_limit(500)
            .with_streams(2)
            .with_even_distribution(false);

        let encoded = serde_json::to_string(&request).unwrap();
        let decoded: ScanRequest = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, request);
    }
}
