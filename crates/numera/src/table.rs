use crate::error::Result;
use crate::plan::{ScanRequest, plan_streams};
use crate::stream::StreamSet;

/// The virtual `numbers` table: every natural number, one `u64` column,
/// nothing stored behind it.
///
/// This is the thin metadata shell a catalog registers and a query planner
/// asks capability questions of. Reading it plans a set of parallel block
/// sources; no value exists until those are pulled.
///
/// ```
/// use numera::NumbersTable;
///
/// let table = NumbersTable::with_range(true, Some(1_000), 0);
/// let streams = table.read(4, 256)?;
/// assert_eq!(streams.len(), 4);
/// # Ok::<(), numera::Error>(())
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumbersTable {
    multithreaded: bool,
    even_distribution: bool,
    limit: Option<u64>,
    offset: u64,
}

impl NumbersTable {
    /// An unbounded table starting at zero.
    pub fn new(multithreaded: bool) -> Self {
        Self::with_range(multithreaded, None, 0)
    }

    /// A table restricted to `limit` values starting at `offset`.
    ///
    /// Even distribution is the default for parallel bounded reads; see
    /// [`Self::with_even_distribution`].
    pub fn with_range(multithreaded: bool, limit: Option<u64>, offset: u64) -> Self {
        Self {
            multithreaded,
            even_distribution: true,
            limit,
            offset,
        }
    }

    /// Selects between static partitioning and dynamic dispensing for
    /// parallel bounded reads.
    pub fn with_even_distribution(mut self, even_distribution: bool) -> Self {
        self.even_distribution = even_distribution;
        self
    }

    /// Table name as registered in the catalog.
    pub fn name(&self) -> &'static str {
        "numbers"
    }

    /// The single column every block fills.
    pub fn column_name(&self) -> &'static str {
        "number"
    }

    /// Total number of values a read will emit, if bounded.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// First value a read will emit.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Plans a read as up to `streams` parallel block sources.
    ///
    /// A table constructed single-threaded ignores the requested parallelism
    /// and plans exactly one stream, which also pins the output to ascending
    /// order.
    ///
    /// # Errors
    ///
    /// Propagates the planner's validation errors for a zero stream count or
    /// a zero `max_block_size`.
    pub fn read(&self, streams: usize, max_block_size: usize) -> Result<StreamSet> {
        let streams = if self.multithreaded { streams } else { 1 };
        plan_streams(&ScanRequest {
            offset: self.offset,
            limit: self.limit,
            streams,
            block_size: max_block_size,
            even_distribution: self.even_distribution,
        })
    }

    /// Any worker may consume any stream: parallel reads share the work
    /// near-equally and require no particular delivery order across streams.
    pub fn has_evenly_distributed_read(&self) -> bool {
        true
    }

    /// A range predicate such as `number BETWEEN a AND b` can narrow
    /// `offset` and `limit` before the read is planned. This table only
    /// advertises the opportunity; computing the narrowed range is the
    /// caller's job.
    pub fn may_benefit_from_range_pruning(&self) -> bool {
        true
    }

    /// Output depends only on the request parameters, never on persisted
    /// version state, so the table participates in any transaction or
    /// versioning envelope as-is.
    pub fn supports_transactions(&self) -> bool {
        true
    }

    /// Registered under the system schema rather than user data.
    pub fn is_system_table(&self) -> bool {
        true
    }

    /// Streams are already parallel at the source; fanning the output out
    /// again after reading buys nothing.
    pub fn parallelize_output_after_reading(&self) -> bool {
        false
    }
}
