use crate::source::Span;

/// A static, order-preserving partition of a bounded range into near-equal
/// contiguous lanes.
///
/// The partition is fully determined at construction time: lane lengths
/// differ by at most one, the first `total % lanes` lanes carry the extra
/// value, and lane starts ascend with the lane index. Nothing is shared and
/// nothing is mutated afterwards, so producers walking different lanes need
/// no coordination at all.
///
/// ## Recommended When
/// - The range is bounded and known up front
/// - Per-stream determinism matters more than load balance
///
/// ## See Also
/// - [`ChunkDispenser`]
///
/// [`ChunkDispenser`]: crate::source::ChunkDispenser
#[derive(Clone, Copy, Debug)]
pub struct EvenPartition {
    offset: u64,
    total: u64,
    lanes: u64,
}

impl EvenPartition {
    /// Partitions `total` values starting at `offset` into `lanes` lanes.
    ///
    /// # Panics
    ///
    /// Panics if `lanes` is zero. Scan planning validates the stream count
    /// before any partition is built.
    pub fn new(offset: u64, total: u64, lanes: u64) -> Self {
        assert!(lanes > 0, "a partition needs at least one lane");
        Self {
            offset,
            total,
            lanes,
        }
    }

    /// Number of lanes in the partition.
    pub fn lanes(&self) -> u64 {
        self.lanes
    }

    /// The sub-range assigned to `lane`.
    ///
    /// When there are more lanes than values, trailing lanes come back
    /// empty.
    pub fn span(&self, lane: u64) -> Span {
        debug_assert!(lane < self.lanes);
        let base = self.total / self.lanes;
        let extra = self.total % self.lanes;
        let len = base + u64::from(lane < extra);
        // Values handed to lanes before this one. `base <= total / lanes`
        // keeps the product below `total`, so this cannot overflow.
        let before = lane * base + lane.min(extra);
        Span::new(self.offset.wrapping_add(before), len)
    }

    /// All lane spans in lane order.
    pub fn spans(&self) -> impl Iterator<Item = Span> + '_ {
        (0..self.lanes).map(|lane| self.span(lane))
    }
}
