use std::sync::Arc;

use crate::block::NumberBlock;
use crate::source::{ChunkDispenser, Span};

/// One independent, pull-based producer of number blocks.
///
/// A generator owns its cursor exclusively: the planner hands each one to a
/// single worker and nothing on the pull path synchronizes. Fixed generators
/// walk a sub-range decided at planning time; shared generators refill from
/// their request's [`ChunkDispenser`] whenever the current allotment drains.
///
/// Dropping a generator at any point is a valid way to stop consuming it.
/// A shared generator that is dropped simply stops claiming chunks; the
/// dispenser remains intact for the remaining streams.
///
/// [`ChunkDispenser`]: crate::source::ChunkDispenser
#[derive(Debug)]
pub struct BlockGenerator {
    span: Span,
    block_size: usize,
    refill: Option<Arc<ChunkDispenser>>,
}

impl BlockGenerator {
    /// A generator walking exactly `span`, with nothing after it.
    pub(crate) fn fixed(block_size: usize, span: Span) -> Self {
        debug_assert!(block_size > 0);
        Self {
            span,
            block_size,
            refill: None,
        }
    }

    /// A generator that claims its allotments from `dispenser`.
    pub(crate) fn shared(block_size: usize, dispenser: Arc<ChunkDispenser>) -> Self {
        debug_assert!(block_size > 0);
        Self {
            span: Span::EMPTY,
            block_size,
            refill: Some(dispenser),
        }
    }

    /// Produces the next block, or `None` once this stream is exhausted.
    ///
    /// Each block carries `min(block_size, remaining)` consecutive values
    /// and wraps through the top of the 64-bit domain without interruption.
    /// A generator backed by an unbounded dispenser never returns `None`;
    /// stopping is the consumer's decision.
    pub fn next_block(&mut self) -> Option<NumberBlock> {
        if self.span.is_empty() {
            let dispenser = self.refill.as_ref()?;
            self.span = dispenser.claim();
            if self.span.is_empty() {
                // Exhausted for good. Drop the handle so repeated pulls on a
                // finished stream stop touching the shared counter.
                self.refill = None;
                return None;
            }
        }

        let take = self.span.len.min(self.block_size as u64);
        let block = NumberBlock::consecutive(self.span.start, take as usize);
        self.span = self.span.advance(take);
        Some(block)
    }

    /// Capacity hint this generator packs blocks to.
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

impl Iterator for BlockGenerator {
    type Item = NumberBlock;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_block()
    }
}
