use core::pin::Pin;
use core::task::{Context, Poll};

use futures::Stream;
use pin_project_lite::pin_project;

use crate::block::NumberBlock;
use crate::generator::BlockGenerator;

pin_project! {
    /// A [`Stream`] face over a [`BlockGenerator`].
    ///
    /// Block production never blocks and never waits on anything external,
    /// so this stream is always ready: `poll_next` returns `Poll::Ready` on
    /// every call and the task is never parked. It exists so planned block
    /// sources can ride in async execution pipelines unchanged.
    ///
    /// [`BlockGenerator`]: crate::BlockGenerator
    #[must_use = "streams do nothing unless polled"]
    pub struct BlockStream {
        generator: BlockGenerator,
    }
}

impl BlockStream {
    /// Unwraps the stream back into its synchronous generator.
    pub fn into_inner(self) -> BlockGenerator {
        self.generator
    }
}

impl Stream for BlockStream {
    type Item = NumberBlock;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.project().generator.next_block())
    }
}

/// Extension trait for pulling a block source as a [`Stream`].
pub trait IntoBlockStream {
    /// Wraps this source for async consumption.
    fn into_stream(self) -> BlockStream;
}

impl IntoBlockStream for BlockGenerator {
    fn into_stream(self) -> BlockStream {
        BlockStream { generator: self }
    }
}
