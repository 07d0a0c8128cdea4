use crate::generator::BlockGenerator;

/// The planned collection of parallel sources for one request.
///
/// Holds exactly the producers the planner decided to create, in range
/// order. Each producer is meant to be moved to its own worker and pulled
/// independently; the set itself is just the hand-off container and imposes
/// no delivery order across streams.
#[derive(Debug)]
pub struct StreamSet {
    generators: Vec<BlockGenerator>,
}

impl StreamSet {
    pub(crate) fn new(generators: Vec<BlockGenerator>) -> Self {
        Self { generators }
    }

    /// Number of streams actually planned.
    ///
    /// May be lower than the requested parallelism when the limit could not
    /// feed every stream.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Whether the set holds no streams at all (a zero-limit scan).
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Iterates over the streams in place.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut BlockGenerator> {
        self.generators.iter_mut()
    }

    /// Consumes the set, returning the streams for distribution to workers.
    pub fn into_vec(self) -> Vec<BlockGenerator> {
        self.generators
    }

    /// Consumes the set, wrapping every stream for async consumption.
    #[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
    #[cfg(feature = "futures")]
    pub fn into_streams(self) -> Vec<crate::BlockStream> {
        use crate::IntoBlockStream;

        self.generators
            .into_iter()
            .map(BlockGenerator::into_stream)
            .collect()
    }
}

impl IntoIterator for StreamSet {
    type Item = BlockGenerator;
    type IntoIter = std::vec::IntoIter<BlockGenerator>;

    fn into_iter(self) -> Self::IntoIter {
        self.generators.into_iter()
    }
}
