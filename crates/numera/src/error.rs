/// A result type for planning-time validation.
pub type Result<T> = core::result::Result<T, Error>;

/// All possible errors `numera` can produce.
///
/// Every variant is a configuration error surfaced when a scan is planned,
/// before any stream exists. Block production itself is infallible: once a
/// [`StreamSet`] has been handed out, pulling blocks can no longer fail, so
/// generators signal exhaustion with `None` rather than an error.
///
/// Arithmetic at the top of the 64-bit domain is not an error either; values
/// and counters wrap modulo 2^64 and generation continues.
///
/// [`StreamSet`]: crate::StreamSet
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The request asked for zero parallel streams.
    #[error("scan requires at least one stream")]
    ZeroStreams,

    /// The request asked for empty blocks.
    #[error("scan requires a block size of at least one value")]
    ZeroBlockSize,
}
