#![cfg_attr(docsrs, feature(doc_cfg))]

mod block;
mod error;
#[cfg(feature = "futures")]
mod futures;
mod generator;
mod plan;
mod source;
mod stream;
mod table;

pub use crate::block::*;
pub use crate::error::*;
#[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::plan::*;
pub use crate::source::*;
pub use crate::stream::*;
pub use crate::table::*;
