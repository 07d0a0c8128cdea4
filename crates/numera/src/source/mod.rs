mod dispenser;
mod partition;
mod span;

pub use dispenser::*;
pub use partition::*;
pub use span::*;
