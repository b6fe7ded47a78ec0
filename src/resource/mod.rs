mod handle;
mod locator;

pub use handle::{read_bounded_line, HandleKind, ResourceHandle};
pub use locator::Locator;
