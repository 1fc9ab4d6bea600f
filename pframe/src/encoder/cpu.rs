//! Motion search primitives implemented on the CPU

mod gather;
mod refine;
mod sad;
mod search;

pub use gather::gather;
pub use refine::refine;
pub use search::{coarse_search, SearchWindow};
