pub mod id;
pub mod table;

pub use id::{DatasetId, DEFAULT_RELEASE_BASE};
pub use table::Dataset;
