mod commit;
mod entry;

pub use commit::{now_timestamp, Commit};
pub use entry::IndexEntry;
