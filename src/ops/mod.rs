//! high-level operations on ogit repositories

mod add;
mod commit;
mod fsck;
mod log;
mod status;

pub use add::{add, AddOutcome};
pub use commit::commit;
pub use fsck::{fsck, CorruptObject, FsckReport, MissingObject, ObjectType};
pub use log::{log, log_entries, Log, LogEntry};
pub use status::{status, Status};
