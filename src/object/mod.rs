pub mod commit;
pub mod store;

pub use commit::{commit_exists, read_commit, write_commit};
pub use store::{list_objects, object_exists, object_path, read_object, write_object};
