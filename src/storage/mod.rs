pub mod remote;

pub use remote::{ObjectStorage, PartTable, RemoteError, SelectQuery};
