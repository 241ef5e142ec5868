pub mod route;
pub mod storage;
pub mod sync;

pub use storage::{CsvStore, MemoryStore};
pub use sync::{InitialSource, RouteParams, SyncState, ViewportSync};
