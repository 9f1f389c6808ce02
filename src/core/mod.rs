pub mod ports;
pub mod snapshot;

pub use ports::Storage;
pub use snapshot::{SiteContent, SnapshotEngine, SNAPSHOT_FILE};
