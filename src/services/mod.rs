pub mod directory_service;
pub mod sync_service;

pub use directory_service::{DirectoryError, DirectoryService};
pub use sync_service::{MatchStrategy, SyncError, SyncOutcome, SyncService};
