pub mod province;
pub mod sync;
pub mod user;

pub use province::Province;
pub use sync::{ParcelRow, SyncCreds};
pub use user::{Admin, User, UserAccessView};
