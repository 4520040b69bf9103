pub mod ident;
pub mod manager;
pub mod models;
pub mod registry;

pub use manager::{DatabaseError, DatabaseManager};
