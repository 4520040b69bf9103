pub mod init;
pub mod ping;
pub mod province;
pub mod user;
