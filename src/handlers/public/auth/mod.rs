// handlers/public/auth/mod.rs - token acquisition endpoints

pub mod login;
pub mod register;

pub use login::login;
pub use register::register;
