// handlers/admin/mod.rs - admin tier (JWT + admin gate)

pub mod users;
