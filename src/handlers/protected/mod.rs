// handlers/protected/mod.rs - routed tier (JWT + provincial database)
//
// Every route here runs behind jwt_auth_middleware and
// provincial_db_middleware, so handlers receive a live ProvincialDb
// extension for the user's province.

pub mod schemas;
pub mod sync;
