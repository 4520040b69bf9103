// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (JWT + provincial routing) → Admin (JWT + admin gate)

pub mod admin;     // Tier 3: Admin JWT required (/api/admin/*)
pub mod protected; // Tier 2: JWT + provincial database routing (/api/*)
pub mod public;    // Tier 1: No authentication required (/api/auth/*)
