// ── Kaori Atoms Layer ──────────────────────────────────────────────────────
// Pure constants, error types and mood data types — no I/O, no locking.
// Dependency rule: atoms may only depend on std and external pure crates.
// Nothing here may import from mood/, config.rs or engine.rs.

pub mod constants;
pub mod error;
pub mod types;
