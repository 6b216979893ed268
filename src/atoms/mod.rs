// ── Kaori Atoms Layer ──────────────────────────────────────────────────────
// Pure constants and error types for the runtime — zero side effects, no I/O.
// Nothing here may import from engine/, config.rs, or lib.rs.

pub mod constants;
pub mod error;
