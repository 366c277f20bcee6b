// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no session) → Protected (operator session) → Scoped (operator
// session with a selected guild). Each tier gets its gate in server.rs.

pub mod protected;
pub mod public;
pub mod scoped;
