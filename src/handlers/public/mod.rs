// handlers/public/mod.rs - Public handlers (no session required)
//
// Security Level: None
// Routes: /, /health, /auth/*, /invite/:guild_id
// Middleware: None. Missing configuration surfaces as a 400 from the handler
// that needs it.

pub mod auth;
pub mod health;
pub mod index;
pub mod invite;

pub use auth::*;
pub use health::health_get;
pub use index::index_get;
pub use invite::invite_get;
