// handlers/protected/mod.rs - Protected handlers (authenticated operator required)
//
// Security Level: operator session
// Routes: /servers, /select/:guild_id, /api/dashboard-data
// Middleware: require_operator, which injects AuthenticatedOperator and sends
// anonymous sessions to `/`.

pub mod dashboard_data;
pub mod select;
pub mod servers;

pub use dashboard_data::dashboard_data_get;
pub use select::select_get;
pub use servers::servers_get;
