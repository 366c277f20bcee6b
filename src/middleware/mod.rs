pub mod response;
pub mod session_gate;

pub use response::{found, ApiResponse, ApiResult};
pub use session_gate::{require_operator, require_scoped_tenant, AuthenticatedOperator, ScopedTenant};
