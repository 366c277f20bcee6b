// handlers/public/auth/mod.rs - Operator OAuth flow
//
// login stores the anti-forgery token and redirects to Discord, callback
// consumes it and authenticates the session, logout destroys it.

pub mod callback;
pub mod login;
pub mod logout;

pub use callback::callback_get;
pub use login::login_get;
pub use logout::logout_get;
