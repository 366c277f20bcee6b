// handlers/scoped/mod.rs - Tenant-scoped handlers (operator + selected guild)
//
// Security Level: scoped session
// Routes: /dashboard, /save-settings, /add-category, /delete-category,
//         /post-panel, /post-panelset
// Middleware: require_scoped_tenant, which injects ScopedTenant and redirects
// to `/` or `/servers` when the session is not there yet.
//
// Every mutation reads the guild from the session and ends in a 302 back to
// /dashboard. Collaborator failures propagate as errors.

pub mod categories;
pub mod dashboard;
pub mod forms;
pub mod panels;
pub mod settings;

pub use categories::{add_category_post, delete_category_post};
pub use dashboard::dashboard_get;
pub use panels::{post_panel_post, post_panelset_post};
pub use settings::save_settings_post;
