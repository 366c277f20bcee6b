//! Server-rendered pages. Every interpolated value goes through `html_escape`.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::discord::permissions;
use crate::discord::{InstallationStatus, OperatorIdentity, TenantMembership};
use crate::store::{GuildSettings, TicketCategory};

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        text(title),
        body
    )
}

fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
    }
}

/// Confirmation shown right after the OAuth callback.
pub fn login_success(identity: &OperatorIdentity, memberships: &[TenantMembership]) -> String {
    let mut body = String::new();
    body.push_str("<h2>Ticket Dashboard Login Success</h2>\n");
    body.push_str(&format!(
        "<p>Logged in as <strong>{}</strong></p>\n",
        text(&identity.tag())
    ));
    body.push_str("<h3>Servers</h3>\n<ul>\n");
    for membership in memberships {
        let marker = if permissions::can_manage(membership.permissions) {
            " (Manage Server)"
        } else {
            ""
        };
        body.push_str(&format!("  <li>{}{}</li>\n", text(&membership.name), marker));
    }
    body.push_str("</ul>\n<a href=\"/servers\">Choose a server</a> | <a href=\"/\">Back to dashboard</a>\n");
    page("Login Success", &body)
}

/// Manageable guilds with their bot status and the matching action link.
pub fn server_list(entries: &[(TenantMembership, InstallationStatus)]) -> String {
    let mut body = String::from("<h2>Select a server</h2>\n<ul>\n");
    for (membership, status) in entries {
        let action = match status {
            InstallationStatus::Installed => {
                format!("<a href=\"/select/{}\">Open</a>", attr(&membership.id))
            }
            InstallationStatus::NotInstalled => {
                format!("<a href=\"/invite/{}\">Invite bot</a>", attr(&membership.id))
            }
        };
        body.push_str(&format!(
            "  <li data-status=\"{}\"><strong>{}</strong> - {} {}</li>\n",
            status.as_str(),
            text(&membership.name),
            status.as_str(),
            action
        ));
    }
    body.push_str("</ul>\n");
    if entries.is_empty() {
        body.push_str("<p>No servers where you can manage the server.</p>\n");
    }
    body.push_str("<a href=\"/servers?refresh=true\">Refresh</a> | <a href=\"/\">Back</a>\n");
    page("Select a server", &body)
}

/// Settings form, category list and panel forms for the selected guild.
pub fn dashboard(
    tenant_id: &str,
    tenant_name: &str,
    settings: &GuildSettings,
    categories: &[TicketCategory],
) -> String {
    let mut body = String::from("<h2>Ticket Dashboard</h2>\n");
    body.push_str(&format!(
        "<p>{} <small>Guild ID: {}</small></p>\n",
        text(tenant_name),
        text(tenant_id)
    ));

    body.push_str("<h3>Settings</h3>\n<form method=\"post\" action=\"/save-settings\">\n");
    let fields = [
        ("Parent Category ID", "ticket_parent_channel_id", settings.ticket_parent_channel_id.clone().unwrap_or_default()),
        ("Staff Role ID", "staff_role_id", settings.staff_role_id.clone().unwrap_or_default()),
        ("Timezone", "timezone", settings.timezone.clone()),
        ("Category Slots", "category_slots", settings.category_slots.to_string()),
        ("Warn Threshold", "warn_threshold", settings.warn_threshold.to_string()),
        ("Timeout Minutes", "warn_timeout_minutes", settings.warn_timeout_minutes.to_string()),
    ];
    for (label, name, value) in fields {
        body.push_str(&format!(
            "  <label>{label} <input name=\"{name}\" value=\"{}\"/></label><br/>\n",
            attr(&value)
        ));
    }
    let toggles = [
        ("Smart Replies", "enable_smart_replies", settings.enable_smart_replies),
        ("AI Suggestions", "enable_ai_suggestions", settings.enable_ai_suggestions),
        ("Auto Priority", "enable_auto_priority", settings.enable_auto_priority),
    ];
    for (label, name, on) in toggles {
        body.push_str(&format!(
            "  <label><input type=\"checkbox\" name=\"{name}\"{}/> {label}</label><br/>\n",
            checked(on)
        ));
    }
    body.push_str("  <button type=\"submit\">Save Settings</button>\n</form>\n");

    body.push_str("<h3>Categories</h3>\n<ul>\n");
    for category in categories {
        body.push_str(&format!(
            "  <li>#{} {} - {}</li>\n",
            category.id,
            text(&category.name),
            text(category.description.as_deref().unwrap_or(""))
        ));
    }
    body.push_str("</ul>\n");
    body.push_str(concat!(
        "<form method=\"post\" action=\"/add-category\">\n",
        "  <label>Name <input name=\"name\"/></label>\n",
        "  <label>Description <input name=\"description\"/></label>\n",
        "  <button type=\"submit\">Add Category</button>\n",
        "</form>\n",
        "<form method=\"post\" action=\"/delete-category\">\n",
        "  <label>Category ID <input name=\"category_id\"/></label>\n",
        "  <button type=\"submit\">Delete Category</button>\n",
        "</form>\n",
        "<h3>Post Panels</h3>\n",
        "<form method=\"post\" action=\"/post-panel\">\n",
        "  <label>Channel ID <input name=\"channel_id\"/></label>\n",
        "  <button type=\"submit\">Post Settings Panel</button>\n",
        "</form>\n",
        "<form method=\"post\" action=\"/post-panelset\">\n",
        "  <label>Channel ID <input name=\"channel_id\"/></label>\n",
        "  <button type=\"submit\">Post Public Panel</button>\n",
        "</form>\n",
        "<a href=\"/servers\">Back to servers</a> | <a href=\"/auth/logout\">Log out</a>\n",
    ));

    page("Ticket Dashboard", &body)
}
