//! Discord message payloads for the settings and ticket-opening panels.

use serde_json::{json, Value};

use crate::store::{GuildSettings, TicketCategory};

/// Categories listed per settings-panel page.
pub const SETTINGS_PAGE_SIZE: usize = 5;

/// Discord caps select menus at 25 options.
pub const MAX_SELECT_OPTIONS: usize = 25;

const ACCENT_COLOR: u32 = 0x5865F2;

const BUTTON: u8 = 2;
const ACTION_ROW: u8 = 1;
const STRING_SELECT: u8 = 3;
const STYLE_PRIMARY: u8 = 1;
const STYLE_SECONDARY: u8 = 2;

fn page_count(items: usize) -> usize {
    items.div_ceil(SETTINGS_PAGE_SIZE).max(1)
}

fn toggle(enabled: bool) -> &'static str {
    if enabled {
        "On"
    } else {
        "Off"
    }
}

fn or_unset(value: Option<&str>) -> String {
    value.map(|v| format!("`{v}`")).unwrap_or_else(|| "not set".to_string())
}

/// Staff-facing panel summarising the guild's settings with one page of
/// categories. `page` is 1-based and clamped to the available range.
pub fn render_settings_panel(settings: &GuildSettings, categories: &[TicketCategory], page: usize) -> Value {
    let pages = page_count(categories.len());
    let page = page.clamp(1, pages);
    let start = (page - 1) * SETTINGS_PAGE_SIZE;

    let listed: Vec<String> = categories
        .iter()
        .skip(start)
        .take(SETTINGS_PAGE_SIZE)
        .map(|c| match c.description.as_deref() {
            Some(d) if !d.is_empty() => format!("**#{}** {} - {}", c.id, c.name, d),
            _ => format!("**#{}** {}", c.id, c.name),
        })
        .collect();
    let category_text = if listed.is_empty() {
        "No categories yet.".to_string()
    } else {
        listed.join("\n")
    };

    json!({
        "embeds": [{
            "title": "Ticket Settings",
            "color": ACCENT_COLOR,
            "fields": [
                {"name": "Ticket parent category", "value": or_unset(settings.ticket_parent_channel_id.as_deref()), "inline": true},
                {"name": "Staff role", "value": or_unset(settings.staff_role_id.as_deref()), "inline": true},
                {"name": "Timezone", "value": settings.timezone, "inline": true},
                {"name": "Category slots", "value": settings.category_slots.to_string(), "inline": true},
                {"name": "Warn threshold", "value": settings.warn_threshold.to_string(), "inline": true},
                {"name": "Warn timeout", "value": format!("{} min", settings.warn_timeout_minutes), "inline": true},
                {"name": "Smart replies", "value": toggle(settings.enable_smart_replies), "inline": true},
                {"name": "AI suggestions", "value": toggle(settings.enable_ai_suggestions), "inline": true},
                {"name": "Auto priority", "value": toggle(settings.enable_auto_priority), "inline": true},
                {"name": "Categories", "value": category_text, "inline": false},
            ],
            "footer": {"text": format!("Page {page}/{pages}")},
        }],
        "components": [{
            "type": ACTION_ROW,
            "components": [
                {
                    "type": BUTTON,
                    "style": STYLE_SECONDARY,
                    "label": "Previous",
                    "custom_id": format!("settings:page:{}", page.saturating_sub(1).max(1)),
                    "disabled": page <= 1,
                },
                {
                    "type": BUTTON,
                    "style": STYLE_SECONDARY,
                    "label": "Next",
                    "custom_id": format!("settings:page:{}", (page + 1).min(pages)),
                    "disabled": page >= pages,
                },
            ],
        }],
    })
}

/// Public panel members use to open a ticket.
pub fn render_open_panel(categories: &[TicketCategory]) -> Value {
    let component = if categories.is_empty() {
        json!({
            "type": BUTTON,
            "style": STYLE_PRIMARY,
            "label": "Open Ticket",
            "custom_id": "ticket:open:default",
        })
    } else {
        let options: Vec<Value> = categories
            .iter()
            .take(MAX_SELECT_OPTIONS)
            .map(|c| {
                let mut option = json!({
                    "label": truncate(&c.name, 100),
                    "value": c.id.to_string(),
                });
                if let Some(d) = c.description.as_deref().filter(|d| !d.is_empty()) {
                    option["description"] = json!(truncate(d, 100));
                }
                option
            })
            .collect();

        json!({
            "type": STRING_SELECT,
            "custom_id": "ticket:open",
            "placeholder": "Choose a category",
            "min_values": 1,
            "max_values": 1,
            "options": options,
        })
    };

    json!({
        "embeds": [{
            "title": "Need help?",
            "description": "Open a ticket and a staff member will be with you shortly.",
            "color": ACCENT_COLOR,
        }],
        "components": [{
            "type": ACTION_ROW,
            "components": [component],
        }],
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
