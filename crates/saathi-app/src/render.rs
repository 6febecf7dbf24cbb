//! Plain-text rendering for the terminal front end.

use chrono::Local;

use saathi_core::i18n::t;
use saathi_core::{ChatMessage, Notification, ProfileField, ProfileForm, Role, SchemeMatch};

pub fn message(msg: &ChatMessage, lang: &str) -> String {
    let time = msg.timestamp.with_timezone(&Local).format("%H:%M");
    let who = match msg.role {
        Role::User => t(lang, "you"),
        Role::Assistant => t(lang, "title"),
    };
    format!("[{}] {}: {}", time, who, msg.content)
}

/// One scheme card: title, summary, up to six tags, link.
pub fn scheme_card(scheme: &SchemeMatch, lang: &str) -> String {
    let mut out = format!("  * {}", scheme.display_title());
    if let Some(summary) = scheme.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str(&format!("\n    {}", summary.trim()));
    }
    let tags = scheme.display_tags();
    if !tags.is_empty() {
        let tags: Vec<String> = tags.iter().map(|tag| format!("[{}]", tag)).collect();
        out.push_str(&format!("\n    {}", tags.join(" ")));
    }
    if let Some(url) = scheme.url.as_deref().filter(|u| !u.trim().is_empty()) {
        out.push_str(&format!("\n    {}: {}", t(lang, "open"), url));
    }
    out
}

pub fn scheme_list(schemes: &[SchemeMatch], lang: &str) -> String {
    if schemes.is_empty() {
        return t(lang, "noSchemes").to_string();
    }
    let mut out = format!("{}:", t(lang, "matchedSchemes"));
    for scheme in schemes {
        out.push('\n');
        out.push_str(&scheme_card(scheme, lang));
    }
    out
}

pub fn profile(form: &ProfileForm, lang: &str) -> String {
    let mut out = format!("{}:", t(lang, "profileTitle"));
    for field in ProfileField::ALL {
        let value = form.get(field).trim();
        out.push_str(&format!(
            "\n  {}: {}",
            t(lang, field.label_key()),
            if value.is_empty() { "-" } else { value }
        ));
    }
    out
}

pub fn notification(note: &Notification, lang: &str) -> String {
    let title = note.title.as_deref().unwrap_or_else(|| t(lang, "info"));
    format!("!! {}: {}", title, note.message)
}

/// Output for a change of the notification slot, or `None` when the slot was
/// cleared and nothing should be printed.
pub fn notification_change(note: Option<&Notification>, lang: &str) -> Option<String> {
    note.map(|note| format!("\n{}", notification(note, lang)))
}
