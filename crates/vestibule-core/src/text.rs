//! Placeholder expansion and feed line formatting.
//!
//! Message templates may contain `%player_name%` and `%server_name%`;
//! feed entry formats additionally use `%time%`, `%player%`, and `%action%`.
//! Replacement is plain textual substitution, once per occurrence.

use crate::feed::FeedEvent;
use chrono::format::{Item, StrftimeItems};

/// Expand the actor/server placeholders in a message template.
pub fn expand(template: &str, actor_name: &str, server_name: &str) -> String {
    template
        .replace("%player_name%", actor_name)
        .replace("%server_name%", server_name)
}

/// Render one feed entry according to the configured entry format.
pub fn feed_line(entry_format: &str, event: &FeedEvent, time_format: &str) -> String {
    let time = event.at.format(time_format).to_string();
    entry_format
        .replace("%time%", &time)
        .replace("%player%", &event.actor_name)
        .replace("%action%", &event.label)
}

/// Whether `pattern` is a usable strftime pattern.
pub fn time_format_is_valid(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}
