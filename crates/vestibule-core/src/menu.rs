//! Composition of the welcome configuration menu.
//!
//! Slots are claimed in a fixed order: feature toggles first (declared
//! order), then the live feed display, then the reload button, and last a
//! decorative filler pass over every index the earlier passes left
//! unclaimed. Out-of-range configured slots are skipped; they never panic a
//! rebuild.

use crate::config::{ToggleTable, WelcomeConfig};
use crate::feed::FeedStore;
use crate::session::{ItemDescriptor, Session, SlotAction, SlotBinding};
use crate::text;
use crate::types::{Feature, Icon};

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Populate an empty session grid from the current configuration and feed
/// state. Deterministic for a given config + feed snapshot, which is what
/// makes refresh idempotent.
pub fn populate(session: &mut Session, config: &WelcomeConfig, feed: &FeedStore) {
    for feature in ToggleTable::FEATURES {
        place_toggle(session, config, feature);
    }
    place_feed(session, config, feed);
    place_reload(session, config);
    place_filler(session, config);
}

fn place_toggle(session: &mut Session, config: &WelcomeConfig, feature: Feature) {
    let Some(tc) = config.menu.toggles.get(feature) else {
        return;
    };
    let enabled = config.feature_enabled(feature);
    let icon_name = if enabled { &tc.icon_enabled } else { &tc.icon_disabled };
    let fallback = if enabled { Icon::ToggleOn } else { Icon::ToggleOff };

    let mut detail = tc.detail.clone();
    detail.push(String::new());
    detail.push(if enabled {
        "Status: enabled".to_string()
    } else {
        "Status: disabled".to_string()
    });

    let binding = SlotBinding {
        item: ItemDescriptor {
            icon: Icon::resolve(icon_name, fallback),
            label: tc.label.clone(),
            detail,
        },
        action: Some(SlotAction::ToggleFeature(feature)),
    };
    if session.set_slot(tc.slot, binding).is_err() {
        tracing::debug!(feature = %feature, slot = tc.slot, "toggle slot outside grid, skipped");
    }
}

fn place_feed(session: &mut Session, config: &WelcomeConfig, feed: &FeedStore) {
    if !config.feed.enabled {
        return;
    }
    let fc = &config.feed;
    let mut detail = vec![fc.header.clone(), String::new()];

    let entries = feed.recent(fc.display_count);
    if entries.is_empty() {
        detail.push(fc.empty_message.clone());
    } else {
        for event in &entries {
            detail.push(text::feed_line(&fc.entry_format, event, &fc.time_format));
        }
    }
    detail.push(String::new());
    detail.push(fc.refresh_hint.clone());

    let binding = SlotBinding {
        item: ItemDescriptor {
            icon: Icon::resolve(&config.menu.feed_icon, Icon::Ledger),
            label: config.menu.feed_label.clone(),
            detail,
        },
        action: Some(SlotAction::RefreshFeed),
    };
    if session.set_slot(config.menu.feed_slot, binding).is_err() {
        tracing::debug!(slot = config.menu.feed_slot, "feed slot outside grid, skipped");
    }
}

fn place_reload(session: &mut Session, config: &WelcomeConfig) {
    let rc = &config.menu.reload;
    let binding = SlotBinding {
        item: ItemDescriptor {
            icon: Icon::resolve(&rc.icon, Icon::Cycle),
            label: rc.label.clone(),
            detail: rc.detail.clone(),
        },
        action: Some(SlotAction::ReloadConfig),
    };
    if session.set_slot(rc.slot, binding).is_err() {
        tracing::debug!(slot = rc.slot, "reload slot outside grid, skipped");
    }
}

/// Give every unclaimed, still-empty index a non-interactive filler binding.
fn place_filler(session: &mut Session, config: &WelcomeConfig) {
    let icon = Icon::resolve(&config.menu.filler_icon, Icon::Pane);
    for slot in 0..session.grid_size() {
        if session.is_claimed(slot) {
            continue;
        }
        let binding = SlotBinding {
            item: ItemDescriptor {
                icon,
                label: " ".to_string(),
                detail: Vec::new(),
            },
            action: None,
        };
        // In-range by construction.
        let _ = session.set_slot(slot, binding);
    }
}

// ---------------------------------------------------------------------------
// Action dispatch
// ---------------------------------------------------------------------------

/// What executing a slot action did, for the composing layer to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect {
    Toggled { feature: Feature, enabled: bool },
    FeedRefreshed,
    ConfigReloaded,
}

/// Pure dispatch over an explicitly passed config: flips toggles, leaves
/// refresh/reload for the caller. Testable without simulating any clicks.
pub fn apply_action(action: SlotAction, config: &mut WelcomeConfig) -> ActionEffect {
    match action {
        SlotAction::ToggleFeature(feature) => {
            let enabled = !config.feature_enabled(feature);
            config.set_feature_enabled(feature, enabled);
            ActionEffect::Toggled { feature, enabled }
        }
        SlotAction::RefreshFeed => ActionEffect::FeedRefreshed,
        SlotAction::ReloadConfig => ActionEffect::ConfigReloaded,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionRegistry;
    use crate::surface::MemorySurface;
    use crate::types::ActorId;

    fn build(config: &WelcomeConfig, feed: &FeedStore) -> (SessionRegistry, ActorId) {
        let mut registry = SessionRegistry::new();
        let mut surface = MemorySurface::default();
        let actor = ActorId::new();
        registry.open(
            &mut surface,
            actor,
            &config.menu.title,
            config.menu.grid_size,
            &mut |session| populate(session, config, feed),
        );
        (registry, actor)
    }

    #[test]
    fn default_layout_fills_the_whole_grid() {
        let config = WelcomeConfig::default();
        let feed = FeedStore::new(10, true);
        let (registry, actor) = build(&config, &feed);
        let session = registry.session(&actor).expect("session tracked");

        // 11 toggles + feed + reload = 13 claimed, filler takes the other 41.
        assert_eq!(session.grid_size(), 54);
        assert_eq!(session.slot_count(), 54);
        let fillers = (0..54)
            .filter(|i| session.slot(*i).is_some_and(|b| b.action.is_none()))
            .count();
        assert_eq!(fillers, 41);
    }

    #[test]
    fn declared_slots_carry_their_actions() {
        let config = WelcomeConfig::default();
        let feed = FeedStore::new(10, true);
        let (registry, actor) = build(&config, &feed);
        let session = registry.session(&actor).unwrap();

        assert_eq!(
            session.slot(20).unwrap().action,
            Some(SlotAction::ToggleFeature(Feature::Greetings))
        );
        assert_eq!(
            session.slot(40).unwrap().action,
            Some(SlotAction::ToggleFeature(Feature::Ticker))
        );
        assert_eq!(session.slot(13).unwrap().action, Some(SlotAction::RefreshFeed));
        assert_eq!(session.slot(53).unwrap().action, Some(SlotAction::ReloadConfig));
    }

    #[test]
    fn disabled_feed_slot_becomes_filler() {
        let mut config = WelcomeConfig::default();
        config.feed.enabled = false;
        let feed = FeedStore::new(10, false);
        let (registry, actor) = build(&config, &feed);
        let session = registry.session(&actor).unwrap();
        assert!(session.slot(13).unwrap().action.is_none());
    }

    #[test]
    fn out_of_range_toggle_is_skipped_not_fatal() {
        let mut config = WelcomeConfig::default();
        config.menu.toggles.ticker.slot = 99;
        let feed = FeedStore::new(10, true);
        let (registry, actor) = build(&config, &feed);
        let session = registry.session(&actor).unwrap();
        // Slot 40 (the default) is filler now; the grid is still full.
        assert!(session.slot(40).unwrap().action.is_none());
        assert_eq!(session.slot_count(), 54);
    }

    #[test]
    fn feed_entries_show_newest_first() {
        let config = WelcomeConfig::default();
        let feed = FeedStore::new(10, true);
        feed.append("joined", "Ann");
        feed.append("left", "Ben");
        let (registry, actor) = build(&config, &feed);
        let session = registry.session(&actor).unwrap();

        let detail = &session.slot(13).unwrap().item.detail;
        let ben = detail.iter().position(|l| l.contains("Ben")).unwrap();
        let ann = detail.iter().position(|l| l.contains("Ann")).unwrap();
        assert!(ben < ann);
    }

    #[test]
    fn toggle_status_line_tracks_state() {
        let mut config = WelcomeConfig::default();
        let feed = FeedStore::new(10, true);
        config.set_feature_enabled(Feature::Kit, false);
        let (registry, actor) = build(&config, &feed);
        let session = registry.session(&actor).unwrap();
        let detail = &session.slot(32).unwrap().item.detail;
        assert!(detail.iter().any(|l| l == "Status: disabled"));
    }

    #[test]
    fn apply_action_toggles_and_reports() {
        let mut config = WelcomeConfig::default();
        let effect = apply_action(SlotAction::ToggleFeature(Feature::Sounds), &mut config);
        assert_eq!(effect, ActionEffect::Toggled { feature: Feature::Sounds, enabled: false });
        assert!(!config.feature_enabled(Feature::Sounds));

        assert_eq!(apply_action(SlotAction::RefreshFeed, &mut config), ActionEffect::FeedRefreshed);
        assert_eq!(apply_action(SlotAction::ReloadConfig, &mut config), ActionEffect::ConfigReloaded);
    }
}
