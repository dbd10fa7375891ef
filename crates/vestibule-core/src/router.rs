//! Resolves inbound interaction events against the session registry.
//!
//! While an actor has a tracked session, every click and drag is suppressed
//! regardless of which region it landed in, so session contents can never be
//! extracted or rearranged. Routing is pure: the outcome carries the slot's
//! action identifier and the composing layer executes it.

use crate::session::{SessionRegistry, SlotAction};
use crate::types::ActorId;

/// Where a click landed, relative to the actor's open grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRegion {
    /// The session grid itself.
    Grid,
    /// Any other region belonging to the same actor.
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Whether the host must suppress the event's default effect.
    pub suppress_default: bool,
    /// The action bound to the clicked slot, when the click hit one.
    pub action: Option<SlotAction>,
}

impl DispatchOutcome {
    fn pass_through() -> Self {
        DispatchOutcome {
            suppress_default: false,
            action: None,
        }
    }
}

/// Route a click. No tracked session: nothing happens and the default effect
/// stands. Tracked session: the default effect is always suppressed, and a
/// grid-region click on a bound slot yields its action. Decorative slots
/// suppress without further effect.
pub fn dispatch(
    registry: &SessionRegistry,
    actor: &ActorId,
    slot: usize,
    region: ClickRegion,
) -> DispatchOutcome {
    let Some(session) = registry.session(actor) else {
        return DispatchOutcome::pass_through();
    };

    let action = match region {
        ClickRegion::Grid => session.slot(slot).and_then(|binding| binding.action),
        ClickRegion::Outside => None,
    };

    DispatchOutcome {
        suppress_default: true,
        action,
    }
}

/// Multi-slot drag gestures: suppressed whenever a session is tracked,
/// independent of the region touched.
pub fn dispatch_drag(registry: &SessionRegistry, actor: &ActorId) -> bool {
    registry.session(actor).is_some()
}

/// The actor dismissed their grid through any path: unconditionally release
/// the tracked session so no state outlives the visible UI.
pub fn on_close(registry: &mut SessionRegistry, actor: &ActorId) {
    registry.close(actor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ItemDescriptor, SessionRegistry, SlotBinding};
    use crate::surface::MemorySurface;
    use crate::types::{Feature, Icon};

    fn registry_with_menu(actor: ActorId) -> SessionRegistry {
        let mut registry = SessionRegistry::new();
        let mut surface = MemorySurface::default();
        registry.open(&mut surface, actor, "Menu", 54, &mut |session| {
            session
                .set_slot(
                    20,
                    SlotBinding {
                        item: ItemDescriptor {
                            icon: Icon::ToggleOn,
                            label: "Greetings".to_string(),
                            detail: Vec::new(),
                        },
                        action: Some(SlotAction::ToggleFeature(Feature::Greetings)),
                    },
                )
                .unwrap();
            session
                .set_slot(
                    0,
                    SlotBinding {
                        item: ItemDescriptor {
                            icon: Icon::Pane,
                            label: " ".to_string(),
                            detail: Vec::new(),
                        },
                        action: None,
                    },
                )
                .unwrap();
        });
        registry
    }

    #[test]
    fn no_session_passes_through() {
        let registry = SessionRegistry::new();
        let outcome = dispatch(&registry, &ActorId::new(), 20, ClickRegion::Grid);
        assert!(!outcome.suppress_default);
        assert!(outcome.action.is_none());
    }

    #[test]
    fn bound_slot_yields_action_and_suppresses() {
        let actor = ActorId::new();
        let registry = registry_with_menu(actor);
        let outcome = dispatch(&registry, &actor, 20, ClickRegion::Grid);
        assert!(outcome.suppress_default);
        assert_eq!(outcome.action, Some(SlotAction::ToggleFeature(Feature::Greetings)));
    }

    #[test]
    fn decorative_slot_suppresses_without_action() {
        let actor = ActorId::new();
        let registry = registry_with_menu(actor);
        let outcome = dispatch(&registry, &actor, 0, ClickRegion::Grid);
        assert!(outcome.suppress_default);
        assert!(outcome.action.is_none());
    }

    #[test]
    fn unbound_slot_suppresses_without_action() {
        let actor = ActorId::new();
        let registry = registry_with_menu(actor);
        let outcome = dispatch(&registry, &actor, 40, ClickRegion::Grid);
        assert!(outcome.suppress_default);
        assert!(outcome.action.is_none());
    }

    #[test]
    fn outside_region_suppresses_but_never_acts() {
        let actor = ActorId::new();
        let registry = registry_with_menu(actor);
        // Slot 20 is bound, but the click landed outside the grid.
        let outcome = dispatch(&registry, &actor, 20, ClickRegion::Outside);
        assert!(outcome.suppress_default);
        assert!(outcome.action.is_none());
    }

    #[test]
    fn drag_suppressed_only_with_session() {
        let actor = ActorId::new();
        let registry = registry_with_menu(actor);
        assert!(dispatch_drag(&registry, &actor));
        assert!(!dispatch_drag(&registry, &ActorId::new()));
    }

    #[test]
    fn close_releases_session() {
        let actor = ActorId::new();
        let mut registry = registry_with_menu(actor);
        on_close(&mut registry, &actor);
        assert!(registry.session(&actor).is_none());
        // Closing again is a no-op.
        on_close(&mut registry, &actor);
    }
}
