//! Per-actor menu sessions and the registry tracking at most one per actor.

use crate::error::{Result, VestibuleError};
use crate::surface::UiSurface;
use crate::types::{ActorId, Feature, Icon, MAX_GRID_SIZE, ROW_WIDTH};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Process-unique handle for one presented grid. The UI surface reports the
/// id of the grid an actor currently has open so refresh can tell a live
/// session apart from a stale one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Slot contents
// ---------------------------------------------------------------------------

/// What a slot looks like: an icon plus display text. Rendering is the UI
/// surface's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDescriptor {
    pub icon: Icon,
    pub label: String,
    pub detail: Vec<String>,
}

/// What clicking a slot means, resolved by the router and executed by the
/// composing layer. Decorative slots carry no action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    ToggleFeature(Feature),
    RefreshFeed,
    ReloadConfig,
}

/// One populated slot. Immutable once placed; a rebuild replaces bindings
/// wholesale rather than mutating them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBinding {
    pub item: ItemDescriptor,
    pub action: Option<SlotAction>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Session {
    id: SessionId,
    actor: ActorId,
    title: String,
    grid_size: usize,
    slots: HashMap<usize, SlotBinding>,
    created_at: DateTime<Utc>,
}

impl Session {
    fn new(id: SessionId, actor: ActorId, title: &str, grid_size: usize) -> Self {
        Session {
            id,
            actor,
            title: title.to_string(),
            grid_size,
            slots: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Place a binding. Slots outside `[0, grid_size)` are rejected.
    pub fn set_slot(&mut self, slot: usize, binding: SlotBinding) -> Result<()> {
        if slot >= self.grid_size {
            return Err(VestibuleError::SlotOutOfRange {
                slot,
                grid_size: self.grid_size,
            });
        }
        self.slots.insert(slot, binding);
        Ok(())
    }

    pub fn slot(&self, slot: usize) -> Option<&SlotBinding> {
        self.slots.get(&slot)
    }

    pub fn is_claimed(&self, slot: usize) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &HashMap<usize, SlotBinding> {
        &self.slots
    }

    /// Drop every binding, leaving an empty grid for a rebuild.
    pub fn clear_slots(&mut self) {
        self.slots.clear();
    }
}

/// Correct an invalid grid size to the documented default.
pub fn validate_grid_size(requested: usize) -> usize {
    if requested < ROW_WIDTH || requested > MAX_GRID_SIZE || requested % ROW_WIDTH != 0 {
        tracing::warn!(
            requested,
            "grid size must be a multiple of {ROW_WIDTH} between {ROW_WIDTH} and {MAX_GRID_SIZE}, using {MAX_GRID_SIZE}"
        );
        return MAX_GRID_SIZE;
    }
    requested
}

// ---------------------------------------------------------------------------
// SessionRegistry
// ---------------------------------------------------------------------------

/// Tracks at most one live session per actor. Owned and injected by the
/// composing application; all mutation happens on the single logical
/// execution thread.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ActorId, Session>,
    next_session_id: u64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh session for `actor`, discarding any tracked one. The
    /// builder populates the empty grid synchronously, then the session is
    /// registered and presented through the surface.
    pub fn open(
        &mut self,
        surface: &mut dyn UiSurface,
        actor: ActorId,
        title: &str,
        grid_size: usize,
        build: &mut dyn FnMut(&mut Session),
    ) -> SessionId {
        let grid_size = validate_grid_size(grid_size);
        self.sessions.remove(&actor);

        self.next_session_id += 1;
        let mut session = Session::new(SessionId(self.next_session_id), actor, title, grid_size);
        build(&mut session);
        surface.present(&session);

        let id = session.id;
        self.sessions.insert(actor, session);
        id
    }

    /// Drop the tracked session for `actor`, if any.
    pub fn close(&mut self, actor: &ActorId) -> bool {
        self.sessions.remove(actor).is_some()
    }

    pub fn session(&self, actor: &ActorId) -> Option<&Session> {
        self.sessions.get(actor)
    }

    /// Whether `candidate` is the session currently tracked for `actor`.
    pub fn is_tracked(&self, actor: &ActorId, candidate: SessionId) -> bool {
        self.sessions.get(actor).map(|s| s.id) == Some(candidate)
    }

    pub fn tracked_count(&self) -> usize {
        self.sessions.len()
    }

    /// Rebuild the actor's grid in place when their visible surface still
    /// corresponds to the tracked session; the grid is never closed and
    /// reopened. Falls back to a full `open` otherwise.
    ///
    /// The builder must be deterministic over current configuration state so
    /// that two consecutive refreshes produce identical slot contents.
    pub fn refresh(
        &mut self,
        surface: &mut dyn UiSurface,
        actor: ActorId,
        title: &str,
        grid_size: usize,
        build: &mut dyn FnMut(&mut Session),
    ) -> SessionId {
        if let Some(session) = self.sessions.get_mut(&actor) {
            if surface.presented(&actor) == Some(session.id) {
                session.clear_slots();
                build(session);
                surface.repaint(session);
                return session.id;
            }
        }
        self.open(surface, actor, title, grid_size, build)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
