//! Boundary traits for the external collaborators: the UI surface that shows
//! grids to actors, the roster that answers liveness queries, and the feature
//! sink the welcome pipeline renders through. The concrete behavior behind
//! each call is the host's business; the crate only defines the contracts
//! plus in-process implementations for tests and the simulator.

use crate::scheduler::Roster;
use crate::session::{Session, SessionId};
use crate::types::{ActorId, Cue, Effect, KitItem};
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// UiSurface
// ---------------------------------------------------------------------------

/// The host's grid presentation layer.
pub trait UiSurface {
    /// Show a freshly built grid, replacing whatever the actor had open.
    fn present(&mut self, session: &Session);

    /// Repaint an already-open grid in place. Never closes it.
    fn repaint(&mut self, session: &Session);

    /// Which session's grid the actor currently has open, if any.
    fn presented(&self, actor: &ActorId) -> Option<SessionId>;

    /// Play a short feedback cue for the actor (click, refresh).
    fn cue(&mut self, actor: &ActorId, cue: Cue, volume: f32, pitch: f32);
}

// ---------------------------------------------------------------------------
// Render payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleTiming {
    pub fade_in: u32,
    pub stay: u32,
    pub fade_out: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireworkBurst {
    pub count: u32,
    pub power: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handbook {
    pub title: String,
    pub author: String,
    pub pages: Vec<String>,
}

// ---------------------------------------------------------------------------
// FeatureSink
// ---------------------------------------------------------------------------

/// Everything the welcome pipeline can ask the host to render. One method per
/// feature renderer; implementations are expected to be fire-and-forget and
/// must not block the execution thread.
pub trait FeatureSink {
    fn message(&mut self, actor: &ActorId, text: &str, broadcast: bool);
    /// Operator-visible notice for actors no longer reachable directly.
    fn operator_notice(&mut self, text: &str);
    fn title(&mut self, actor: &ActorId, title: &str, subtitle: &str, timing: TitleTiming);
    fn sound(&mut self, actor: &ActorId, cue: Cue, volume: f32, pitch: f32);
    fn particles(&mut self, actor: &ActorId, effect: Effect, count: u32);
    fn fireworks(&mut self, actor: &ActorId, burst: FireworkBurst);
    fn give_items(&mut self, actor: &ActorId, items: &[KitItem]);
    /// Run a command with operator authority.
    fn run_command(&mut self, command: &str);
    fn status_bar(&mut self, actor: &ActorId, text: &str, duration_ticks: u64);
    fn ticker(&mut self, actor: &ActorId, text: &str, duration_ticks: u64);
    fn give_handbook(&mut self, actor: &ActorId, handbook: &Handbook);
}

// ---------------------------------------------------------------------------
// In-process implementations
// ---------------------------------------------------------------------------

/// Roster backed by a plain set; the simulator connects and disconnects
/// actors explicitly.
#[derive(Debug, Default)]
pub struct MemoryRoster {
    online: HashSet<ActorId>,
}

impl MemoryRoster {
    pub fn connect(&mut self, actor: ActorId) {
        self.online.insert(actor);
    }

    pub fn disconnect(&mut self, actor: &ActorId) {
        self.online.remove(actor);
    }
}

impl Roster for MemoryRoster {
    fn is_connected(&self, actor: &ActorId) -> bool {
        self.online.contains(actor)
    }
}

/// Surface that only tracks which session each actor would be looking at.
/// Used by the simulator and by tests that exercise open/refresh semantics.
#[derive(Debug, Default)]
pub struct MemorySurface {
    presented: HashMap<ActorId, SessionId>,
    pub presents: u32,
    pub repaints: u32,
    pub cues: Vec<Cue>,
}

impl MemorySurface {
    /// Simulate the actor dismissing their grid client-side.
    pub fn clear_presented(&mut self, actor: &ActorId) {
        self.presented.remove(actor);
    }
}

impl UiSurface for MemorySurface {
    fn present(&mut self, session: &Session) {
        self.presents += 1;
        self.presented.insert(session.actor(), session.id());
    }

    fn repaint(&mut self, _session: &Session) {
        self.repaints += 1;
    }

    fn presented(&self, actor: &ActorId) -> Option<SessionId> {
        self.presented.get(actor).copied()
    }

    fn cue(&mut self, _actor: &ActorId, cue: Cue, _volume: f32, _pitch: f32) {
        self.cues.push(cue);
    }
}

/// Sink that reports every render through the log. The simulator's stand-in
/// for real renderers.
#[derive(Debug, Default)]
pub struct LogSink;

impl FeatureSink for LogSink {
    fn message(&mut self, actor: &ActorId, text: &str, broadcast: bool) {
        tracing::info!(%actor, broadcast, "message: {text}");
    }

    fn operator_notice(&mut self, text: &str) {
        tracing::info!("notice: {text}");
    }

    fn title(&mut self, actor: &ActorId, title: &str, subtitle: &str, timing: TitleTiming) {
        tracing::info!(%actor, stay = timing.stay, "title: {title} / {subtitle}");
    }

    fn sound(&mut self, actor: &ActorId, cue: Cue, volume: f32, pitch: f32) {
        tracing::info!(%actor, %cue, volume, pitch, "sound");
    }

    fn particles(&mut self, actor: &ActorId, effect: Effect, count: u32) {
        tracing::info!(%actor, %effect, count, "particles");
    }

    fn fireworks(&mut self, actor: &ActorId, burst: FireworkBurst) {
        tracing::info!(%actor, count = burst.count, power = burst.power, "fireworks");
    }

    fn give_items(&mut self, actor: &ActorId, items: &[KitItem]) {
        tracing::info!(%actor, items = items.len(), "kit granted");
    }

    fn run_command(&mut self, command: &str) {
        tracing::info!("command: {command}");
    }

    fn status_bar(&mut self, actor: &ActorId, text: &str, duration_ticks: u64) {
        tracing::info!(%actor, duration_ticks, "status bar: {text}");
    }

    fn ticker(&mut self, actor: &ActorId, text: &str, duration_ticks: u64) {
        tracing::info!(%actor, duration_ticks, "ticker: {text}");
    }

    fn give_handbook(&mut self, actor: &ActorId, handbook: &Handbook) {
        tracing::info!(%actor, pages = handbook.pages.len(), "handbook: {}", handbook.title);
    }
}

/// Sink that records a line per render call, for asserting on pipeline
/// behavior without a host.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<String>,
}

impl FeatureSink for RecordingSink {
    fn message(&mut self, _actor: &ActorId, text: &str, broadcast: bool) {
        self.calls.push(format!("message[broadcast={broadcast}]: {text}"));
    }

    fn operator_notice(&mut self, text: &str) {
        self.calls.push(format!("notice: {text}"));
    }

    fn title(&mut self, _actor: &ActorId, title: &str, subtitle: &str, _timing: TitleTiming) {
        self.calls.push(format!("title: {title} / {subtitle}"));
    }

    fn sound(&mut self, _actor: &ActorId, cue: Cue, _volume: f32, _pitch: f32) {
        self.calls.push(format!("sound: {cue}"));
    }

    fn particles(&mut self, _actor: &ActorId, effect: Effect, count: u32) {
        self.calls.push(format!("particles: {effect} x{count}"));
    }

    fn fireworks(&mut self, _actor: &ActorId, burst: FireworkBurst) {
        self.calls.push(format!("fireworks: x{}", burst.count));
    }

    fn give_items(&mut self, _actor: &ActorId, items: &[KitItem]) {
        let list: Vec<String> = items.iter().map(|i| format!("{}x{}", i.name, i.count)).collect();
        self.calls.push(format!("kit: {}", list.join(",")));
    }

    fn run_command(&mut self, command: &str) {
        self.calls.push(format!("command: {command}"));
    }

    fn status_bar(&mut self, _actor: &ActorId, text: &str, _duration_ticks: u64) {
        self.calls.push(format!("status_bar: {text}"));
    }

    fn ticker(&mut self, _actor: &ActorId, text: &str, _duration_ticks: u64) {
        self.calls.push(format!("ticker: {text}"));
    }

    fn give_handbook(&mut self, _actor: &ActorId, handbook: &Handbook) {
        self.calls.push(format!("handbook: {}", handbook.title));
    }
}
