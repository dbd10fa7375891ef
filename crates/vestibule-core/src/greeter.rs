//! Composition root: wires the feed, registry, scheduler, pipeline, and
//! encounter store behind the trigger surface the host calls into.
//!
//! Everything here runs on the host's single logical execution thread; the
//! host drives `tick` once per logical tick and forwards arrival, departure,
//! and interaction events as they happen.

use crate::config::WelcomeConfig;
use crate::encounter::EncounterStore;
use crate::feed::FeedStore;
use crate::menu::{self, ActionEffect};
use crate::pipeline::{DeferredStep, StepContext, WelcomePipeline};
use crate::router::{self, ClickRegion};
use crate::scheduler::{Roster, TaskState, TickScheduler};
use crate::session::{SessionId, SessionRegistry};
use crate::steps;
use crate::surface::{FeatureSink, UiSurface};
use crate::text;
use crate::types::{ActorId, Cue};
use std::path::PathBuf;

/// Scheduled work payloads. The first-encounter flag rides along from the
/// arrival trigger so nothing re-consults the store at fire time.
#[derive(Debug, Clone)]
pub enum Job {
    Welcome {
        actor_name: String,
        first_encounter: bool,
    },
    Deferred {
        step: DeferredStep,
        actor_name: String,
        first_encounter: bool,
    },
}

pub struct Greeter {
    config: WelcomeConfig,
    config_path: Option<PathBuf>,
    feed: FeedStore,
    registry: SessionRegistry,
    scheduler: TickScheduler<Job>,
    pipeline: WelcomePipeline,
    encounters: Box<dyn EncounterStore>,
}

impl Greeter {
    /// Build a greeter around a configuration. The config is normalized up
    /// front; every correction is surfaced to the operator log. Pass a path
    /// to persist toggle changes and serve the reload button.
    pub fn new(
        mut config: WelcomeConfig,
        config_path: Option<PathBuf>,
        encounters: Box<dyn EncounterStore>,
    ) -> Self {
        for warning in config.normalize() {
            tracing::warn!("config: {}", warning.message);
        }
        let feed = FeedStore::new(config.feed.capacity, config.feed.enabled);
        Greeter {
            config,
            config_path,
            feed,
            registry: SessionRegistry::new(),
            scheduler: TickScheduler::new(),
            pipeline: steps::standard_pipeline(),
            encounters,
        }
    }

    pub fn config(&self) -> &WelcomeConfig {
        &self.config
    }

    pub fn feed(&self) -> &FeedStore {
        &self.feed
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    // -----------------------------------------------------------------------
    // Arrival / departure triggers
    // -----------------------------------------------------------------------

    /// An actor arrived: record it in the feed, capture the first-encounter
    /// flag (consulting the store exactly once), and schedule the welcome
    /// pipeline after the configured delay.
    pub fn on_arrival(&mut self, actor: ActorId, name: &str) {
        self.feed.append(&self.config.feed.join_label, name);

        let first_encounter = self.encounters.is_first_encounter(&actor);
        if first_encounter {
            self.encounters.mark_encountered(&actor);
        }

        self.scheduler.schedule(
            actor,
            self.config.arrival_delay_ticks,
            Job::Welcome {
                actor_name: name.to_string(),
                first_encounter,
            },
        );
    }

    /// An actor left: record it, send the departure notice, and release any
    /// session they still had open.
    pub fn on_departure(&mut self, actor: ActorId, name: &str, sink: &mut dyn FeatureSink) {
        self.feed.append(&self.config.feed.leave_label, name);

        if self.config.features.departure_notices {
            let text = text::expand(&self.config.messages.departure, name, &self.config.server_name);
            if self.config.features.broadcast_departures {
                sink.message(&actor, &text, true);
            } else {
                // The actor is already gone; tell the operator instead.
                sink.operator_notice(&text);
            }
        }

        self.registry.close(&actor);
    }

    // -----------------------------------------------------------------------
    // Tick pump
    // -----------------------------------------------------------------------

    /// Advance one logical tick: fire due welcome runs and deferred steps for
    /// still-connected actors, schedule any follow-ups they request.
    pub fn tick(&mut self, roster: &dyn Roster, sink: &mut dyn FeatureSink) {
        for resolution in self.scheduler.tick(roster) {
            if resolution.state != TaskState::Fired {
                continue;
            }
            let actor = resolution.task.actor;
            match resolution.task.job {
                Job::Welcome {
                    actor_name,
                    first_encounter,
                } => {
                    let follow_ups = {
                        let ctx = StepContext {
                            actor,
                            actor_name: &actor_name,
                            first_encounter,
                            config: &self.config,
                        };
                        self.pipeline.run(&ctx, sink)
                    };
                    for follow_up in follow_ups {
                        self.scheduler.schedule(
                            actor,
                            follow_up.delay_ticks,
                            Job::Deferred {
                                step: follow_up.step,
                                actor_name: actor_name.clone(),
                                first_encounter,
                            },
                        );
                    }
                }
                Job::Deferred {
                    step,
                    actor_name,
                    first_encounter,
                } => {
                    let ctx = StepContext {
                        actor,
                        actor_name: &actor_name,
                        first_encounter,
                        config: &self.config,
                    };
                    if let Err(err) = steps::run_deferred(step, &ctx, sink) {
                        tracing::warn!(step = ?step, %err, "deferred welcome step failed");
                    }
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Menu surface
    // -----------------------------------------------------------------------

    /// Open (or replace) the configuration menu for an actor.
    pub fn open_menu(&mut self, surface: &mut dyn UiSurface, actor: ActorId) -> SessionId {
        let config = &self.config;
        let feed = &self.feed;
        self.registry.open(
            surface,
            actor,
            &config.menu.title,
            config.menu.grid_size,
            &mut |session| menu::populate(session, config, feed),
        )
    }

    fn refresh_menu(&mut self, surface: &mut dyn UiSurface, actor: ActorId) {
        let config = &self.config;
        let feed = &self.feed;
        self.registry.refresh(
            surface,
            actor,
            &config.menu.title,
            config.menu.grid_size,
            &mut |session| menu::populate(session, config, feed),
        );
    }

    /// Route a click. Returns whether the host must suppress the event's
    /// default effect. Resolved actions execute synchronously before this
    /// returns.
    pub fn handle_click(
        &mut self,
        surface: &mut dyn UiSurface,
        sink: &mut dyn FeatureSink,
        actor: ActorId,
        slot: usize,
        region: ClickRegion,
    ) -> bool {
        let outcome = router::dispatch(&self.registry, &actor, slot, region);
        let Some(action) = outcome.action else {
            return outcome.suppress_default;
        };

        match menu::apply_action(action, &mut self.config) {
            ActionEffect::Toggled { feature, enabled } => {
                self.persist_config();
                let label = self
                    .config
                    .menu
                    .toggles
                    .get(feature)
                    .map(|tc| tc.label.clone())
                    .unwrap_or_else(|| feature.to_string());
                let state = if enabled { "enabled" } else { "disabled" };
                sink.message(&actor, &format!("{label}: now {state}."), false);
                self.click_cue(surface, &actor, false);
            }
            ActionEffect::FeedRefreshed => {
                self.click_cue(surface, &actor, true);
            }
            ActionEffect::ConfigReloaded => {
                self.reload();
                sink.message(&actor, "Configuration reloaded.", false);
                self.click_cue(surface, &actor, false);
            }
        }
        self.refresh_menu(surface, actor);
        outcome.suppress_default
    }

    /// Route a drag gesture. Suppressed whenever the actor has a session.
    pub fn handle_drag(&self, actor: ActorId) -> bool {
        router::dispatch_drag(&self.registry, &actor)
    }

    /// The actor dismissed their grid through any path.
    pub fn handle_close(&mut self, actor: ActorId) {
        router::on_close(&mut self.registry, &actor);
    }

    // -----------------------------------------------------------------------
    // Config lifecycle
    // -----------------------------------------------------------------------

    /// Re-read the config file (when one was given) and the encounter store,
    /// then re-apply the feed knobs. A failed read keeps the running config.
    pub fn reload(&mut self) {
        if let Some(path) = &self.config_path {
            match WelcomeConfig::load(path) {
                Ok(mut fresh) => {
                    for warning in fresh.normalize() {
                        tracing::warn!("config: {}", warning.message);
                    }
                    self.config = fresh;
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "config reload failed, keeping previous config");
                }
            }
        }
        self.encounters.reload();
        self.feed.set_enabled(self.config.feed.enabled);
        self.feed.set_capacity(self.config.feed.capacity);
    }

    fn persist_config(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(err) = self.config.save(path) {
            tracing::warn!(path = %path.display(), %err, "could not persist config change");
        }
    }

    fn click_cue(&self, surface: &mut dyn UiSurface, actor: &ActorId, refresh: bool) {
        let cues = &self.config.cues;
        let (name, fallback, volume, pitch) = if refresh {
            (cues.refresh.as_str(), Cue::Sparkle, cues.refresh_volume, cues.refresh_pitch)
        } else {
            (cues.click.as_str(), Cue::Click, cues.click_volume, cues.click_pitch)
        };
        surface.cue(actor, Cue::resolve(name, fallback), volume, pitch);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
