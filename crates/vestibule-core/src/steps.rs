//! The standard welcome step table and its concrete bodies.
//!
//! Steps render through the `FeatureSink` collaborator; anything resource-
//! intensive (fireworks, kit delivery, commands, the ticker) is pushed past
//! the pipeline run as a deferred sub-action with its own delay.

use crate::pipeline::{DeferredStep, FeatureStep, FollowUp, StepContext, WelcomePipeline};
use crate::surface::{FeatureSink, FireworkBurst, Handbook, TitleTiming};
use crate::text;
use crate::types::{Cue, Effect, Feature, KitItem};

type StepResult = crate::error::Result<Vec<FollowUp>>;

const NO_FOLLOW_UPS: Vec<FollowUp> = Vec::new();

/// Build the standard pipeline in its declared order.
pub fn standard_pipeline() -> WelcomePipeline {
    WelcomePipeline::new(vec![
        step("greeting", Feature::Greetings, greeting),
        step("first_encounter_greeting", Feature::FirstEncounter, first_encounter_greeting),
        step("titles", Feature::Titles, titles),
        step("sounds", Feature::Sounds, sounds),
        step("effects", Feature::Effects, effects),
        step("fireworks", Feature::Fireworks, fireworks),
        step("kit", Feature::Kit, kit),
        step("commands", Feature::Commands, commands),
        step("status_bar", Feature::StatusBar, status_bar),
        step("ticker", Feature::Ticker, ticker),
        step("handbook", Feature::Handbook, handbook),
    ])
}

fn step(
    name: &'static str,
    feature: Feature,
    run: fn(&StepContext, &mut dyn FeatureSink) -> StepResult,
) -> FeatureStep {
    FeatureStep {
        name,
        feature,
        run: Box::new(run),
    }
}

// ---------------------------------------------------------------------------
// Immediate steps
// ---------------------------------------------------------------------------

fn greeting(ctx: &StepContext, sink: &mut dyn FeatureSink) -> StepResult {
    let cfg = ctx.config;
    let text = text::expand(&cfg.messages.greeting, ctx.actor_name, &cfg.server_name);
    sink.message(&ctx.actor, &text, cfg.features.broadcast_greetings);
    Ok(NO_FOLLOW_UPS)
}

fn first_encounter_greeting(ctx: &StepContext, sink: &mut dyn FeatureSink) -> StepResult {
    if !ctx.first_encounter {
        return Ok(NO_FOLLOW_UPS);
    }
    let cfg = ctx.config;
    let text = text::expand(&cfg.messages.first_encounter, ctx.actor_name, &cfg.server_name);
    sink.message(&ctx.actor, &text, cfg.features.broadcast_greetings);
    Ok(NO_FOLLOW_UPS)
}

fn titles(ctx: &StepContext, sink: &mut dyn FeatureSink) -> StepResult {
    let cfg = ctx.config;
    let title = text::expand(&cfg.titles.title, ctx.actor_name, &cfg.server_name);
    let subtitle = text::expand(&cfg.titles.subtitle, ctx.actor_name, &cfg.server_name);
    sink.title(
        &ctx.actor,
        &title,
        &subtitle,
        TitleTiming {
            fade_in: cfg.titles.fade_in,
            stay: cfg.titles.stay,
            fade_out: cfg.titles.fade_out,
        },
    );
    Ok(NO_FOLLOW_UPS)
}

fn sounds(ctx: &StepContext, sink: &mut dyn FeatureSink) -> StepResult {
    let cfg = &ctx.config.sounds;
    let (name, fallback, volume, pitch) = if ctx.first_encounter {
        (
            cfg.first_encounter_cue.as_str(),
            Cue::Fanfare,
            cfg.first_encounter_volume,
            cfg.first_encounter_pitch,
        )
    } else {
        (cfg.cue.as_str(), Cue::Chime, cfg.volume, cfg.pitch)
    };
    sink.sound(&ctx.actor, Cue::resolve(name, fallback), volume, pitch);
    Ok(NO_FOLLOW_UPS)
}

fn effects(ctx: &StepContext, sink: &mut dyn FeatureSink) -> StepResult {
    let cfg = &ctx.config.effects;
    let (name, fallback, count) = if ctx.first_encounter {
        (
            cfg.first_encounter_effect.as_str(),
            Effect::Confetti,
            cfg.first_encounter_count,
        )
    } else {
        (cfg.effect.as_str(), Effect::Sparkles, cfg.count)
    };
    sink.particles(&ctx.actor, Effect::resolve(name, fallback), count);
    Ok(NO_FOLLOW_UPS)
}

fn status_bar(ctx: &StepContext, sink: &mut dyn FeatureSink) -> StepResult {
    let cfg = ctx.config;
    if cfg.status_bar.first_encounter_only && !ctx.first_encounter {
        return Ok(NO_FOLLOW_UPS);
    }
    let text = text::expand(&cfg.status_bar.message, ctx.actor_name, &cfg.server_name);
    sink.status_bar(&ctx.actor, &text, cfg.status_bar.duration_ticks);
    Ok(NO_FOLLOW_UPS)
}

fn handbook(ctx: &StepContext, sink: &mut dyn FeatureSink) -> StepResult {
    let cfg = ctx.config;
    if cfg.handbook.first_encounter_only && !ctx.first_encounter {
        return Ok(NO_FOLLOW_UPS);
    }
    let mut pages = cfg.handbook.pages.clone();
    if pages.is_empty() {
        pages.push("Welcome!\n\nThank you for joining.".to_string());
    }
    let book = Handbook {
        title: text::expand(&cfg.handbook.title, ctx.actor_name, &cfg.server_name),
        author: cfg.handbook.author.clone(),
        pages: pages
            .iter()
            .map(|page| text::expand(page, ctx.actor_name, &cfg.server_name))
            .collect(),
    };
    sink.give_handbook(&ctx.actor, &book);
    Ok(NO_FOLLOW_UPS)
}

// ---------------------------------------------------------------------------
// Deferring steps
// ---------------------------------------------------------------------------

fn fireworks(ctx: &StepContext, _sink: &mut dyn FeatureSink) -> StepResult {
    let cfg = &ctx.config.fireworks;
    if cfg.first_encounter_only && !ctx.first_encounter {
        return Ok(NO_FOLLOW_UPS);
    }
    Ok(vec![FollowUp {
        delay_ticks: cfg.delay_ticks,
        step: DeferredStep::Fireworks,
    }])
}

fn kit(ctx: &StepContext, _sink: &mut dyn FeatureSink) -> StepResult {
    let cfg = &ctx.config.kit;
    if cfg.first_encounter_only && !ctx.first_encounter {
        return Ok(NO_FOLLOW_UPS);
    }
    if cfg.items.is_empty() {
        return Ok(NO_FOLLOW_UPS);
    }
    Ok(vec![FollowUp {
        delay_ticks: cfg.delay_ticks,
        step: DeferredStep::Kit,
    }])
}

fn commands(ctx: &StepContext, _sink: &mut dyn FeatureSink) -> StepResult {
    let cfg = &ctx.config.commands;
    if cfg.first_encounter_only && !ctx.first_encounter {
        return Ok(NO_FOLLOW_UPS);
    }
    if selected_commands(ctx).is_empty() {
        return Ok(NO_FOLLOW_UPS);
    }
    Ok(vec![FollowUp {
        delay_ticks: cfg.delay_ticks,
        step: DeferredStep::Commands,
    }])
}

fn ticker(ctx: &StepContext, _sink: &mut dyn FeatureSink) -> StepResult {
    let cfg = &ctx.config.ticker;
    if cfg.first_encounter_only && !ctx.first_encounter {
        return Ok(NO_FOLLOW_UPS);
    }
    Ok(vec![FollowUp {
        delay_ticks: cfg.delay_ticks,
        step: DeferredStep::Ticker,
    }])
}

/// The command list an arrival gets: first-encounter commands when present,
/// otherwise the regular list.
fn selected_commands<'a>(ctx: &StepContext<'a>) -> &'a [String] {
    let cfg = &ctx.config.commands;
    if ctx.first_encounter && !cfg.first_encounter_commands.is_empty() {
        &cfg.first_encounter_commands
    } else {
        &cfg.commands
    }
}

/// Run a deferred sub-action at its own due tick. Liveness was already
/// checked by the scheduler.
pub fn run_deferred(
    deferred: DeferredStep,
    ctx: &StepContext,
    sink: &mut dyn FeatureSink,
) -> crate::error::Result<()> {
    match deferred {
        DeferredStep::Fireworks => {
            let cfg = &ctx.config.fireworks;
            sink.fireworks(
                &ctx.actor,
                FireworkBurst {
                    count: cfg.count,
                    power: cfg.power,
                },
            );
        }
        DeferredStep::Kit => {
            let cfg = ctx.config;
            let mut items = Vec::new();
            for spec in &cfg.kit.items {
                match KitItem::parse(spec) {
                    Ok(item) => items.push(item),
                    Err(err) => tracing::warn!(%err, "skipping kit item"),
                }
            }
            if items.is_empty() {
                return Ok(());
            }
            sink.give_items(&ctx.actor, &items);
            let note = text::expand(&cfg.messages.kit_received, ctx.actor_name, &cfg.server_name);
            sink.message(&ctx.actor, &note, false);
        }
        DeferredStep::Commands => {
            let cfg = ctx.config;
            for command in selected_commands(ctx) {
                let expanded = text::expand(command, ctx.actor_name, &cfg.server_name);
                sink.run_command(&expanded);
            }
        }
        DeferredStep::Ticker => {
            let cfg = ctx.config;
            let text = text::expand(&cfg.ticker.message, ctx.actor_name, &cfg.server_name);
            sink.ticker(&ctx.actor, &text, cfg.ticker.duration_ticks);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WelcomeConfig;
    use crate::surface::RecordingSink;
    use crate::types::ActorId;

    fn ctx<'a>(config: &'a WelcomeConfig, first_encounter: bool) -> StepContext<'a> {
        StepContext {
            actor: ActorId::new(),
            actor_name: "Ann",
            first_encounter,
            config,
        }
    }

    #[test]
    fn standard_pipeline_declares_eleven_steps() {
        let pipeline = standard_pipeline();
        assert_eq!(pipeline.len(), 11);
        assert_eq!(pipeline.step_names().next(), Some("greeting"));
    }

    #[test]
    fn greeting_expands_placeholders() {
        let mut config = WelcomeConfig::default();
        config.server_name = "Hub".to_string();
        config.messages.greeting = "Hi %player_name% @ %server_name%".to_string();
        let mut sink = RecordingSink::default();
        greeting(&ctx(&config, false), &mut sink).unwrap();
        assert_eq!(sink.calls, vec!["message[broadcast=false]: Hi Ann @ Hub"]);
    }

    #[test]
    fn first_encounter_greeting_skips_returning_actors() {
        let config = WelcomeConfig::default();
        let mut sink = RecordingSink::default();
        first_encounter_greeting(&ctx(&config, false), &mut sink).unwrap();
        assert!(sink.calls.is_empty());
        first_encounter_greeting(&ctx(&config, true), &mut sink).unwrap();
        assert_eq!(sink.calls.len(), 1);
    }

    #[test]
    fn sounds_pick_the_first_encounter_cue() {
        let config = WelcomeConfig::default();
        let mut sink = RecordingSink::default();
        sounds(&ctx(&config, false), &mut sink).unwrap();
        sounds(&ctx(&config, true), &mut sink).unwrap();
        assert_eq!(sink.calls, vec!["sound: chime", "sound: fanfare"]);
    }

    #[test]
    fn fireworks_defer_only_for_first_encounters_by_default() {
        let config = WelcomeConfig::default();
        let mut sink = RecordingSink::default();
        assert!(fireworks(&ctx(&config, false), &mut sink).unwrap().is_empty());
        let follow_ups = fireworks(&ctx(&config, true), &mut sink).unwrap();
        assert_eq!(follow_ups[0].step, DeferredStep::Fireworks);
        assert_eq!(follow_ups[0].delay_ticks, 20);
    }

    #[test]
    fn commands_fall_back_to_regular_list_for_first_encounters() {
        let mut config = WelcomeConfig::default();
        config.commands.commands = vec!["greet %player_name%".to_string()];
        let mut sink = RecordingSink::default();
        run_deferred(DeferredStep::Commands, &ctx(&config, true), &mut sink).unwrap();
        assert_eq!(sink.calls, vec!["command: greet Ann"]);

        config.commands.first_encounter_commands = vec!["gift %player_name%".to_string()];
        let mut sink = RecordingSink::default();
        run_deferred(DeferredStep::Commands, &ctx(&config, true), &mut sink).unwrap();
        assert_eq!(sink.calls, vec!["command: gift Ann"]);
    }

    #[test]
    fn deferred_kit_skips_invalid_items_and_grants_the_rest() {
        let mut config = WelcomeConfig::default();
        config.kit.items = vec![
            "ration:5".to_string(),
            "bogus:zero".to_string(),
            "lantern".to_string(),
        ];
        let mut sink = RecordingSink::default();
        run_deferred(DeferredStep::Kit, &ctx(&config, true), &mut sink).unwrap();
        assert_eq!(sink.calls[0], "kit: rationx5,lanternx1");
        assert!(sink.calls[1].starts_with("message"));
    }

    #[test]
    fn handbook_defaults_a_page_when_none_configured() {
        let config = WelcomeConfig::default();
        let mut sink = RecordingSink::default();
        handbook(&ctx(&config, true), &mut sink).unwrap();
        assert_eq!(sink.calls.len(), 1);
        assert!(sink.calls[0].starts_with("handbook:"));
    }
}
