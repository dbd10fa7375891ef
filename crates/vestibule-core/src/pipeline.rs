//! The welcome pipeline: a fixed, declared-order list of independent feature
//! steps run after an arrival's delay elapses.
//!
//! Each step reads its own enablement flag; a failing step is reported at the
//! step boundary and never prevents its siblings from running. Steps may
//! request secondary delayed sub-actions, which the caller schedules as
//! ordinary tasks with their own liveness guard.

use crate::config::WelcomeConfig;
use crate::error::Result;
use crate::surface::FeatureSink;
use crate::types::{ActorId, Feature};

// ---------------------------------------------------------------------------
// StepContext
// ---------------------------------------------------------------------------

/// Everything a step may read. The first-encounter flag is captured once at
/// the original arrival trigger, never re-evaluated at fire time, so a rapid
/// reconnect during the delay window cannot change which variant runs.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub actor: ActorId,
    pub actor_name: &'a str,
    pub first_encounter: bool,
    pub config: &'a WelcomeConfig,
}

// ---------------------------------------------------------------------------
// Deferred sub-actions
// ---------------------------------------------------------------------------

/// Feature work a step pushes past its own run via the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredStep {
    Fireworks,
    Kit,
    Commands,
    Ticker,
}

/// A step's request for a secondary delayed sub-action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUp {
    pub delay_ticks: i64,
    pub step: DeferredStep,
}

// ---------------------------------------------------------------------------
// FeatureStep / WelcomePipeline
// ---------------------------------------------------------------------------

pub type StepFn = Box<dyn Fn(&StepContext, &mut dyn FeatureSink) -> Result<Vec<FollowUp>>>;

/// One independently toggleable behavior in the pipeline.
pub struct FeatureStep {
    pub name: &'static str,
    /// The enablement flag consulted before the step runs.
    pub feature: Feature,
    pub run: StepFn,
}

impl std::fmt::Debug for FeatureStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureStep")
            .field("name", &self.name)
            .field("feature", &self.feature)
            .finish()
    }
}

#[derive(Debug)]
pub struct WelcomePipeline {
    steps: Vec<FeatureStep>,
}

impl WelcomePipeline {
    pub fn new(steps: Vec<FeatureStep>) -> Self {
        WelcomePipeline { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|s| s.name)
    }

    /// Run every enabled step in declared order, collecting follow-up
    /// requests. A step error is logged and the remaining steps still run.
    pub fn run(&self, ctx: &StepContext, sink: &mut dyn FeatureSink) -> Vec<FollowUp> {
        let mut follow_ups = Vec::new();
        for step in &self.steps {
            if !ctx.config.feature_enabled(step.feature) {
                continue;
            }
            match (step.run)(ctx, sink) {
                Ok(mut requested) => follow_ups.append(&mut requested),
                Err(err) => {
                    tracing::warn!(step = step.name, %err, "welcome step failed");
                }
            }
        }
        follow_ups
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VestibuleError;
    use crate::surface::RecordingSink;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_step(name: &'static str, feature: Feature, hits: Rc<Cell<u32>>) -> FeatureStep {
        FeatureStep {
            name,
            feature,
            run: Box::new(move |_, _| {
                hits.set(hits.get() + 1);
                Ok(Vec::new())
            }),
        }
    }

    #[test]
    fn disabled_step_is_skipped() {
        let hits = Rc::new(Cell::new(0));
        let pipeline = WelcomePipeline::new(vec![counting_step(
            "greeting",
            Feature::Greetings,
            hits.clone(),
        )]);

        let actor = ActorId::new();
        let mut config = WelcomeConfig::default();
        config.set_feature_enabled(Feature::Greetings, false);
        let ctx = StepContext {
            actor,
            actor_name: "Ann",
            first_encounter: false,
            config: &config,
        };
        pipeline.run(&ctx, &mut RecordingSink::default());
        assert_eq!(hits.get(), 0);

        config.set_feature_enabled(Feature::Greetings, true);
        let ctx = StepContext {
            actor,
            actor_name: "Ann",
            first_encounter: false,
            config: &config,
        };
        pipeline.run(&ctx, &mut RecordingSink::default());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn failing_step_does_not_abort_siblings() {
        let hits = Rc::new(Cell::new(0));
        let pipeline = WelcomePipeline::new(vec![
            FeatureStep {
                name: "broken",
                feature: Feature::Sounds,
                run: Box::new(|_, _| Err(VestibuleError::UnknownCue("kazoo".to_string()))),
            },
            counting_step("after", Feature::Titles, hits.clone()),
        ]);

        let config = WelcomeConfig::default();
        let ctx = StepContext {
            actor: ActorId::new(),
            actor_name: "Ann",
            first_encounter: false,
            config: &config,
        };
        pipeline.run(&ctx, &mut RecordingSink::default());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn steps_run_in_declared_order_and_follow_ups_accumulate() {
        let pipeline = WelcomePipeline::new(vec![
            FeatureStep {
                name: "first",
                feature: Feature::Fireworks,
                run: Box::new(|_, sink| {
                    sink.operator_notice("first");
                    Ok(vec![FollowUp { delay_ticks: 20, step: DeferredStep::Fireworks }])
                }),
            },
            FeatureStep {
                name: "second",
                feature: Feature::Kit,
                run: Box::new(|_, sink| {
                    sink.operator_notice("second");
                    Ok(vec![FollowUp { delay_ticks: 40, step: DeferredStep::Kit }])
                }),
            },
        ]);

        let config = WelcomeConfig::default();
        let ctx = StepContext {
            actor: ActorId::new(),
            actor_name: "Ann",
            first_encounter: true,
            config: &config,
        };
        let mut sink = RecordingSink::default();
        let follow_ups = pipeline.run(&ctx, &mut sink);

        assert_eq!(sink.calls, vec!["notice: first", "notice: second"]);
        assert_eq!(
            follow_ups,
            vec![
                FollowUp { delay_ticks: 20, step: DeferredStep::Fireworks },
                FollowUp { delay_ticks: 40, step: DeferredStep::Kit },
            ]
        );
    }
}
