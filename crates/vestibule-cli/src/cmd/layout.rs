use crate::output::print_json;
use serde::Serialize;
use std::path::Path;
use vestibule_core::feed::FeedStore;
use vestibule_core::menu;
use vestibule_core::session::{SessionRegistry, SlotAction};
use vestibule_core::surface::MemorySurface;
use vestibule_core::types::{ActorId, Feature, ROW_WIDTH};

// ---------------------------------------------------------------------------
// layout: render the effective menu grid
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SlotReport {
    slot: usize,
    label: String,
    icon: String,
    interactive: bool,
}

pub fn run(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    for warning in config.normalize() {
        tracing::warn!("config: {}", warning.message);
    }

    let feed = FeedStore::new(config.feed.capacity, config.feed.enabled);
    let mut registry = SessionRegistry::new();
    let mut surface = MemorySurface::default();
    let actor = ActorId::new();
    registry.open(
        &mut surface,
        actor,
        &config.menu.title,
        config.menu.grid_size,
        &mut |session| menu::populate(session, &config, &feed),
    );
    let session = registry
        .session(&actor)
        .ok_or_else(|| anyhow::anyhow!("no session tracked after open"))?;

    if json {
        let slots: Vec<SlotReport> = (0..session.grid_size())
            .filter_map(|i| session.slot(i).map(|b| (i, b)))
            .map(|(slot, binding)| SlotReport {
                slot,
                label: binding.item.label.clone(),
                icon: binding.item.icon.as_str().to_string(),
                interactive: binding.action.is_some(),
            })
            .collect();
        return print_json(&slots);
    }

    println!("{} ({} slots)", session.title(), session.grid_size());
    println!();
    for row in 0..(session.grid_size() / ROW_WIDTH) {
        let cells: Vec<String> = (0..ROW_WIDTH)
            .map(|col| cell_tag(session.slot(row * ROW_WIDTH + col).and_then(|b| b.action)))
            .collect();
        println!("  {}", cells.join(" "));
    }
    println!();
    println!("  legend: ···· filler   FEED live feed   RLOD reload   others toggle a feature");
    Ok(())
}

fn cell_tag(action: Option<SlotAction>) -> String {
    match action {
        None => "····".to_string(),
        Some(SlotAction::RefreshFeed) => "FEED".to_string(),
        Some(SlotAction::ReloadConfig) => "RLOD".to_string(),
        Some(SlotAction::ToggleFeature(feature)) => feature_tag(feature).to_string(),
    }
}

fn feature_tag(feature: Feature) -> &'static str {
    match feature {
        Feature::Greetings => "GREE",
        Feature::DepartureNotices => "DEPA",
        Feature::FirstEncounter => "FRST",
        Feature::Titles => "TITL",
        Feature::Sounds => "SOND",
        Feature::Effects => "EFCT",
        Feature::BroadcastGreetings => "BCST",
        Feature::Fireworks => "FIRE",
        Feature::Kit => "KIT ",
        Feature::StatusBar => "SBAR",
        Feature::Ticker => "TICK",
        Feature::Commands => "CMND",
        Feature::Handbook => "BOOK",
    }
}
