use std::path::Path;
use vestibule_core::encounter::MemoryEncounterStore;
use vestibule_core::greeter::Greeter;
use vestibule_core::router::ClickRegion;
use vestibule_core::surface::{LogSink, MemoryRoster, MemorySurface};
use vestibule_core::text;
use vestibule_core::types::ActorId;

// ---------------------------------------------------------------------------
// simulate: scripted lobby run against stub collaborators
// ---------------------------------------------------------------------------

const NAMES: [&str; 8] = ["Ann", "Ben", "Cleo", "Dane", "Elin", "Finn", "Gray", "Hope"];

pub fn run(config_path: Option<&Path>, ticks: u64, actors: usize) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let mut greeter = Greeter::new(config, None, Box::new(MemoryEncounterStore::default()));
    let mut roster = MemoryRoster::default();
    let mut surface = MemorySurface::default();
    let mut sink = LogSink;

    let actors = actors.clamp(1, NAMES.len());
    let mut ids = Vec::with_capacity(actors);
    for name in NAMES.iter().take(actors) {
        let actor = ActorId::new();
        roster.connect(actor);
        greeter.on_arrival(actor, name);
        ids.push((actor, *name));
        tracing::info!("{name} arrived");
    }

    // The first actor opens the config menu and pokes at it.
    let (first, first_name) = ids[0];
    greeter.open_menu(&mut surface, first);
    tracing::info!("{first_name} opened the menu");
    greeter.handle_click(&mut surface, &mut sink, first, 32, ClickRegion::Grid);
    greeter.handle_click(&mut surface, &mut sink, first, 13, ClickRegion::Grid);

    // The last actor leaves halfway through, cancelling their pending work.
    let halfway = ticks / 2;
    for tick in 0..ticks {
        if tick == halfway && ids.len() > 1 {
            if let Some((leaver, leaver_name)) = ids.pop() {
                roster.disconnect(&leaver);
                greeter.on_departure(leaver, leaver_name, &mut sink);
                tracing::info!("{leaver_name} left at tick {tick}");
            }
        }
        greeter.tick(&roster, &mut sink);
    }

    println!();
    println!("after {ticks} tick(s):");
    println!("  sessions tracked : {}", greeter.registry().tracked_count());
    println!("  tasks pending    : {}", greeter.pending_tasks());
    println!("  feed entries     : {}", greeter.feed().len());
    let feed_config = &greeter.config().feed;
    for event in greeter.feed().recent(feed_config.display_count) {
        println!(
            "    {}",
            text::feed_line(&feed_config.entry_format, &event, &feed_config.time_format)
        );
    }
    Ok(())
}
