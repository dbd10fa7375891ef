use crate::output::{print_json, print_table};
use std::path::Path;

// ---------------------------------------------------------------------------
// check: report the corrections normalize would apply to a config
// ---------------------------------------------------------------------------

pub fn run(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    let warnings = config.normalize();

    if json {
        return print_json(&warnings);
    }

    if warnings.is_empty() {
        println!("config ok — nothing to correct");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = warnings
        .iter()
        .map(|w| vec![format!("{:?}", w.level).to_lowercase(), w.message.clone()])
        .collect();
    print_table(&["level", "message"], rows);
    println!();
    println!(
        "{} value(s) would be corrected at load time; the corrected config still runs.",
        warnings.len()
    );
    Ok(())
}
