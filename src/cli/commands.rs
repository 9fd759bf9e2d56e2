//! CLI Command Implementations

use std::path::Path;

use log::info;

use crate::cli::GenerateArgs;
use crate::dungeon::Dungeon;
use crate::error::{OublietteError, Result};
use crate::factory::RecordingFactory;
use crate::settings::{JsonSettingsStore, MazeSettings, SettingsStore};

fn settings_from_args(args: &GenerateArgs) -> MazeSettings {
    MazeSettings {
        maze_size: args.size,
        seed: args.seed.unwrap_or(1),
        use_random_seed: args.seed.is_none(),
        cutoff: args.cutoff.is_some(),
        cutoff_point: args.cutoff.unwrap_or(1),
        mark_deadends: !args.no_deadends,
        mark_longest_path: !args.no_path,
        ..Default::default()
    }
}

fn print_report(dungeon: &Dungeon<RecordingFactory>, report: &crate::generator::GenerationReport) {
    if let Some(layer) = dungeon.active_layer() {
        println!("{}", layer.to_ascii());
    }
    println!(
        "Layer {}: seed {}, {} cells visited, {} deadends, longest path {}{}",
        report.layer_index,
        report.seed,
        report.visited_cells,
        report.deadend_count,
        report.longest_path_len,
        if report.cutoff_fired { " (cutoff)" } else { "" }
    );
    println!(
        "Entrance ({}, {}), exit ({}, {}), {} rooms in the scene",
        report.entrance.x,
        report.entrance.z,
        report.exit.x,
        report.exit.z,
        dungeon.factory().live_rooms()
    );
}

/// Generate a maze from the given arguments and print it.
pub fn generate(args: &GenerateArgs, save_to: Option<&Path>) -> Result<()> {
    let settings = settings_from_args(args);
    let mut dungeon = Dungeon::new(settings, RecordingFactory::new());
    let report = dungeon.generate()?;
    print_report(&dungeon, &report);

    if let Some(path) = save_to {
        let mut store = JsonSettingsStore::new(path);
        dungeon.save_current(&mut store)?;
        println!("Settings saved: {}", path.display());
    }
    Ok(())
}

/// Write a settings file without generating anything.
pub fn save_settings(path: &Path, args: &GenerateArgs) -> Result<()> {
    let settings = settings_from_args(args);
    settings.validate()?;

    let mut store = JsonSettingsStore::new(path);
    store.save(&settings)?;
    println!("Settings saved: {}", path.display());
    Ok(())
}

/// Regenerate the maze recorded in a settings file.
pub fn generate_saved(path: &Path) -> Result<()> {
    info!("Loading settings: {}", path.display());

    let store = JsonSettingsStore::new(path);
    let mut dungeon = Dungeon::new(MazeSettings::default(), RecordingFactory::new());
    let report = dungeon.generate_saved(&store)?;
    print_report(&dungeon, &report);
    Ok(())
}

/// Generate a vertical stack and step through the requested transitions.
pub fn layers(args: &GenerateArgs, moves: &[String]) -> Result<()> {
    let settings = MazeSettings {
        infinite_vertical: true,
        ..settings_from_args(args)
    };
    let mut dungeon = Dungeon::new(settings, RecordingFactory::new());
    let report = dungeon.generate()?;
    println!(
        "Bootstrapped layers 0..=2 with seed {}, {} rooms in the scene",
        report.seed,
        dungeon.factory().live_rooms()
    );

    for step in moves {
        let active = dungeon.manager().active_index();
        let target = match step.as_str() {
            "up" => active + 1,
            "down" => active - 1,
            other => {
                return Err(OublietteError::GenerationError {
                    reason: format!("unknown move '{other}' (expected 'up' or 'down')"),
                })
            }
        };
        dungeon.update_layer(target)?;
        println!(
            "Moved {} to layer {}, {} rooms in the scene",
            step,
            dungeon.manager().active_index(),
            dungeon.factory().live_rooms()
        );
    }
    Ok(())
}
