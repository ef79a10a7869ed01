//! Headless run of a small level with the stock entity kinds.
//!
//! The player runs right shooting at two walkers, jumps, then runs back.
//! After the run the final state hash and per-frame physics counters are
//! printed. Pass a JSON config path as the first argument to override the
//! defaults:
//!
//! ```text
//! cargo run -p tessel-engine --example headless_run -- config.json
//! RUST_LOG=tessel_engine=debug cargo run -p tessel-engine --example headless_run
//! ```

use anyhow::Context;
use tessel_engine::prelude::*;

const LEVEL: &[&str] = &[
    "#..................#",
    "#..................#",
    "#.......####.......#",
    "#..................#",
    "####################",
];

const FRAMES: u64 = 240;

fn main() -> Result<(), anyhow::Error> {
    tessel_engine::logging::init_with_filter("warn");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config from {path}"))?;
            EngineConfig::from_json_str(&text)?
        }
        None => EngineConfig::default(),
    };
    let config = EngineConfig {
        headless: true,
        ..config
    };

    let mut engine = Engine::new(World::with_tiles(TileMap::from_rows(LEVEL, 16.0)), config);
    engine.install_default_systems()?;
    kinds::register_defaults(&mut engine.world_mut().factory);

    let script = ScriptedInput::new();
    engine.register_system(InputSystem::new(script.clone()))?;
    script.hold(InputFrame::default().with("right", 1.0).with("shoot", 1.0), 90);
    script.push(InputFrame::default().with("jump", 1.0));
    script.hold(InputFrame::default().with("left", 1.0), 60);

    {
        let entities = &mut engine.world_mut().entities;
        entities.spawn_named("player", 24.0, 44.0);
        entities.spawn_named("walker", 200.0, 48.0);
        entities.spawn_named("walker", 260.0, 48.0);
    }

    let mut faults = 0;
    for _ in 0..FRAMES {
        let (frame, evicted, frame_faults) = {
            let diag = engine.frame();
            (diag.frame, diag.evicted, diag.faults().len())
        };
        faults += frame_faults;
        let stats = engine.world().physics_stats;
        if stats.entity_contacts > 0 || evicted > 0 {
            println!(
                "frame {frame:>3}: {} live, {} entity contacts, {evicted} evicted",
                engine.world().entities.len(),
                stats.entity_contacts,
            );
        }
    }

    println!("frames:     {}", engine.frame_count());
    println!("sim time:   {:.3}s", engine.sim_time());
    println!("live:       {}", engine.world().entities.len());
    println!("faults:     {faults}");
    println!("state hash: {}", engine.state_hash());
    Ok(())
}
