//! Portfolio Adventure headless runner
//!
//! Plays the game with the autopilot at a fixed timestep and prints the final
//! snapshot as JSON. Usage: `portfolio-adventure [config.json] [catalog.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use portfolio_adventure::autopilot::Autopilot;
    use portfolio_adventure::sim::{Engine, GamePhase};
    use portfolio_adventure::{EngineConfig, LevelCatalog, LogNotifier};

    /// Hard stop for runs that never finish (ten minutes of game time)
    const MAX_TICKS: u64 = 10 * 60 * 60;

    env_logger::init();
    log::info!("Portfolio Adventure (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = args
        .next()
        .map(EngineConfig::load)
        .unwrap_or_default();
    let catalog = match args.next() {
        Some(path) => match LevelCatalog::from_path(&path) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Failed to load catalog {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => LevelCatalog::builtin(),
    };
    log::info!("{} levels loaded", catalog.len());

    let tick_ms = config.tick_ms;
    let mut engine = Engine::new(config, catalog).with_notifier(LogNotifier);
    let mut pilot = Autopilot::new(0x5eed);

    engine.start_game();
    let mut ticks = 0u64;
    while ticks < MAX_TICKS {
        match engine.phase() {
            GamePhase::GameOver(_) => break,
            GamePhase::LevelComplete => engine.advance_level(),
            GamePhase::NotStarted | GamePhase::Playing => {}
        }
        for event in pilot.drive(engine.snapshot()) {
            engine.push_input(event);
        }
        engine.tick(tick_ms);
        ticks += 1;
    }

    let session = engine.session();
    log::info!(
        "Finished after {} ticks: {:?}, total score {}",
        ticks,
        session.phase,
        session.total_score + session.score
    );

    match serde_json::to_string_pretty(engine.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the host page on wasm; nothing to run here
}
