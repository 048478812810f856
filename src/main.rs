//! Cho Snake entry point
//!
//! The browser build is driven from JS through the library's `web` module.
//! Natively this runs a headless autopilot game and prints the result.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cho_snake::persistence::MemoryStore;
    use cho_snake::platform::{ManualScheduler, Timer};
    use cho_snake::sim::{GameEvent, GameStatus, autopilot};
    use cho_snake::{Difficulty, Game};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or_default();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    const MAX_TICKS: u32 = 5000;

    log::info!("Cho Snake (native demo) starting: {} seed {}", difficulty.label(), seed);

    let mut game = Game::new(ManualScheduler::new(), MemoryStore::new());
    game.start_with_seed(difficulty, seed);

    let mut ticks = 0;
    let mut eats = 0;
    let mut power_ups = 0;
    while game.status() == GameStatus::Playing && ticks < MAX_TICKS {
        let Some(due) = game.scheduler().due_of(Timer::Move) else {
            break;
        };
        let direction = autopilot::choose_direction(game.state());
        game.change_direction(direction);
        game.advance_to(due);
        ticks += 1;

        for event in game.drain_events() {
            match event {
                GameEvent::Eat { .. } => eats += 1,
                GameEvent::PowerUp { .. } => power_ups += 1,
                GameEvent::LevelUp { level, .. } => println!("Level {}!", level),
                GameEvent::Die { pos, .. } => println!("Crashed at ({}, {})", pos.x, pos.y),
            }
        }
    }

    let snapshot = game.snapshot();
    println!(
        "\n{} ticks, {} foods, {} power-ups, max combo {}",
        ticks, eats, power_ups, snapshot.max_combo
    );
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize snapshot: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::init, this is just to satisfy the compiler
}
