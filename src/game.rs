//! Game session controller
//!
//! Owns the simulation state and wires it to the outside world: the timer
//! scheduler, the high score store and the presentation snapshot. Every
//! mutation enters through `&mut self` (a command or a fired timer), so at
//! most one runs at a time.

use serde::Serialize;

use crate::Position;
use crate::consts::GRID_SIZE;
use crate::highscores::HighScores;
use crate::persistence::Store;
use crate::platform::{Clock, ManualScheduler, Scheduler, Timer, TimerHandle};
use crate::settings::{Difficulty, Settings};
use crate::sim::spawn::spawn_power_up;
use crate::sim::{
    Direction, Food, GameEvent, GameState, GameStatus, PowerUp, PowerUpKind, TickOutcome, tick,
};
use crate::tuning::Tuning;

/// Handles of the timers a session may have in flight
#[derive(Debug, Default)]
struct SessionTimers {
    /// Next move and the interval it was scheduled with
    movement: Option<(TimerHandle, u64)>,
    spawn: Option<TimerHandle>,
    /// When the live spawn timer fires
    spawn_due_ms: u64,
    /// Spawn delay left over from a pause
    spawn_remaining_ms: Option<u64>,
    despawn: Option<TimerHandle>,
    slowmo: Option<TimerHandle>,
    double_points: Option<TimerHandle>,
}

impl SessionTimers {
    fn slot(&mut self, timer: Timer) -> Option<&mut Option<TimerHandle>> {
        match timer {
            Timer::Move => None,
            Timer::SpawnPowerUp => Some(&mut self.spawn),
            Timer::DespawnPowerUp => Some(&mut self.despawn),
            Timer::EffectExpired(PowerUpKind::SlowMo) => Some(&mut self.slowmo),
            Timer::EffectExpired(PowerUpKind::DoublePoints) => Some(&mut self.double_points),
            Timer::EffectExpired(PowerUpKind::Shield) => None,
        }
    }

    /// Clear the slot if `handle` is the live one for `timer`
    fn take_if_current(&mut self, handle: TimerHandle, timer: Timer) -> bool {
        if timer == Timer::Move {
            return match self.movement {
                Some((h, _)) if h == handle => {
                    self.movement = None;
                    true
                }
                _ => false,
            };
        }
        match self.slot(timer) {
            Some(slot) if *slot == Some(handle) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    fn all(&mut self) -> Vec<TimerHandle> {
        self.spawn_remaining_ms = None;
        let mut handles: Vec<_> = [
            self.spawn.take(),
            self.despawn.take(),
            self.slowmo.take(),
            self.double_points.take(),
        ]
        .into_iter()
        .flatten()
        .collect();
        handles.extend(self.movement.take().map(|(h, _)| h));
        handles
    }
}

/// Read-only view for the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub status: GameStatus,
    pub difficulty: Difficulty,
    pub grid_size: i32,
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub food: Option<Food>,
    pub obstacles: Vec<Position>,
    pub power_up: Option<PowerUp>,
    pub active_power_ups: Vec<PowerUpKind>,
    pub score: u64,
    pub level: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub foods_eaten: u32,
    /// Current tick interval (ms)
    pub speed: u64,
    /// Best score for the current difficulty
    pub high_score: u64,
    /// The finished game set a new record
    pub new_high_score: bool,
}

/// One player's game: session state plus timers and score keeping
pub struct Game<S: Scheduler, P: Store> {
    state: GameState,
    scheduler: S,
    store: P,
    tuning: Tuning,
    settings: Settings,
    high_scores: HighScores,
    timers: SessionTimers,
    new_high_score: bool,
    sessions: u64,
}

impl<S: Scheduler, P: Store> Game<S, P> {
    /// Create an idle game, reading high scores and settings from `store`
    pub fn new(scheduler: S, store: P) -> Self {
        Self::with_tuning(scheduler, store, Tuning::default())
    }

    pub fn with_tuning(scheduler: S, store: P, tuning: Tuning) -> Self {
        let high_scores = HighScores::load(&store);
        let settings = Settings::load(&store);
        Self {
            state: GameState::with_tuning(settings.difficulty, 0, tuning),
            scheduler,
            store,
            tuning,
            settings,
            high_scores,
            timers: SessionTimers::default(),
            new_high_score: false,
            sessions: 0,
        }
    }

    /// Start a fresh session (from any status)
    pub fn start(&mut self, difficulty: Difficulty) {
        let seed = self
            .scheduler
            .now_ms()
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ self.sessions;
        self.start_with_seed(difficulty, seed);
    }

    /// Start a fresh session with a fixed RNG seed
    pub fn start_with_seed(&mut self, difficulty: Difficulty, seed: u64) {
        self.cancel_all_timers();
        self.sessions += 1;
        self.new_high_score = false;
        self.state = GameState::with_tuning(difficulty, seed, self.tuning);
        self.state.status = GameStatus::Playing;

        if self.settings.difficulty != difficulty {
            self.settings.difficulty = difficulty;
            self.settings.save(&mut self.store);
        }

        self.schedule_move();
        self.schedule_spawn();
        log::info!(
            "Game started: {} (seed {}, speed {}ms)",
            difficulty.as_str(),
            seed,
            self.speed()
        );
    }

    /// Toggle between playing and paused. Effect expiries keep running;
    /// the spawn countdown is suspended and resumes where it stopped.
    pub fn pause(&mut self) {
        match self.state.status {
            GameStatus::Playing => {
                self.state.status = GameStatus::Paused;
                if let Some((handle, _)) = self.timers.movement.take() {
                    self.scheduler.cancel(handle);
                }
                if let Some(handle) = self.timers.spawn.take() {
                    self.scheduler.cancel(handle);
                    let left = self.timers.spawn_due_ms.saturating_sub(self.scheduler.now_ms());
                    self.timers.spawn_remaining_ms = Some(left);
                }
                log::info!("Paused");
            }
            GameStatus::Paused => {
                self.state.status = GameStatus::Playing;
                self.schedule_move();
                let delay = self
                    .timers
                    .spawn_remaining_ms
                    .take()
                    .unwrap_or(self.tuning.powerup_spawn_interval_ms);
                self.schedule_spawn_in(delay);
                log::info!("Resumed");
            }
            GameStatus::Idle | GameStatus::GameOver => {}
        }
    }

    /// Back to the title screen, dropping the session
    pub fn reset(&mut self) {
        self.cancel_all_timers();
        self.new_high_score = false;
        self.state = GameState::with_tuning(self.state.difficulty, 0, self.tuning);
    }

    /// Request a turn; returns whether it was accepted
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        tick::change_direction(&mut self.state, direction)
    }

    /// Handle a fired timer. Timers that are no longer current are ignored.
    pub fn fire(&mut self, handle: TimerHandle, timer: Timer) {
        if !self.timers.take_if_current(handle, timer) {
            log::debug!("Ignoring stale timer {:?}", timer);
            return;
        }

        match timer {
            Timer::Move => self.on_move(),
            Timer::SpawnPowerUp => self.on_spawn(),
            Timer::DespawnPowerUp => {
                if self.state.power_up.take().is_some() {
                    log::debug!("Power-up expired uncollected");
                }
            }
            Timer::EffectExpired(kind) => {
                self.state.effects.set(kind, false);
                log::debug!("{:?} wore off", kind);
                if kind == PowerUpKind::SlowMo {
                    self.reschedule_move();
                }
            }
        }
    }

    fn on_move(&mut self) {
        let now = self.scheduler.now_ms();
        match tick::advance(&mut self.state, now) {
            TickOutcome::Skipped => {}
            TickOutcome::Died => self.game_over(),
            TickOutcome::Moved { collected, .. } => {
                if let Some(kind) = collected {
                    self.on_power_up_collected(kind);
                }
                self.schedule_move();
            }
        }
    }

    fn on_spawn(&mut self) {
        if self.state.status != GameStatus::Playing {
            return;
        }
        if spawn_power_up(&mut self.state).is_some() {
            self.restart_timer(Timer::DespawnPowerUp, self.tuning.powerup_lifetime_ms);
        }
        self.schedule_spawn();
    }

    fn on_power_up_collected(&mut self, kind: PowerUpKind) {
        if let Some(handle) = self.timers.despawn.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(duration) = kind.duration_ms(&self.tuning) {
            self.restart_timer(Timer::EffectExpired(kind), duration);
        }
    }

    fn game_over(&mut self) {
        self.cancel_all_timers();
        self.new_high_score =
            self.high_scores
                .record(&mut self.store, self.state.difficulty, self.state.score);
    }

    /// Cancel any live timer of this kind and schedule it again
    fn restart_timer(&mut self, timer: Timer, delay_ms: u64) {
        let Some(slot) = self.timers.slot(timer) else {
            return;
        };
        if let Some(old) = slot.take() {
            self.scheduler.cancel(old);
        }
        let handle = self.scheduler.schedule(delay_ms, timer);
        if let Some(slot) = self.timers.slot(timer) {
            *slot = Some(handle);
        }
    }

    fn schedule_spawn(&mut self) {
        self.schedule_spawn_in(self.tuning.powerup_spawn_interval_ms);
    }

    fn schedule_spawn_in(&mut self, delay_ms: u64) {
        self.restart_timer(Timer::SpawnPowerUp, delay_ms);
        self.timers.spawn_due_ms = self.scheduler.now_ms() + delay_ms;
    }

    fn schedule_move(&mut self) {
        if let Some((old, _)) = self.timers.movement.take() {
            self.scheduler.cancel(old);
        }
        let interval = self.speed();
        let handle = self.scheduler.schedule(interval, Timer::Move);
        self.timers.movement = Some((handle, interval));
    }

    /// Replace a pending move whose interval no longer matches the speed
    fn reschedule_move(&mut self) {
        if self.state.status != GameStatus::Playing {
            return;
        }
        match self.timers.movement {
            Some((_, interval)) if interval == self.speed() => {}
            _ => self.schedule_move(),
        }
    }

    fn cancel_all_timers(&mut self) {
        for handle in self.timers.all() {
            self.scheduler.cancel(handle);
        }
    }

    /// Current tick interval (ms)
    pub fn speed(&self) -> u64 {
        tick::speed(&self.state)
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tooling and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.settings.save(&mut self.store);
    }

    /// Events emitted since the last call, in order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            status: state.status,
            difficulty: state.difficulty,
            grid_size: GRID_SIZE,
            snake: state.snake.iter().copied().collect(),
            direction: state.direction,
            food: state.food,
            obstacles: state.obstacles.clone(),
            power_up: state.power_up,
            active_power_ups: state.effects.active(),
            score: state.score,
            level: state.level,
            combo: state.combo,
            max_combo: state.max_combo,
            foods_eaten: state.foods_eaten,
            speed: self.speed(),
            high_score: self.high_scores.best(state.difficulty),
            new_high_score: self.new_high_score,
        }
    }
}

impl<P: Store> Game<ManualScheduler, P> {
    /// Let `ms` of clock time pass, firing due timers in order
    pub fn advance_clock(&mut self, ms: u64) {
        let target = self.scheduler.now_ms() + ms;
        self.advance_to(target);
    }

    /// Fire every timer due up to clock time `now_ms`
    pub fn advance_to(&mut self, now_ms: u64) {
        while let Some((handle, timer)) = self.scheduler.pop_due(now_ms) {
            self.fire(handle, timer);
        }
        self.scheduler.set_now(now_ms);
    }
}
