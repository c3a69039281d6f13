pub mod config;
pub mod grid;
pub mod input;
pub mod scoring;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use config::EngineConfig;
use grid::{CollisionKind, Direction, Grid, Position, StepResult};
use input::{ControlSignal, InputController, RawInput};
use scoring::ScoreTrack;

/// Lifecycle phase of a game. GameOver is terminal until an explicit restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Events emitted by a tick (scoring, game end).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    FoodEaten { position: Position, score: u32 },
    GameOver { cause: CollisionKind, score: u32 },
}

/// Per-tick state handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub segments: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub speed_ms: u64,
    pub phase: GamePhase,
}

/// The snake game: grid model, input controller, score track, and the phase
/// machine composing them. Pure and synchronous — the session runtime owns
/// the clock.
pub struct SnakeGame {
    config: EngineConfig,
    phase: GamePhase,
    grid: Grid,
    input: InputController,
    scoring: ScoreTrack,
    /// The direction the snake moves this tick. Written only inside `tick()`;
    /// the reversal guard reads it through the engine, never a stale copy.
    active: Option<Direction>,
    seed: Option<u64>,
}

impl SnakeGame {
    pub fn new() -> Self {
        Self::build(EngineConfig::load(), None)
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::build(config, None)
    }

    /// Deterministic food placement for tests and replays.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::build(config, Some(seed))
    }

    fn build(config: EngineConfig, seed: Option<u64>) -> Self {
        let grid = Grid::new(config.grid_size, Self::rng_for(seed));
        Self {
            phase: GamePhase::Idle,
            grid,
            input: InputController::new(),
            scoring: ScoreTrack::new(&config),
            active: None,
            seed,
            config,
        }
    }

    fn rng_for(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Begin a fresh run. Valid from Idle or GameOver; a silent no-op while
    /// Playing or Paused. Discards and rebuilds the whole model.
    pub fn start(&mut self) {
        match self.phase {
            GamePhase::Idle | GamePhase::GameOver => {},
            GamePhase::Playing | GamePhase::Paused => return,
        }
        self.grid = Grid::new(self.config.grid_size, Self::rng_for(self.seed));
        self.scoring = ScoreTrack::new(&self.config);
        self.input.clear();
        self.active = None;
        self.phase = GamePhase::Playing;
    }

    /// Playing↔Paused. No-op in Idle or GameOver.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Route a raw input event. Movement buffers for the next tick; the
    /// pause key is reported back for the caller to act on.
    pub fn handle_input(&mut self, event: RawInput) -> Option<ControlSignal> {
        self.input.handle(event, self.active)
    }

    /// Advance the simulation one step. The only operation that can end the
    /// game. A no-op outside Playing.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }

        if let Some(direction) = self.input.take_pending() {
            self.active = Some(direction);
        }
        let Some(direction) = self.active else {
            // No steering yet: the snake holds its cell.
            return Vec::new();
        };

        match self.grid.step(direction) {
            StepResult::Moved => Vec::new(),
            StepResult::Ate => {
                self.scoring.record_food();
                vec![GameEvent::FoodEaten {
                    position: self.grid.head(),
                    score: self.scoring.score(),
                }]
            },
            StepResult::Collision(cause) => {
                self.phase = GamePhase::GameOver;
                vec![GameEvent::GameOver {
                    cause,
                    score: self.scoring.score(),
                }]
            },
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.scoring.score()
    }

    /// Current tick interval in milliseconds.
    pub fn speed_ms(&self) -> u64 {
        self.scoring.speed_ms()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            segments: self.grid.segments().iter().copied().collect(),
            food: self.grid.food(),
            score: self.scoring.score(),
            speed_ms: self.scoring.speed_ms(),
            phase: self.phase,
        }
    }
}

impl Default for SnakeGame {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

/// Encode a snapshot for the renderer channel.
pub fn encode_snapshot(snapshot: &Snapshot) -> Vec<u8> {
    rmp_serde::to_vec(snapshot).expect("snapshot serialization must succeed")
}

/// Decode a snapshot; None for malformed bytes.
pub fn decode_snapshot(bytes: &[u8]) -> Option<Snapshot> {
    rmp_serde::from_slice(bytes).ok()
}
