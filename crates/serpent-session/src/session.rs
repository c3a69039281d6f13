use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use serpent_engine::input::{ControlSignal, RawInput};
use serpent_engine::{GameEvent, GamePhase, SnakeGame, Snapshot};

use crate::best_score::BestScoreStore;
use crate::leaderboard::{LeaderboardEntry, LeaderboardGateway};
use crate::scheduler::TickScheduler;

/// Commands sent from a presentation host into the session task.
#[derive(Debug)]
pub enum SessionCommand {
    Start,
    TogglePause,
    Input(RawInput),
    /// Offer the finished game's score to the leaderboard. Only honored in
    /// GameOver with a positive score; never invoked by the session itself.
    SubmitScore { name: String },
    FetchTopScores { limit: usize },
    Stop,
}

/// Broadcasts from the session task to the presentation host.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Emitted after every tick and on start/restart.
    Snapshot(Snapshot),
    FoodEaten { score: u32 },
    GameEnded { score: u32, new_best: bool },
    SubmissionResult { accepted: bool },
    TopScores(Vec<LeaderboardEntry>),
    Stopped,
}

/// Spawn a game session as a tokio task. Returns the command sender, the
/// event receiver, and the task handle. Dropping the sender (or sending
/// `Stop`) ends the session; every timer and listener dies with the task.
pub fn spawn_session(
    game: SnakeGame,
    gateway: Arc<dyn LeaderboardGateway>,
    best_score_path: PathBuf,
) -> (
    mpsc::UnboundedSender<SessionCommand>,
    mpsc::UnboundedReceiver<SessionEvent>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        run_session(game, gateway, best_score_path, cmd_rx, event_tx).await;
    });

    (cmd_tx, event_rx, handle)
}

/// The session loop. One task owns the engine and the scheduler, so every
/// transition out of Playing cancels the armed tick in the same iteration
/// that decides it — a stale tick can never fire against a reset model.
async fn run_session(
    mut game: SnakeGame,
    gateway: Arc<dyn LeaderboardGateway>,
    best_score_path: PathBuf,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
) {
    let mut scheduler = TickScheduler::new();
    let mut best = BestScoreStore::load(best_score_path);
    let mut run_new_best = false;

    // Adopting an engine that is already mid-game (e.g. handed over from
    // another presentation host) keeps it ticking.
    if game.phase() == GamePhase::Playing {
        scheduler.arm(Duration::from_millis(game.speed_ms()));
    }

    loop {
        tokio::select! {
            _ = scheduler.tick() => {
                for event in game.tick() {
                    match event {
                        GameEvent::FoodEaten { score, .. } => {
                            run_new_best |= best.record(score);
                            // The interval shrank; re-arm so the new period
                            // takes effect on the very next tick.
                            scheduler.arm(Duration::from_millis(game.speed_ms()));
                            let _ = event_tx.send(SessionEvent::FoodEaten { score });
                        },
                        GameEvent::GameOver { score, .. } => {
                            scheduler.cancel();
                            let _ = event_tx.send(SessionEvent::GameEnded {
                                score,
                                new_best: run_new_best,
                            });
                        },
                    }
                }
                let _ = event_tx.send(SessionEvent::Snapshot(game.snapshot()));
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SessionCommand::Start) => {
                        let was = game.phase();
                        game.start();
                        if game.phase() != was {
                            run_new_best = false;
                            scheduler.arm(Duration::from_millis(game.speed_ms()));
                            let _ = event_tx.send(SessionEvent::Snapshot(game.snapshot()));
                        }
                    },
                    Some(SessionCommand::TogglePause) => {
                        toggle_pause(&mut game, &mut scheduler);
                    },
                    Some(SessionCommand::Input(raw)) => {
                        if game.handle_input(raw) == Some(ControlSignal::TogglePause) {
                            toggle_pause(&mut game, &mut scheduler);
                        }
                    },
                    Some(SessionCommand::SubmitScore { name }) => {
                        if game.phase() == GamePhase::GameOver && game.score() > 0 {
                            submit(&gateway, &event_tx, name, game.score());
                        } else {
                            tracing::debug!(phase = ?game.phase(), "Ignored score submission");
                        }
                    },
                    Some(SessionCommand::FetchTopScores { limit }) => {
                        fetch(&gateway, &event_tx, limit);
                    },
                    Some(SessionCommand::Stop) | None => break,
                }
            }
        }
    }

    let _ = event_tx.send(SessionEvent::Stopped);
}

/// Pause disarms the scheduler entirely (no tick accumulation); resume
/// re-arms a fresh interval at the current speed.
fn toggle_pause(game: &mut SnakeGame, scheduler: &mut TickScheduler) {
    match game.phase() {
        GamePhase::Playing => {
            game.toggle_pause();
            scheduler.cancel();
        },
        GamePhase::Paused => {
            game.toggle_pause();
            scheduler.arm(Duration::from_millis(game.speed_ms()));
        },
        GamePhase::Idle | GamePhase::GameOver => {},
    }
}

/// Fire-and-forget submission: failures are logged and surfaced as an event,
/// but never block the session loop or a restart.
fn submit(
    gateway: &Arc<dyn LeaderboardGateway>,
    event_tx: &mpsc::UnboundedSender<SessionEvent>,
    name: String,
    score: u32,
) {
    let gateway = Arc::clone(gateway);
    let event_tx = event_tx.clone();
    tokio::spawn(async move {
        let accepted = match gateway.submit_score(&name, score).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(score, error = %e, "Leaderboard submission failed");
                false
            },
        };
        let _ = event_tx.send(SessionEvent::SubmissionResult { accepted });
    });
}

fn fetch(
    gateway: &Arc<dyn LeaderboardGateway>,
    event_tx: &mpsc::UnboundedSender<SessionEvent>,
    limit: usize,
) {
    let gateway = Arc::clone(gateway);
    let event_tx = event_tx.clone();
    tokio::spawn(async move {
        match gateway.fetch_top_scores(limit).await {
            Ok(entries) => {
                let _ = event_tx.send(SessionEvent::TopScores(entries));
            },
            Err(e) => tracing::warn!(error = %e, "Leaderboard fetch failed"),
        }
    });
}
