pub mod best_score;
pub mod leaderboard;
pub mod scheduler;
pub mod session;

pub use best_score::BestScoreStore;
pub use leaderboard::{
    HttpLeaderboard, InMemoryLeaderboard, LeaderboardEntry, LeaderboardError, LeaderboardGateway,
};
pub use scheduler::TickScheduler;
pub use session::{SessionCommand, SessionEvent, spawn_session};
