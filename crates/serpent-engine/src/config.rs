use serde::{Deserialize, Serialize};

/// Data-driven engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cells per side of the square grid.
    pub grid_size: i16,
    /// Tick interval at game start (ms).
    pub initial_tick_ms: u64,
    /// Interval reduction per food eaten (ms).
    pub tick_step_ms: u64,
    /// Interval floor (ms). The game never gets faster than this.
    pub min_tick_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_tick_ms: 150,
            tick_step_ms: 10,
            min_tick_ms: 60,
        }
    }
}

impl EngineConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("SERPENT_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        if let Ok(contents) = std::fs::read_to_string("config/serpent.toml")
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        Self::default()
    }
}
