//! Match and engine configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, Sc2Error};
use crate::result::{AiBuild, Difficulty, Race};

/// Map to load when creating a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSettings {
    pub path: PathBuf,
}

impl MapSettings {
    /// Map from an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<maps_dir>/<name>.SC2Map`, unless `name` already has an extension
    pub fn from_name(maps_dir: &Path, name: &str) -> Self {
        let file = if Path::new(name).extension().is_some() {
            PathBuf::from(name)
        } else {
            PathBuf::from(format!("{}.SC2Map", name))
        };
        Self::new(maps_dir.join(file))
    }
}

/// Knobs for one match, shared by the host and join sides
#[derive(Debug, Clone, PartialEq)]
pub struct PlayOptions {
    /// Engine advances on its own; no step commands are sent
    pub realtime: bool,
    /// Wall-clock budget for one AI step (non-realtime only)
    pub step_time_limit: Option<Duration>,
    /// Game-time budget for an episode
    pub game_time_limit: Option<Duration>,
    /// Restart the game after each episode until `num_runs` episodes ran
    pub reset: bool,
    pub num_runs: u32,
    /// Game loops per step command
    pub game_steps: u32,
    /// Replay file name, saved under `replay_dir` by the host
    pub save_replay_as: Option<String>,
    pub replay_dir: PathBuf,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            realtime: false,
            step_time_limit: None,
            game_time_limit: None,
            reset: false,
            num_runs: 1,
            game_steps: 8,
            save_replay_as: None,
            replay_dir: PathBuf::from("Replays"),
        }
    }
}

impl PlayOptions {
    /// Realtime options
    pub fn realtime() -> Self {
        Self {
            realtime: true,
            ..Default::default()
        }
    }

    /// Reset mode with `num_runs` episodes
    pub fn with_reset(mut self, num_runs: u32) -> Self {
        self.reset = true;
        self.num_runs = num_runs;
        self
    }

    pub fn with_step_time_limit(mut self, limit: Duration) -> Self {
        self.step_time_limit = Some(limit);
        self
    }

    pub fn with_game_time_limit(mut self, limit: Duration) -> Self {
        self.game_time_limit = Some(limit);
        self
    }

    /// Where the host saves its replay, if requested
    pub fn replay_path(&self) -> Option<PathBuf> {
        self.save_replay_as
            .as_ref()
            .map(|name| self.replay_dir.join(name))
    }
}

/// How to launch and reach the engine process
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    /// Engine executable
    pub executable: PathBuf,
    /// Working directory for the engine process
    pub working_dir: Option<PathBuf>,
    /// Directory holding `.SC2Map` files
    pub maps_dir: PathBuf,
    pub host: String,
    /// Port to listen on; 0 picks a free port per launch
    pub port: u16,
    pub extra_args: Vec<String>,
    /// How long to keep retrying the first connection
    pub connect_timeout_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let root = sc2_root();
        Self {
            executable: root.join("Versions/Base/SC2_x64"),
            working_dir: None,
            maps_dir: root.join("Maps"),
            host: "127.0.0.1".to_string(),
            port: 0,
            extra_args: Vec::new(),
            connect_timeout_secs: 120.0,
        }
    }
}

impl EngineConfig {
    /// Config for an already-running engine proxy
    pub fn with_address(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Connect timeout; `None` when it does not fit a `Duration`
    pub fn connect_timeout(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.connect_timeout_secs.max(0.0)).ok()
    }
}

/// Installation root from `SC2PATH`, falling back to the Linux default
fn sc2_root() -> PathBuf {
    std::env::var("SC2PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join("StarCraftII")
        })
}

/// A participant that can be described in a config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParticipantConfig {
    Human {
        #[serde(default)]
        race: Race,
        #[serde(default)]
        name: Option<String>,
    },
    Computer {
        #[serde(default)]
        race: Race,
        #[serde(default)]
        difficulty: Difficulty,
        #[serde(default)]
        ai_build: AiBuild,
    },
}

impl ParticipantConfig {
    /// Needs its own API connection
    pub fn is_controlled(&self) -> bool {
        matches!(self, ParticipantConfig::Human { .. })
    }
}

/// Top-level config file for the match runner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct MatchConfig {
    pub map: String,
    pub participants: Vec<ParticipantConfig>,
    #[serde(default)]
    pub realtime: bool,
    #[serde(default)]
    pub step_time_limit_secs: Option<f64>,
    #[serde(default)]
    pub game_time_limit_secs: Option<f64>,
    #[serde(default)]
    pub reset: bool,
    #[serde(default = "default_num_runs")]
    pub num_runs: u32,
    #[serde(default = "default_game_steps")]
    pub game_steps: u32,
    #[serde(default)]
    pub save_replay_as: Option<String>,
    #[serde(default = "default_replay_dir")]
    pub replay_dir: PathBuf,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Limits that `validate` would reject never become a `Duration`
fn secs_to_duration(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}

fn default_num_runs() -> u32 {
    1
}

fn default_game_steps() -> u32 {
    8
}

fn default_replay_dir() -> PathBuf {
    PathBuf::from("Replays")
}

impl MatchConfig {
    /// Load and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Sc2Error::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config
    pub fn from_json(text: &str) -> Result<Self> {
        let config: MatchConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.participants.is_empty() {
            return Err(Sc2Error::InvalidConfig(
                "Can't create a game without players".into(),
            ));
        }
        if !self.participants.iter().any(ParticipantConfig::is_controlled) {
            return Err(Sc2Error::InvalidConfig(
                "At least one participant must be controlled".into(),
            ));
        }
        if self.num_runs == 0 {
            return Err(Sc2Error::InvalidConfig("num_runs must be at least 1".into()));
        }
        if self.game_steps == 0 {
            return Err(Sc2Error::InvalidConfig(
                "game_steps must be at least 1".into(),
            ));
        }
        for (name, secs) in [
            ("step_time_limit_secs", self.step_time_limit_secs),
            ("game_time_limit_secs", self.game_time_limit_secs),
            ("engine.connect_timeout_secs", Some(self.engine.connect_timeout_secs)),
        ] {
            if let Some(secs) = secs {
                if Duration::try_from_secs_f64(secs).is_err() {
                    return Err(Sc2Error::InvalidConfig(format!(
                        "{} must be a non-negative number of seconds that fits a duration, got {}",
                        name, secs
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn map_settings(&self) -> MapSettings {
        MapSettings::from_name(&self.engine.maps_dir, &self.map)
    }

    pub fn play_options(&self) -> PlayOptions {
        PlayOptions {
            realtime: self.realtime,
            step_time_limit: self.step_time_limit_secs.and_then(secs_to_duration),
            game_time_limit: self.game_time_limit_secs.and_then(secs_to_duration),
            reset: self.reset,
            num_runs: self.num_runs,
            game_steps: self.game_steps,
            save_replay_as: self.save_replay_as.clone(),
            replay_dir: self.replay_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config = MatchConfig::from_json(
            r#"{
                "map": "AcropolisLE",
                "participants": [
                    {"type": "human", "race": "Terran"},
                    {"type": "computer", "race": "Zerg", "difficulty": "Easy"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.num_runs, 1);
        assert_eq!(config.game_steps, 8);
        assert!(!config.realtime);

        let options = config.play_options();
        assert_eq!(options.step_time_limit, None);
        assert_eq!(options.replay_path(), None);
        assert!(
            config
                .map_settings()
                .path
                .ends_with("Maps/AcropolisLE.SC2Map")
        );
    }

    #[test]
    fn test_limits_convert_to_durations() {
        let config = MatchConfig::from_json(
            r#"{
                "map": "Flat64.SC2Map",
                "participants": [{"type": "human"}],
                "step_time_limit_secs": 0.5,
                "game_time_limit_secs": 60,
                "save_replay_as": "flat.SC2Replay"
            }"#,
        )
        .unwrap();

        let options = config.play_options();
        assert_eq!(options.step_time_limit, Some(Duration::from_millis(500)));
        assert_eq!(options.game_time_limit, Some(Duration::from_secs(60)));
        assert_eq!(
            options.replay_path(),
            Some(PathBuf::from("Replays/flat.SC2Replay"))
        );
        assert!(config.map_settings().path.ends_with("Flat64.SC2Map"));
    }

    #[test]
    fn test_rejects_uncontrolled_match() {
        let err = MatchConfig::from_json(
            r#"{"map": "Flat64", "participants": [{"type": "computer"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Sc2Error::InvalidConfig(_)));

        let err = MatchConfig::from_json(r#"{"map": "Flat64", "participants": []}"#).unwrap_err();
        assert!(err.to_string().contains("without players"));
    }

    #[test]
    fn test_rejects_zero_runs() {
        let err = MatchConfig::from_json(
            r#"{"map": "Flat64", "participants": [{"type": "human"}], "num_runs": 0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("num_runs"));
    }

    #[test]
    fn test_engine_address_override() {
        let engine = EngineConfig::with_address("10.0.0.2", 5000);
        assert_eq!(engine.host, "10.0.0.2");
        assert_eq!(engine.port, 5000);
        assert_eq!(engine.connect_timeout(), Some(Duration::from_secs(120)));

        let mut engine = engine;
        engine.connect_timeout_secs = f64::INFINITY;
        assert_eq!(engine.connect_timeout(), None);
    }

    #[test]
    fn test_rejects_limits_that_overflow_a_duration() {
        for field in ["step_time_limit_secs", "game_time_limit_secs"] {
            for value in ["1e30", "-1"] {
                let json = format!(
                    r#"{{"map": "Flat64", "participants": [{{"type": "human"}}], "{}": {}}}"#,
                    field, value
                );
                let err = MatchConfig::from_json(&json).unwrap_err();
                assert!(matches!(err, Sc2Error::InvalidConfig(_)), "{}={}", field, value);
                assert!(err.to_string().contains(field));
            }
        }

        let err = MatchConfig::from_json(
            r#"{"map": "Flat64", "participants": [{"type": "human"}],
                "engine": {"connect_timeout_secs": 1e300}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("connect_timeout_secs"));

        let mut config = MatchConfig::from_json(
            r#"{"map": "Flat64", "participants": [{"type": "human"}]}"#,
        )
        .unwrap();
        config.engine.connect_timeout_secs = f64::INFINITY;
        assert!(config.validate().is_err());
        config.engine.connect_timeout_secs = f64::NAN;
        assert!(config.validate().is_err());
    }
}
