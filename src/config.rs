use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::player::LoopMode;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 로그인 쿠키. 설정되어 있으면 모든 요청에 함께 보낸다.
    pub cookie: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cookie: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn has_cookie(&self) -> bool {
        self.cookie.as_ref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_volume")]
    pub volume: u8,
    #[serde(default)]
    pub loop_mode: LoopMode,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            loop_mode: LoopMode::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_volume() -> u8 {
    60
}

fn default_poll_interval_ms() -> u64 {
    200
}

pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("cloudtune")
        .join("config.toml")
}

pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// 지정한 경로에서 설정을 읽는다. 파일이 없거나 파싱에 실패하면 기본값.
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("설정 파일을 해석할 수 없어 기본값을 사용합니다: {}", e);
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &config_path())
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("설정 디렉토리를 만들 수 없습니다: {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("설정 파일을 쓸 수 없습니다: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml"));
        assert_eq!(cfg.api.base_url, "http://localhost:3000");
        assert_eq!(cfg.player.volume, 60);
        assert_eq!(cfg.player.loop_mode, LoopMode::Queue);
        assert_eq!(cfg.player.poll_interval_ms, 200);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.api.cookie = Some("MUSIC_U=abc".to_string());
        cfg.player.loop_mode = LoopMode::Shuffle;
        cfg.player.volume = 35;
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path);
        assert!(loaded.api.has_cookie());
        assert_eq!(loaded.player.loop_mode, LoopMode::Shuffle);
        assert_eq!(loaded.player.volume, 35);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[player]\nloop_mode = \"single\"\n").unwrap();

        let cfg = load_config_from(&path);
        assert_eq!(cfg.player.loop_mode, LoopMode::Single);
        assert_eq!(cfg.player.volume, 60);
        assert_eq!(cfg.api.timeout_secs, 10);
        assert!(!cfg.api.has_cookie());
    }

    #[test]
    fn test_garbage_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert_eq!(load_config_from(&path).player.volume, 60);
    }
}
