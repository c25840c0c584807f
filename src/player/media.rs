use std::time::Instant;

use anyhow::{bail, Result};

/// 재생 스토어가 구동하는 미디어 요소.
/// 시간 단위는 초.
pub trait MediaElement {
    /// 음원을 교체한다. 재생은 `play`를 호출해야 시작된다.
    /// `duration_hint`는 메타데이터에서 얻은 곡 길이로, 음원에서 길이를 알 수 없을 때 쓴다.
    fn set_source(&mut self, url: &str, duration_hint: Option<f64>) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    /// 음원을 내리고 처음 상태로 되돌린다.
    fn load(&mut self);
    /// 0.0 ~ 1.0
    fn set_volume(&mut self, volume: f64);
    fn set_muted(&mut self, muted: bool);
    fn seek(&mut self, position: f64);
    fn current_time(&self) -> f64;
    fn duration(&self) -> Option<f64>;
    fn ended(&self) -> bool;
}

/// 소리를 내지 않고 시계만 흘려보내는 미디어 요소.
/// `audio` 기능 없이 빌드했을 때 기본으로 쓰인다.
#[derive(Debug, Default)]
pub struct HeadlessMedia {
    source: Option<String>,
    duration: Option<f64>,
    base_position: f64,
    started_at: Option<Instant>,
    volume: f64,
    muted: bool,
}

impl HeadlessMedia {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            ..Default::default()
        }
    }

    fn position_at(&self, now: Instant) -> f64 {
        let raw = match self.started_at {
            Some(started) => self.base_position + now.duration_since(started).as_secs_f64(),
            None => self.base_position,
        };
        match self.duration {
            Some(d) => raw.min(d),
            None => raw,
        }
    }
}

impl MediaElement for HeadlessMedia {
    fn set_source(&mut self, url: &str, duration_hint: Option<f64>) -> Result<()> {
        self.source = Some(url.to_string());
        self.duration = duration_hint.filter(|d| d.is_finite() && *d > 0.0);
        self.base_position = 0.0;
        self.started_at = None;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.source.is_none() {
            bail!("재생할 음원이 없습니다");
        }
        if self.ended() {
            self.base_position = 0.0;
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.base_position = self.position_at(Instant::now());
        self.started_at = None;
    }

    fn load(&mut self) {
        let volume = self.volume;
        let muted = self.muted;
        *self = Self {
            volume,
            muted,
            ..Default::default()
        };
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn seek(&mut self, position: f64) {
        let position = position.max(0.0);
        self.base_position = match self.duration {
            Some(d) => position.min(d),
            None => position,
        };
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn current_time(&self) -> f64 {
        self.position_at(Instant::now())
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn ended(&self) -> bool {
        match self.duration {
            Some(d) => self.source.is_some() && self.current_time() >= d,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_requires_source() {
        let mut media = HeadlessMedia::new();
        assert!(media.play().is_err());
        media.set_source("http://m/1.mp3", Some(180.0)).unwrap();
        assert!(media.play().is_ok());
    }

    #[test]
    fn test_seek_and_pause_hold_position() {
        let mut media = HeadlessMedia::new();
        media.set_source("http://m/1.mp3", Some(180.0)).unwrap();
        media.play().unwrap();
        media.seek(42.0);
        media.pause();
        let held = media.current_time();
        assert!((42.0..43.0).contains(&held));
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(media.current_time(), held);

        media.play().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert!(media.current_time() > held);
        media.pause();

        media.seek(42.0);
        assert_eq!(media.current_time(), 42.0);
        media.seek(500.0);
        assert_eq!(media.current_time(), 180.0);
        assert!(media.ended());
    }

    #[test]
    fn test_play_after_end_restarts() {
        let mut media = HeadlessMedia::new();
        media.set_source("http://m/1.mp3", Some(10.0)).unwrap();
        media.seek(10.0);
        assert!(media.ended());
        media.play().unwrap();
        assert!(!media.ended());
        assert!(media.current_time() < 1.0);
    }

    #[test]
    fn test_load_keeps_volume() {
        let mut media = HeadlessMedia::new();
        media.set_volume(0.3);
        media.set_muted(true);
        media.set_source("http://m/1.mp3", None).unwrap();
        media.load();
        assert!(media.source.is_none());
        assert_eq!(media.volume, 0.3);
        assert!(media.muted);
        assert_eq!(media.duration(), None);
        assert!(!media.ended());
    }
}
