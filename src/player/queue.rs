use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::TrackId;

/// 현재 곡 다음에 무엇을 재생할지 정하는 반복 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// 한 곡 반복
    Single,
    /// 목록 순서대로, 양 끝에서 반대편으로 넘어간다
    #[default]
    Queue,
    /// 목록에서 무작위
    Shuffle,
}

impl LoopMode {
    /// 한 곡 반복 -> 목록 반복 -> 무작위 -> 한 곡 반복
    pub fn cycle(self) -> Self {
        match self {
            LoopMode::Single => LoopMode::Queue,
            LoopMode::Queue => LoopMode::Shuffle,
            LoopMode::Shuffle => LoopMode::Single,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            LoopMode::Single => 0,
            LoopMode::Queue => 1,
            LoopMode::Shuffle => 2,
        }
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoopMode::Single => "한 곡 반복",
            LoopMode::Queue => "목록 반복",
            LoopMode::Shuffle => "무작위",
        };
        f.write_str(label)
    }
}

/// 재생 목록. 같은 ID는 한 번만 들어간다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayQueue {
    ids: Vec<TrackId>,
}

impl PlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 목록에 없을 때만 추가한다. 추가했으면 true.
    pub fn push(&mut self, id: TrackId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn extend(&mut self, ids: &[TrackId]) {
        for &id in ids {
            self.push(id);
        }
    }

    /// `id`를 빼고 있던 위치를 돌려준다.
    pub fn remove(&mut self, id: TrackId) -> Option<usize> {
        let index = self.position(id)?;
        self.ids.remove(index);
        Some(index)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.ids.iter().position(|&x| x == id)
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.ids.contains(&id)
    }

    pub fn get(&self, index: usize) -> Option<TrackId> {
        self.ids.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[TrackId] {
        &self.ids
    }

    /// `mode`에 따라 `current` 다음 곡.
    ///
    /// `current`가 목록에 없으면 `Queue` 모드는 맨 앞 곡을 준다.
    pub fn next_id<R: Rng + ?Sized>(
        &self,
        current: Option<TrackId>,
        mode: LoopMode,
        rng: &mut R,
    ) -> Option<TrackId> {
        match mode {
            LoopMode::Single => current,
            LoopMode::Queue => {
                if self.is_empty() {
                    return None;
                }
                let next = match current.and_then(|id| self.position(id)) {
                    Some(i) => (i + 1) % self.len(),
                    None => 0,
                };
                self.get(next)
            }
            LoopMode::Shuffle => self.random(rng),
        }
    }

    /// `mode`에 따라 `current` 이전 곡.
    ///
    /// `current`가 목록에 없으면 `Queue` 모드는 맨 뒤 곡을 준다.
    pub fn prev_id<R: Rng + ?Sized>(
        &self,
        current: Option<TrackId>,
        mode: LoopMode,
        rng: &mut R,
    ) -> Option<TrackId> {
        match mode {
            LoopMode::Single => current,
            LoopMode::Queue => {
                if self.is_empty() {
                    return None;
                }
                let len = self.len();
                let prev = match current.and_then(|id| self.position(id)) {
                    Some(i) => (i + len - 1) % len,
                    None => len - 1,
                };
                self.get(prev)
            }
            LoopMode::Shuffle => self.random(rng),
        }
    }

    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<TrackId> {
        if self.is_empty() {
            return None;
        }
        self.get(rng.gen_range(0..self.len()))
    }
}
