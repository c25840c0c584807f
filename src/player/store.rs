use std::collections::HashSet;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api::Catalog;
use crate::config::PlayerConfig;
use crate::models::{Song, TrackId};
use crate::notify::{Notifier, NotifyKind};
use crate::player::{LoopMode, MediaElement, PlayQueue, Ticker};

/// 재생 상태의 개념적 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
}

/// 스토어가 노출하는 재생 상태.
/// `current_time`/`duration`은 미디어 요소를 따라가며, 탐색 중에는 갱신되지 않는다.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub id: Option<TrackId>,
    pub song: Option<Song>,
    pub loop_mode: LoopMode,
    /// 0 ~ 100
    pub volume: u8,
    pub is_playing: bool,
    pub is_paused: bool,
    /// 진행 막대를 끌고 있는 중
    pub slider_input: bool,
    pub ended: bool,
    pub muted: bool,
    pub loading: bool,
    /// 초, 소수점 둘째 자리
    pub current_time: f64,
    /// 초
    pub duration: u64,
    /// 재생할 수 없어 건너뛴 곡 수
    pub error_count: u32,
    pub show_player_page: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            id: None,
            song: None,
            loop_mode: LoopMode::Queue,
            volume: 60,
            is_playing: false,
            is_paused: false,
            slider_input: false,
            ended: false,
            muted: false,
            loading: false,
            current_time: 0.0,
            duration: 0,
            error_count: 0,
            show_player_page: false,
        }
    }
}

/// 재생할 수 없는 곡을 만났을 때 다음 후보를 고르는 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    /// 직접 고른 곡: 이미 재생 중이면 멈추고, 아니면 다음 곡으로.
    Direct,
    Forward,
    Backward,
}

/// 세션 단위의 재생 스토어.
///
/// 미디어 요소 하나와 재생 목록을 독점한다. 모든 동작은 한 스레드에서
/// 순서대로 실행되고, 재생 시작 때만 음원 주소와 곡 정보를 동시에 가져온다.
pub struct PlayerStore<C, M, N> {
    catalog: C,
    media: M,
    notifier: N,
    queue: PlayQueue,
    state: PlayerState,
    ticker: Ticker,
    rng: StdRng,
}

impl<C, M, N> PlayerStore<C, M, N>
where
    C: Catalog,
    M: MediaElement,
    N: Notifier,
{
    pub fn new(catalog: C, media: M, notifier: N, config: &PlayerConfig) -> Self {
        Self {
            catalog,
            media,
            notifier,
            queue: PlayQueue::new(),
            state: PlayerState {
                loop_mode: config.loop_mode,
                volume: config.volume.min(100),
                ..Default::default()
            },
            ticker: Ticker::new(Duration::from_millis(config.poll_interval_ms.max(1))),
            rng: StdRng::from_entropy(),
        }
    }

    /// 무작위 재생에 쓸 난수 생성기를 바꾼다.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn init(&mut self) {
        self.media.set_volume(f64::from(self.state.volume) / 100.0);
    }

    /// 스토어가 쓰는 카탈로그. 재생 목록을 만들 때 같은 클라이언트를 쓴다.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    #[cfg(test)]
    pub fn media(&self) -> &M {
        &self.media
    }

    #[cfg(test)]
    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn play_list_count(&self) -> usize {
        self.queue.len()
    }

    /// 현재 곡의 재생 목록 내 위치.
    pub fn this_index(&self) -> Option<usize> {
        self.state.id.and_then(|id| self.queue.position(id))
    }

    pub fn phase(&self) -> Phase {
        let s = &self.state;
        if s.loading {
            Phase::Loading
        } else if s.song.is_none() {
            Phase::Idle
        } else if s.ended {
            Phase::Ended
        } else if s.is_playing {
            Phase::Playing
        } else {
            Phase::Paused
        }
    }

    pub fn next_song_id(&mut self) -> Option<TrackId> {
        self.queue
            .next_id(self.state.id, self.state.loop_mode, &mut self.rng)
    }

    pub fn prev_song_id(&mut self) -> Option<TrackId> {
        self.queue
            .prev_id(self.state.id, self.state.loop_mode, &mut self.rng)
    }

    pub fn push_play_list(&mut self, ids: &[TrackId]) {
        self.queue.extend(ids);
    }

    pub fn remove_song(&mut self, id: TrackId) {
        self.queue.remove(id);
    }

    /// 재생 목록과 재생 상태를 초기화하고 미디어 요소를 비운다.
    pub fn clear_play_list(&mut self) {
        let s = &mut self.state;
        s.id = None;
        s.song = None;
        s.is_playing = false;
        s.is_paused = false;
        s.slider_input = false;
        s.ended = false;
        s.muted = false;
        s.current_time = 0.0;
        s.duration = 0;
        self.queue.clear();
        self.media.load();
        self.media.set_muted(false);
        self.ticker.cancel();
    }

    /// 곡을 재생한다. 재생할 수 없는 곡은 알림 후 목록에서 빼고 다음 곡을 시도한다.
    pub fn play(&mut self, id: TrackId) -> Result<()> {
        self.play_with(id, Skip::Direct)
    }

    /// 재생 목록을 `ids`로 교체하고 첫 곡부터 재생한다.
    pub fn play_multi(&mut self, ids: &[TrackId]) -> Result<()> {
        let Some(&first) = ids.first() else {
            return Ok(());
        };
        self.clear_play_list();
        self.push_play_list(ids);
        self.play(first)
    }

    pub fn next(&mut self) -> Result<()> {
        match self.next_song_id() {
            Some(id) => self.play_with(id, Skip::Forward),
            None => Ok(()),
        }
    }

    pub fn prev(&mut self) -> Result<()> {
        match self.prev_song_id() {
            Some(id) => self.play_with(id, Skip::Backward),
            None => Ok(()),
        }
    }

    /// 곡이 끝났을 때 호출한다.
    pub fn play_end(&mut self) -> Result<()> {
        self.next()
    }

    /// 현재 곡을 처음부터 다시 재생한다.
    pub fn replay(&mut self) -> Result<()> {
        if self.state.song.is_none() {
            return Ok(());
        }
        self.state.current_time = 0.0;
        self.state.ended = false;
        self.media.seek(0.0);
        self.media.play()?;
        self.state.is_playing = true;
        self.state.is_paused = false;
        self.interval();
        Ok(())
    }

    pub fn toggle_play(&mut self) -> Result<()> {
        if self.state.is_playing {
            self.set_pause();
            Ok(())
        } else {
            self.set_play()
        }
    }

    pub fn set_play(&mut self) -> Result<()> {
        if self.state.song.is_none() {
            return Ok(());
        }
        self.media.play()?;
        self.state.is_playing = true;
        self.state.is_paused = false;
        self.state.ended = false;
        Ok(())
    }

    pub fn set_pause(&mut self) {
        if self.state.song.is_none() {
            return;
        }
        self.media.pause();
        self.state.is_playing = false;
        self.state.is_paused = true;
    }

    pub fn toggle_loop(&mut self) {
        self.state.loop_mode = self.state.loop_mode.cycle();
        tracing::debug!(mode = self.state.loop_mode.index(), "loop mode");
    }

    pub fn toggle_muted(&mut self) {
        self.state.muted = !self.state.muted;
        self.media.set_muted(self.state.muted);
    }

    /// 음량을 0 ~ 100 범위로 잘라 설정한다.
    pub fn set_volume(&mut self, n: i32) {
        let n = n.clamp(0, 100) as u8;
        self.state.volume = n;
        self.media.set_volume(f64::from(n) / 100.0);
    }

    /// 진행 막대 드래그 시작.
    pub fn on_slider_input(&mut self) {
        self.state.slider_input = true;
    }

    /// 진행 막대 드래그 완료. 해당 위치로 이동한다.
    /// 유한하지 않은 값은 무시하고, 곡 길이를 알면 그 안으로 자른다.
    pub fn on_slider_change(&mut self, position: f64) {
        self.state.slider_input = false;
        if !position.is_finite() {
            tracing::warn!(position, "ignoring non-finite seek");
            return;
        }
        let mut position = position.max(0.0);
        if let Some(duration) = self.media.duration().filter(|d| d.is_finite()) {
            position = position.min(duration);
        }
        self.state.current_time = position;
        self.media.seek(position);
    }

    /// 진행 상태 폴링 타이머를 새로 건다. 이전 타이머는 취소된다.
    pub fn interval(&mut self) {
        if self.state.is_playing && !self.state.slider_input {
            self.ticker.arm(Instant::now());
            tracing::trace!(generation = self.ticker.generation(), "poll timer armed");
        }
    }

    /// 다음 폴링 시각.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ticker.deadline()
    }

    #[cfg(test)]
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// 폴링 시각이 지났으면 미디어 요소의 진행 상태를 반영한다.
    /// 곡이 방금 끝났으면 true를 돌려주고, 호출자는 `play_end`를 부른다.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.ticker.fire(now) {
            return false;
        }
        if !self.state.is_playing || self.state.slider_input {
            return false;
        }

        self.state.current_time = (self.media.current_time() * 100.0).round() / 100.0;
        if let Some(duration) = self.media.duration().filter(|d| d.is_finite()) {
            self.state.duration = duration.round().max(0.0) as u64;
        }

        let was_ended = self.state.ended;
        self.state.ended = self.media.ended();
        !was_ended && self.state.ended
    }

    pub fn open_player_page(&mut self) {
        self.state.show_player_page = true;
    }

    pub fn close_player_page(&mut self) {
        self.state.show_player_page = false;
    }

    fn play_with(&mut self, id: TrackId, skip: Skip) -> Result<()> {
        self.state.loading = true;
        let result = self.resolve_and_start(id, skip);
        self.state.loading = false;
        result
    }

    /// 재생 가능한 곡을 찾을 때까지 후보를 옮겨간다.
    /// 한 번 확인한 곡은 다시 시도하지 않으므로 목록 길이 안에서 끝난다.
    fn resolve_and_start(&mut self, id: TrackId, skip: Skip) -> Result<()> {
        let mut visited = HashSet::new();
        let mut candidate = id;

        while visited.insert(candidate) {
            let check = self.catalog.check_music(candidate)?;
            if check.success {
                return self.start(candidate);
            }

            tracing::warn!(id = candidate, reason = %check.message, "track unavailable");
            self.notifier.notify(&check.message, NotifyKind::Warning);
            self.state.error_count += 1;

            let index = self.queue.remove(candidate).unwrap_or(0);
            if self.queue.is_empty() {
                return Ok(());
            }
            if skip == Skip::Direct && self.is_active() {
                return Ok(());
            }

            let len = self.queue.len();
            let next_index = match skip {
                Skip::Direct | Skip::Forward => index % len,
                Skip::Backward => (index + len - 1) % len,
            };
            match self.queue.get(next_index) {
                Some(next) => candidate = next,
                None => return Ok(()),
            }
        }

        Ok(())
    }

    fn start(&mut self, id: TrackId) -> Result<()> {
        self.queue.push(id);

        let catalog = &self.catalog;
        let (url, song) = std::thread::scope(|s| {
            let url = s.spawn(|| catalog.audio_source(id));
            let song = catalog.song_detail(id);
            (url.join(), song)
        });
        let url = url.map_err(|_| anyhow!("음원 주소 조회 중 스레드가 중단되었습니다"))??;
        let song = song?;

        self.state.id = Some(id);
        self.state.is_playing = false;
        self.state.ended = false;
        self.state.current_time = 0.0;

        let hint = (song.duration_ms > 0).then(|| song.duration_ms as f64 / 1000.0);
        self.media.set_source(&url, hint)?;
        self.media.play()?;

        tracing::info!(id, name = %song.name, "now playing");
        self.state.is_playing = true;
        self.state.is_paused = false;
        self.state.duration = hint.map(|d| d.round() as u64).unwrap_or(0);
        self.state.song = Some(song);
        self.interval();
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.state.is_playing && !self.state.ended
    }
}
