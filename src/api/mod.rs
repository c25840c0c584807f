pub mod artist;
pub mod client;
pub mod music;
pub mod playlist;
pub mod user;

use anyhow::Result;
use thiserror::Error;

use crate::models::{Availability, Song, TrackId};

pub use client::ApiClient;

/// HTTP 계층에서 발생하는 오류.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status}: {path}")]
    Status { status: u16, path: String },
    #[error("API 응답 코드 {code}: {message}")]
    Code { code: i64, message: String },
    #[error("{0}")]
    Missing(String),
}

/// 목록 조회용 페이지 지정.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    fn params(&self, id: u64) -> Vec<(&'static str, String)> {
        vec![
            ("id", id.to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

/// 더 가져올 항목이 있는지 함께 돌려주는 목록.
#[derive(Debug, Clone, Default)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub more: bool,
}

/// 재생 스토어가 카탈로그에 요구하는 기능.
/// 재생 시 음원 주소와 곡 정보를 동시에 가져오므로 `Sync`여야 한다.
pub trait Catalog: Sync {
    /// 곡을 재생할 수 있는지 확인한다. 불가능한 곡은 `Err`가 아니라
    /// `success: false`로 돌려준다.
    fn check_music(&self, id: TrackId) -> Result<Availability>;
    /// 곡의 음원 URL을 가져온다.
    fn audio_source(&self, id: TrackId) -> Result<String>;
    /// 곡의 상세 정보를 가져온다.
    fn song_detail(&self, id: TrackId) -> Result<Song>;
}

impl Catalog for ApiClient {
    fn check_music(&self, id: TrackId) -> Result<Availability> {
        ApiClient::check_music(self, id)
    }

    fn audio_source(&self, id: TrackId) -> Result<String> {
        ApiClient::audio_source(self, id)
    }

    fn song_detail(&self, id: TrackId) -> Result<Song> {
        ApiClient::song_detail(self, id)
    }
}
