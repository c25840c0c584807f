use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::{ApiClient, ApiError};
use crate::models::{Availability, Song, TrackId};

#[derive(Deserialize)]
pub(crate) struct WireSong {
    id: TrackId,
    name: String,
    #[serde(default)]
    ar: Vec<WireArtistRef>,
    #[serde(default)]
    al: Option<WireAlbumRef>,
    #[serde(default)]
    dt: u64,
}

#[derive(Deserialize)]
struct WireArtistRef {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct WireAlbumRef {
    #[serde(default)]
    name: Option<String>,
}

impl WireSong {
    pub(crate) fn into_song(self) -> Song {
        Song {
            id: self.id,
            name: self.name,
            artists: self
                .ar
                .into_iter()
                .filter_map(|a| a.name)
                .filter(|n| !n.is_empty())
                .collect(),
            album: self.al.and_then(|al| al.name).unwrap_or_default(),
            duration_ms: self.dt,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct SongsResponse {
    pub(crate) songs: Vec<WireSong>,
    #[serde(default)]
    pub(crate) more: bool,
}

#[derive(Deserialize)]
struct SongUrlResponse {
    data: Vec<SongUrl>,
}

#[derive(Deserialize)]
struct SongUrl {
    id: TrackId,
    url: Option<String>,
}

#[derive(Deserialize)]
struct CheckResponse {
    success: bool,
    #[serde(default)]
    message: String,
}

impl ApiClient {
    /// 곡의 재생 가능 여부를 확인한다.
    /// 재생할 수 없는 곡은 서버가 4xx와 함께 `success: false` 본문을 보낸다.
    pub fn check_music(&self, id: TrackId) -> Result<Availability> {
        let (status, body) = self.get_raw("/check/music", &[("id", id.to_string())])?;
        match serde_json::from_str::<CheckResponse>(&body) {
            Ok(resp) => Ok(Availability {
                success: resp.success,
                message: resp.message,
            }),
            Err(e) if status.is_success() => {
                Err(e).context("/check/music 응답 파싱에 실패했습니다")
            }
            Err(_) => Err(ApiError::Status {
                status: status.as_u16(),
                path: "/check/music".to_string(),
            }
            .into()),
        }
    }

    /// 곡의 음원 URL을 가져온다.
    pub fn audio_source(&self, id: TrackId) -> Result<String> {
        let resp: SongUrlResponse = self.get("/song/url", &[("id", id.to_string())])?;
        pick_url(resp, id)
    }

    /// 곡의 상세 정보를 가져온다.
    pub fn song_detail(&self, id: TrackId) -> Result<Song> {
        let resp: SongsResponse = self.get("/song/detail", &[("ids", id.to_string())])?;
        resp.songs
            .into_iter()
            .find(|s| s.id == id)
            .map(WireSong::into_song)
            .ok_or_else(|| ApiError::Missing(format!("곡 정보를 찾을 수 없습니다: {}", id)).into())
    }
}

fn pick_url(resp: SongUrlResponse, id: TrackId) -> Result<String> {
    resp.data
        .into_iter()
        .find(|d| d.id == id)
        .and_then(|d| d.url)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::Missing(format!("음원 URL이 없습니다: {}", id)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::parse_response;

    #[test]
    fn test_song_detail_payload() {
        let body = r#"{
            "code": 200,
            "songs": [{
                "id": 186016,
                "name": "晴天",
                "ar": [{"id": 6452, "name": "周杰伦"}],
                "al": {"id": 18905, "name": "叶惠美", "picUrl": "http://p1.music.126.net/x.jpg"},
                "dt": 269000
            }]
        }"#;
        let resp: SongsResponse = parse_response(body).unwrap();
        let song = resp.songs.into_iter().next().unwrap().into_song();
        assert_eq!(song.id, 186016);
        assert_eq!(song.display_artist(), "周杰伦");
        assert_eq!(song.album, "叶惠美");
        assert_eq!(song.duration_ms, 269000);
    }

    #[test]
    fn test_song_without_album() {
        let body = r#"{"songs":[{"id":1,"name":"x","ar":[{"id":2,"name":null}]}]}"#;
        let resp: SongsResponse = parse_response(body).unwrap();
        let song = resp.songs.into_iter().next().unwrap().into_song();
        assert_eq!(song.album, "");
        assert_eq!(song.display_artist(), "알 수 없음");
    }

    #[test]
    fn test_pick_url() {
        let ok: SongUrlResponse =
            parse_response(r#"{"code":200,"data":[{"id":5,"url":"http://m/5.mp3"}]}"#).unwrap();
        assert_eq!(pick_url(ok, 5).unwrap(), "http://m/5.mp3");

        let none: SongUrlResponse =
            parse_response(r#"{"code":200,"data":[{"id":5,"url":null}]}"#).unwrap();
        let err = pick_url(none, 5).unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Missing(_))));
    }

    /// 로컬에서 NeteaseCloudMusicApi 서버가 떠 있어야 한다.
    /// 실행: cargo test check_music -- --ignored
    #[test]
    #[ignore]
    fn test_check_music_live() {
        let client = ApiClient::new(&Default::default()).expect("클라이언트 생성 실패");
        let result = client.check_music(186016).expect("check_music 실패");
        println!("{:?}", result);
        let url = client.audio_source(186016);
        println!("{:?}", url);
    }
}
