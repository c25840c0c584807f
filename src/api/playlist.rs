use anyhow::Result;
use serde::Deserialize;

use crate::api::ApiClient;
use crate::models::{Playlist, TrackId};

#[derive(Deserialize)]
struct PlaylistResponse {
    playlist: WirePlaylist,
}

#[derive(Deserialize)]
struct WirePlaylist {
    id: u64,
    name: String,
    creator: Option<WireCreator>,
    #[serde(rename = "trackIds", default)]
    track_ids: Vec<WireTrackId>,
}

#[derive(Deserialize)]
struct WireCreator {
    nickname: String,
}

#[derive(Deserialize)]
struct WireTrackId {
    id: TrackId,
}

impl ApiClient {
    /// 플레이리스트 정보와 전체 곡 ID 목록.
    pub fn playlist_detail(&self, id: u64) -> Result<Playlist> {
        let resp: PlaylistResponse = self.get("/playlist/detail", &[("id", id.to_string())])?;
        Ok(convert_playlist(resp.playlist))
    }
}

fn convert_playlist(p: WirePlaylist) -> Playlist {
    Playlist {
        id: p.id,
        name: p.name,
        creator: p.creator.map(|c| c.nickname),
        track_ids: p.track_ids.into_iter().map(|t| t.id).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::parse_response;

    #[test]
    fn test_playlist_payload() {
        let body = r#"{
            "code": 200,
            "playlist": {
                "id": 3778678,
                "name": "云音乐热歌榜",
                "creator": {"nickname": "网易云音乐"},
                "trackIds": [{"id": 1, "v": 3}, {"id": 2, "v": 9}]
            }
        }"#;
        let resp: PlaylistResponse = parse_response(body).unwrap();
        let playlist = convert_playlist(resp.playlist);
        assert_eq!(playlist.creator.as_deref(), Some("网易云音乐"));
        assert_eq!(playlist.track_ids, vec![1, 2]);
    }
}
