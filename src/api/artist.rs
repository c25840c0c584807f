use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::music::{SongsResponse, WireSong};
use crate::api::{ApiClient, Listing, Page};
use crate::models::{Album, Artist, Mv, Song};
use crate::notify::Notifier;
use crate::player::{MediaElement, PlayerStore};

/// 추천 가수 목록의 지역 구분 (`/toplist/artist?type=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ArtistArea {
    #[default]
    Chinese,
    Western,
    Korean,
    Japanese,
}

impl ArtistArea {
    pub fn code(self) -> u8 {
        match self {
            ArtistArea::Chinese => 1,
            ArtistArea::Western => 2,
            ArtistArea::Korean => 3,
            ArtistArea::Japanese => 4,
        }
    }
}

#[derive(Deserialize)]
struct WireArtist {
    id: u64,
    name: String,
    #[serde(rename = "briefDesc")]
    brief_desc: Option<String>,
    #[serde(rename = "albumSize", default)]
    album_size: u32,
    #[serde(rename = "musicSize", default)]
    music_size: u32,
    #[serde(rename = "mvSize", default)]
    mv_size: u32,
    #[serde(rename = "picUrl", alias = "cover")]
    pic_url: Option<String>,
}

impl From<WireArtist> for Artist {
    fn from(a: WireArtist) -> Self {
        Artist {
            id: a.id,
            name: a.name,
            brief_desc: a.brief_desc.filter(|d| !d.is_empty()),
            album_size: a.album_size,
            music_size: a.music_size,
            mv_size: a.mv_size,
            pic_url: a.pic_url,
        }
    }
}

#[derive(Deserialize)]
struct TopArtistsResponse {
    list: TopArtistList,
}

#[derive(Deserialize)]
struct TopArtistList {
    artists: Vec<WireArtist>,
}

#[derive(Deserialize)]
struct ArtistDetailResponse {
    data: ArtistDetailData,
}

#[derive(Deserialize)]
struct ArtistDetailData {
    artist: WireArtist,
}

#[derive(Deserialize)]
struct AlbumsResponse {
    #[serde(rename = "hotAlbums")]
    hot_albums: Vec<WireAlbum>,
    #[serde(default)]
    more: bool,
}

#[derive(Deserialize)]
struct WireAlbum {
    id: u64,
    name: String,
    #[serde(rename = "publishTime")]
    publish_time: Option<i64>,
    #[serde(default)]
    size: u32,
}

#[derive(Deserialize)]
struct MvsResponse {
    mvs: Vec<WireMv>,
    #[serde(rename = "hasMore", default)]
    has_more: bool,
}

#[derive(Deserialize)]
struct WireMv {
    id: u64,
    name: String,
    #[serde(default)]
    duration: u64,
    #[serde(rename = "playCount", default)]
    play_count: u64,
}

impl ApiClient {
    /// 지역별 추천 가수 목록.
    pub fn top_artists(&self, area: ArtistArea) -> Result<Vec<Artist>> {
        let resp: TopArtistsResponse =
            self.get("/toplist/artist", &[("type", area.code().to_string())])?;
        Ok(resp.list.artists.into_iter().map(Artist::from).collect())
    }

    pub fn artist_detail(&self, id: u64) -> Result<Artist> {
        let resp: ArtistDetailResponse = self.get("/artist/detail", &[("id", id.to_string())])?;
        Ok(resp.data.artist.into())
    }

    pub fn artist_songs(&self, id: u64, page: Page) -> Result<Listing<Song>> {
        let resp: SongsResponse = self.get("/artist/songs", &page.params(id))?;
        Ok(Listing {
            items: resp.songs.into_iter().map(WireSong::into_song).collect(),
            more: resp.more,
        })
    }

    pub fn artist_albums(&self, id: u64, page: Page) -> Result<Listing<Album>> {
        let resp: AlbumsResponse = self.get("/artist/album", &page.params(id))?;
        Ok(Listing {
            items: resp.hot_albums.into_iter().map(convert_album).collect(),
            more: resp.more,
        })
    }

    pub fn artist_mvs(&self, id: u64, page: Page) -> Result<Listing<Mv>> {
        let resp: MvsResponse = self.get("/artist/mv", &page.params(id))?;
        Ok(Listing {
            items: resp
                .mvs
                .into_iter()
                .map(|m| Mv {
                    id: m.id,
                    name: m.name,
                    duration_ms: m.duration,
                    play_count: m.play_count,
                })
                .collect(),
            more: resp.has_more,
        })
    }
}

fn convert_album(a: WireAlbum) -> Album {
    Album {
        id: a.id,
        name: a.name,
        publish_time: a.publish_time,
        size: a.size,
    }
}

/// 가수의 곡을 최대 1000개 가져와 재생 목록을 교체하고 첫 곡부터 재생한다.
pub fn play_all_by_artist<M, N>(store: &mut PlayerStore<ApiClient, M, N>, id: u64) -> Result<()>
where
    M: MediaElement,
    N: Notifier,
{
    let songs = store
        .catalog()
        .artist_songs(id, Page::new(1000, 0))
        .with_context(|| format!("가수 {}의 곡 목록을 가져오지 못했습니다", id))?;
    let ids: Vec<_> = songs.items.iter().map(|s| s.id).collect();
    tracing::info!(artist = id, count = ids.len(), "play all by artist");
    store.play_multi(&ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::parse_response;
    use crate::config::{ApiConfig, PlayerConfig};
    use crate::notify::ConsoleNotifier;
    use crate::player::HeadlessMedia;

    #[test]
    fn test_area_codes() {
        assert_eq!(ArtistArea::Chinese.code(), 1);
        assert_eq!(ArtistArea::Japanese.code(), 4);
    }

    #[test]
    fn test_top_artists_payload() {
        let body = r#"{
            "code": 200,
            "list": {
                "artists": [
                    {"id": 6452, "name": "周杰伦", "picUrl": "http://p/1.jpg",
                     "albumSize": 41, "musicSize": 500, "mvSize": 200, "briefDesc": ""}
                ],
                "updateTime": 1700000000000
            }
        }"#;
        let resp: TopArtistsResponse = parse_response(body).unwrap();
        let artist: Artist = resp.list.artists.into_iter().next().unwrap().into();
        assert_eq!(artist.name, "周杰伦");
        assert_eq!(artist.album_size, 41);
        assert!(artist.brief_desc.is_none());
    }

    #[test]
    fn test_artist_detail_payload_uses_cover() {
        let body = r#"{
            "code": 200,
            "data": {"artist": {"id": 6452, "name": "周杰伦", "cover": "http://p/c.jpg",
                                "briefDesc": "华语男歌手", "albumSize": 41}}
        }"#;
        let resp: ArtistDetailResponse = parse_response(body).unwrap();
        let artist: Artist = resp.data.artist.into();
        assert_eq!(artist.pic_url.as_deref(), Some("http://p/c.jpg"));
        assert_eq!(artist.brief_desc.as_deref(), Some("华语男歌手"));
        assert_eq!(artist.mv_size, 0);
    }

    #[test]
    fn test_albums_and_mvs_payload() {
        let albums: AlbumsResponse = parse_response(
            r#"{"code":200,"more":true,"hotAlbums":[{"id":1,"name":"叶惠美","publishTime":1059580800000,"size":11}]}"#,
        )
        .unwrap();
        assert!(albums.more);
        let album = convert_album(albums.hot_albums.into_iter().next().unwrap());
        assert_eq!(album.year(), Some(2003));

        let mvs: MvsResponse = parse_response(
            r#"{"code":200,"hasMore":false,"mvs":[{"id":9,"name":"晴天","duration":270000,"playCount":12}]}"#,
        )
        .unwrap();
        assert!(!mvs.has_more);
        assert_eq!(mvs.mvs[0].play_count, 12);
    }

    #[test]
    fn test_play_all_by_artist_unreachable_keeps_queue() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            cookie: None,
            timeout_secs: 1,
        };
        let client = ApiClient::new(&config).unwrap();
        let mut store = PlayerStore::new(
            client,
            HeadlessMedia::new(),
            ConsoleNotifier,
            &PlayerConfig::default(),
        );
        store.push_play_list(&[7]);

        let err = play_all_by_artist(&mut store, 6452).unwrap_err();
        assert!(format!("{:#}", err).contains("6452"));
        assert_eq!(store.queue().as_slice(), &[7]);
        assert!(!store.state().loading);
    }

    #[test]
    fn test_page_params() {
        let params = Page::new(1000, 0).params(6452);
        assert_eq!(
            params,
            vec![
                ("id", "6452".to_string()),
                ("limit", "1000".to_string()),
                ("offset", "0".to_string()),
            ]
        );
    }
}
