use chrono::{DateTime, Datelike};

/// 카탈로그의 트랙 식별자.
pub type TrackId = u64;

/// 재생 중인 곡의 기본 정보.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Song {
    pub id: TrackId,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub duration_ms: u64,
}

impl Song {
    pub fn display_artist(&self) -> String {
        if self.artists.is_empty() {
            return "알 수 없음".to_string();
        }
        self.artists.join(", ")
    }

    pub fn summary(&self) -> String {
        format!(
            "{} - {} [{}]",
            self.display_artist(),
            self.name,
            self.album
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Artist {
    pub id: u64,
    pub name: String,
    pub brief_desc: Option<String>,
    pub album_size: u32,
    pub music_size: u32,
    pub mv_size: u32,
    pub pic_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Album {
    pub id: u64,
    pub name: String,
    /// 발매 시각 (epoch millis)
    pub publish_time: Option<i64>,
    pub size: u32,
}

impl Album {
    /// 발매 연도 (UTC).
    pub fn year(&self) -> Option<i32> {
        DateTime::from_timestamp_millis(self.publish_time?).map(|d| d.year())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mv {
    pub id: u64,
    pub name: String,
    pub duration_ms: u64,
    pub play_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    pub id: u64,
    pub name: String,
    pub creator: Option<String>,
    pub track_ids: Vec<TrackId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    pub user_id: u64,
    pub nickname: String,
    pub avatar_url: Option<String>,
}

/// 곡 재생 가능 여부 (`/check/music` 응답).
#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub success: bool,
    pub message: String,
}

/// 밀리초를 `m:ss` 형식으로 변환한다.
pub fn format_duration_ms(ms: u64) -> String {
    format_seconds(ms / 1000)
}

pub fn format_seconds(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(0), "0:00");
        assert_eq!(format_duration_ms(215_000), "3:35");
        assert_eq!(format_seconds(3_601), "60:01");
    }

    #[test]
    fn test_album_year() {
        let album = Album {
            // 2007-05-07T00:00:00Z
            publish_time: Some(1_178_496_000_000),
            ..Default::default()
        };
        assert_eq!(album.year(), Some(2007));

        let jan_first = Album {
            // 2020-01-01T00:00:00Z
            publish_time: Some(1_577_836_800_000),
            ..Default::default()
        };
        assert_eq!(jan_first.year(), Some(2020));

        let last_moment_1999 = Album {
            // 1999-12-31T23:59:59.999Z
            publish_time: Some(946_684_799_999),
            ..Default::default()
        };
        assert_eq!(last_moment_1999.year(), Some(1999));

        let before_epoch = Album {
            // 1969-07-20T00:00:00Z
            publish_time: Some(-14_256_000_000),
            ..Default::default()
        };
        assert_eq!(before_epoch.year(), Some(1969));
        assert_eq!(Album::default().year(), None);
    }

    #[test]
    fn test_song_summary() {
        let song = Song {
            id: 1,
            name: "晴天".to_string(),
            artists: vec!["周杰伦".to_string()],
            album: "叶惠美".to_string(),
            duration_ms: 269_000,
        };
        assert_eq!(song.summary(), "周杰伦 - 晴天 [叶惠美]");
        assert_eq!(Song::default().display_artist(), "알 수 없음");
    }
}
