use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Cell, Table};
use dialoguer::{Input, Select};

use crate::api::artist::{self, ArtistArea};
use crate::api::{ApiClient, Page};
use crate::config::{self, Config};
use crate::models::{format_duration_ms, Artist, Song, TrackId};
use crate::notify::ConsoleNotifier;
use crate::player::{LoopMode, PlayerStore, UserInfoStore};
use crate::routes::Route;
use crate::session;

#[cfg(feature = "audio")]
type Media = crate::player::RodioMedia;
#[cfg(not(feature = "audio"))]
type Media = crate::player::HeadlessMedia;

type Store = PlayerStore<ApiClient, Media, ConsoleNotifier>;

#[derive(Parser)]
#[command(name = "cloudtune", about = "음악 카탈로그 API 기반 터미널 플레이어")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 지역별 추천 가수 목록
    Artists {
        #[arg(long, value_enum, default_value_t = ArtistArea::Chinese)]
        area: ArtistArea,
    },
    /// 가수 정보와 곡/앨범/MV 목록
    Artist {
        id: u64,
        #[arg(long, value_enum, default_value_t = ArtistTab::Songs)]
        tab: ArtistTab,
        #[arg(long, default_value_t = 50)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// 경로에 해당하는 화면 열기 (/, /login, /me, /artist/:id, /playlist/:id)
    Open { path: String },
    /// 곡 ID 목록을 재생
    Play {
        #[arg(required = true)]
        ids: Vec<TrackId>,
    },
    /// 가수의 모든 곡 재생
    PlayArtist { id: u64 },
    /// 플레이리스트 재생
    PlayPlaylist { id: u64 },
    /// API 서버와 재생 설정
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArtistTab {
    Songs,
    Albums,
    Mvs,
}

pub fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_config();

    match cli.command {
        Some(Commands::Artists { area }) => cmd_artists(&cfg, area),
        Some(Commands::Artist {
            id,
            tab,
            limit,
            offset,
        }) => cmd_artist(&cfg, id, tab, Page::new(limit, offset)),
        Some(Commands::Open { path }) => cmd_open(&cfg, &path),
        Some(Commands::Play { ids }) => {
            let mut store = build_store(&cfg)?;
            store.play_multi(&ids)?;
            session::run(&mut store)
        }
        Some(Commands::PlayArtist { id }) => {
            let mut store = build_store(&cfg)?;
            artist::play_all_by_artist(&mut store, id)?;
            session::run(&mut store)
        }
        Some(Commands::PlayPlaylist { id }) => {
            let mut store = build_store(&cfg)?;
            let playlist = store
                .catalog()
                .playlist_detail(id)
                .with_context(|| format!("플레이리스트 {}를 가져오지 못했습니다", id))?;
            println!("플레이리스트: {} ({}곡)", playlist.name, playlist.track_ids.len());
            store.play_multi(&playlist.track_ids)?;
            session::run(&mut store)
        }
        Some(Commands::Config) => cmd_config(),
        None => {
            println!("사용법: cloudtune <명령어>");
            println!("자세한 정보는 cloudtune --help를 실행하세요.");
            Ok(())
        }
    }
}

fn build_store(cfg: &Config) -> Result<Store> {
    let client = ApiClient::new(&cfg.api)?;
    let media = new_media()?;
    let mut store = PlayerStore::new(client, media, ConsoleNotifier, &cfg.player);
    store.init();
    Ok(store)
}

#[cfg(feature = "audio")]
fn new_media() -> Result<Media> {
    crate::player::RodioMedia::new()
}

#[cfg(not(feature = "audio"))]
fn new_media() -> Result<Media> {
    tracing::info!("audio feature disabled, using headless media clock");
    Ok(crate::player::HeadlessMedia::new())
}

fn cmd_artists(cfg: &Config, area: ArtistArea) -> Result<()> {
    let client = ApiClient::new(&cfg.api)?;
    let artists = client
        .top_artists(area)
        .context("추천 가수 목록을 가져오지 못했습니다")?;
    print_artists(&artists);
    Ok(())
}

fn cmd_artist(cfg: &Config, id: u64, tab: ArtistTab, page: Page) -> Result<()> {
    let client = ApiClient::new(&cfg.api)?;
    let artist = client
        .artist_detail(id)
        .with_context(|| format!("가수 {} 정보를 가져오지 못했습니다", id))?;

    println!("{} (ID {})", artist.name, artist.id);
    println!(
        "곡 {} | 앨범 {} | MV {}",
        artist.music_size, artist.album_size, artist.mv_size
    );
    if let Some(ref pic) = artist.pic_url {
        println!("{}", pic);
    }
    if let Some(ref desc) = artist.brief_desc {
        println!("\n{}\n", desc);
    }

    match tab {
        ArtistTab::Songs => {
            let songs = client.artist_songs(id, page)?;
            print_songs(&songs.items);
            print_more(songs.more);
        }
        ArtistTab::Albums => {
            let albums = client.artist_albums(id, page)?;
            let mut table = Table::new();
            table.set_header(vec!["ID", "앨범", "연도", "곡 수"]);
            for album in &albums.items {
                table.add_row(vec![
                    Cell::new(album.id),
                    Cell::new(&album.name),
                    Cell::new(
                        album
                            .year()
                            .map(|y| y.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    Cell::new(album.size),
                ]);
            }
            println!("{table}");
            print_more(albums.more);
        }
        ArtistTab::Mvs => {
            let mvs = client.artist_mvs(id, page)?;
            let mut table = Table::new();
            table.set_header(vec!["ID", "MV", "길이", "재생 수"]);
            for mv in &mvs.items {
                table.add_row(vec![
                    Cell::new(mv.id),
                    Cell::new(&mv.name),
                    Cell::new(format_duration_ms(mv.duration_ms)),
                    Cell::new(mv.play_count),
                ]);
            }
            println!("{table}");
            print_more(mvs.more);
        }
    }
    Ok(())
}

fn cmd_open(cfg: &Config, path: &str) -> Result<()> {
    let route = Route::resolve(path)
        .with_context(|| format!("해당 경로의 화면이 없습니다: {}", path))?;
    tracing::debug!(%route, "open");

    match route {
        Route::Home => {
            println!("추천 가수\n");
            cmd_artists(cfg, ArtistArea::default())
        }
        Route::Artist(id) => cmd_artist(cfg, id, ArtistTab::Songs, Page::default()),
        Route::Playlist(id) => {
            let client = ApiClient::new(&cfg.api)?;
            let playlist = client.playlist_detail(id)?;
            println!(
                "{} - {} ({}곡)",
                playlist.name,
                playlist.creator.as_deref().unwrap_or("알 수 없음"),
                playlist.track_ids.len()
            );
            let mut table = Table::new();
            table.set_header(vec!["#", "곡 ID"]);
            for (i, id) in playlist.track_ids.iter().enumerate() {
                table.add_row(vec![Cell::new(i + 1), Cell::new(id)]);
            }
            println!("{table}");
            println!("\n재생: cloudtune play-playlist {}", playlist.id);
            Ok(())
        }
        Route::Me => {
            if !cfg.api.has_cookie() {
                println!("로그인하지 않았습니다. 'cloudtune config'에서 쿠키를 설정하세요.");
                return Ok(());
            }
            let client = ApiClient::new(&cfg.api)?;
            let mut users = UserInfoStore::new();
            if let Some(profile) = client.account().context("계정 정보를 가져오지 못했습니다")? {
                users.set_user_info(profile);
            }
            match users.user_info() {
                Some(user) => {
                    println!("{} (ID {})", user.nickname, user.user_id);
                    if let Some(ref avatar) = user.avatar_url {
                        println!("{}", avatar);
                    }
                }
                None => println!("쿠키가 만료되었습니다. 다시 설정하세요."),
            }
            Ok(())
        }
        Route::Login => {
            println!("로그인은 API 서버에서 발급한 쿠키로 대신합니다.");
            println!("'cloudtune config'를 실행해 쿠키를 입력하세요.");
            Ok(())
        }
    }
}

fn print_artists(artists: &[Artist]) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "가수", "곡", "앨범", "MV"]);
    for artist in artists {
        table.add_row(vec![
            Cell::new(artist.id),
            Cell::new(&artist.name),
            Cell::new(artist.music_size),
            Cell::new(artist.album_size),
            Cell::new(artist.mv_size),
        ]);
    }
    println!("{table}");
}

fn print_songs(songs: &[Song]) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "제목", "아티스트", "앨범", "길이"]);
    for song in songs {
        table.add_row(vec![
            Cell::new(song.id),
            Cell::new(&song.name),
            Cell::new(song.display_artist()),
            Cell::new(&song.album),
            Cell::new(format_duration_ms(song.duration_ms)),
        ]);
    }
    println!("{table}");
}

fn print_more(more: bool) {
    if more {
        println!("(더 있음: --offset으로 다음 페이지를 보세요)");
    }
}

fn cmd_config() -> Result<()> {
    let mut cfg = config::load_config();

    println!("API 서버 설정");
    println!("(NeteaseCloudMusicApi 호환 서버 주소를 입력하세요)\n");

    let base_url: String = Input::new()
        .with_prompt("서버 주소")
        .with_initial_text(cfg.api.base_url.clone())
        .interact_text()?;

    let cookie: String = Input::new()
        .with_prompt("쿠키 (비워두면 로그인 안 함)")
        .with_initial_text(cfg.api.cookie.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let volume: u8 = Input::new()
        .with_prompt("기본 음량 (0-100)")
        .with_initial_text(cfg.player.volume.to_string())
        .validate_with(|v: &u8| {
            if *v <= 100 {
                Ok(())
            } else {
                Err("0에서 100 사이여야 합니다")
            }
        })
        .interact_text()?;

    let modes = [LoopMode::Single, LoopMode::Queue, LoopMode::Shuffle];
    let labels: Vec<String> = modes.iter().map(|m| m.to_string()).collect();
    let current = modes
        .iter()
        .position(|m| *m == cfg.player.loop_mode)
        .unwrap_or(1);
    let selection = Select::new()
        .with_prompt("반복 모드")
        .items(&labels)
        .default(current)
        .interact()?;

    cfg.api.base_url = base_url.trim().to_string();
    cfg.api.cookie = Some(cookie.trim().to_string()).filter(|c| !c.is_empty());
    cfg.player.volume = volume;
    cfg.player.loop_mode = modes[selection];

    config::save_config(&cfg)?;
    println!("\n설정이 저장되었습니다!");
    Ok(())
}
