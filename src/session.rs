use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use comfy_table::{Cell, Table};

use crate::api::Catalog;
use crate::models::{format_seconds, TrackId};
use crate::notify::{Notifier, NotifyKind};
use crate::player::{MediaElement, Phase, PlayerStore};

const IDLE_WAIT: Duration = Duration::from_secs(1);
// 하루
const MAX_POSITION_SECS: f64 = 86_400.0;

/// 대화형 재생 세션에서 받는 명령.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Toggle,
    Next,
    Prev,
    Loop,
    Mute,
    Volume(i32),
    Seek(f64),
    Replay,
    Queue,
    Add(TrackId),
    Remove(TrackId),
    Clear,
    Status,
    Page,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(Command::Status);
    };
    let arg = parts.next();

    let cmd = match head {
        "p" | "pause" | "play" => Command::Toggle,
        "n" | "next" => Command::Next,
        "b" | "prev" => Command::Prev,
        "l" | "loop" => Command::Loop,
        "m" | "mute" => Command::Mute,
        "v" | "vol" => Command::Volume(
            arg.context("음량 값이 필요합니다 (예: v 40)")?
                .parse()
                .context("음량은 정수여야 합니다")?,
        ),
        "s" | "seek" => Command::Seek(parse_position(arg.context("위치가 필요합니다 (예: s 1:30)")?)?),
        "r" | "replay" => Command::Replay,
        "q" | "queue" => Command::Queue,
        "a" | "add" => Command::Add(
            arg.context("곡 ID가 필요합니다")?
                .parse()
                .context("곡 ID는 숫자여야 합니다")?,
        ),
        "d" | "del" => Command::Remove(
            arg.context("곡 ID가 필요합니다")?
                .parse()
                .context("곡 ID는 숫자여야 합니다")?,
        ),
        "c" | "clear" => Command::Clear,
        "st" | "status" => Command::Status,
        "i" | "page" => Command::Page,
        "h" | "help" | "?" => Command::Help,
        "x" | "exit" | "quit" => Command::Quit,
        other => bail!("알 수 없는 명령입니다: {}", other),
    };
    Ok(cmd)
}

/// "90", "90.5", "1:30" 형식의 위치를 초로 바꾼다.
fn parse_position(text: &str) -> Result<f64> {
    let position = match text.split_once(':') {
        Some((min, sec)) => {
            let min: u64 = min.parse().context("분은 정수여야 합니다")?;
            let sec: f64 = sec.parse().context("초는 숫자여야 합니다")?;
            min as f64 * 60.0 + sec
        }
        None => text.parse().context("위치는 초 단위 숫자여야 합니다")?,
    };
    if !position.is_finite() || position < 0.0 || position > MAX_POSITION_SECS {
        bail!("위치가 범위를 벗어났습니다: {}", text);
    }
    Ok(position)
}

const HELP: &str = "\
  p        재생/일시정지      n / b    다음 곡 / 이전 곡
  l        반복 모드 전환      m        음소거 전환
  v N      음량 (0-100)       s POS    이동 (초 또는 m:ss)
  r        처음부터           q        재생 목록
  a ID     곡 추가            d ID     곡 제거
  c        목록 비우기        i        재생 화면 켜기/끄기
  Enter    현재 상태          x        종료";

/// 표준 입력으로 명령을 받으며 재생 스토어를 구동한다.
///
/// 입력은 별도 스레드에서 읽어 채널로 넘기고, 스토어는 이 스레드에서만 다룬다.
/// 입력이 없을 때는 다음 폴링 시각까지 기다린다.
pub fn run<C, M, N>(store: &mut PlayerStore<C, M, N>) -> Result<()>
where
    C: Catalog,
    M: MediaElement,
    N: Notifier,
{
    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("명령을 입력하세요 (h: 도움말)");
    let mut announced = None;
    let mut shown_second = None;
    announce(store, &mut announced);

    loop {
        let timeout = store
            .next_deadline()
            .map(|d| d.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_WAIT);

        match rx.recv_timeout(timeout) {
            Ok(line) => match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(cmd) => {
                    let result = apply(store, cmd);
                    report(store, result);
                }
                Err(e) => store.notifier().notify(&format!("{:#}", e), NotifyKind::Info),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if store.tick(Instant::now()) {
            tracing::debug!("track ended");
            let result = store.play_end();
            report(store, result);
        }
        announce(store, &mut announced);
        if store.state().show_player_page {
            let second = store.state().current_time as u64;
            if shown_second != Some(second) {
                shown_second = Some(second);
                println!("{}", status_line(store));
            }
        }
    }

    store.set_pause();
    Ok(())
}

fn apply<C, M, N>(store: &mut PlayerStore<C, M, N>, cmd: Command) -> Result<()>
where
    C: Catalog,
    M: MediaElement,
    N: Notifier,
{
    match cmd {
        Command::Toggle => store.toggle_play()?,
        Command::Next => store.next()?,
        Command::Prev => store.prev()?,
        Command::Loop => {
            store.toggle_loop();
            println!("반복 모드: {}", store.state().loop_mode);
        }
        Command::Mute => {
            store.toggle_muted();
            println!("음소거: {}", if store.state().muted { "켜짐" } else { "꺼짐" });
        }
        Command::Volume(n) => {
            store.set_volume(n);
            println!("음량: {}", store.state().volume);
        }
        Command::Seek(position) => {
            store.on_slider_input();
            store.on_slider_change(position);
        }
        Command::Replay => store.replay()?,
        Command::Queue => print_queue(store),
        Command::Add(id) => {
            store.push_play_list(&[id]);
            store
                .notifier()
                .notify(&format!("{}번 곡을 목록에 추가했습니다", id), NotifyKind::Success);
        }
        Command::Remove(id) => store.remove_song(id),
        Command::Clear => store.clear_play_list(),
        Command::Status => println!("{}", status_line(store)),
        Command::Page => {
            if store.state().show_player_page {
                store.close_player_page();
            } else {
                store.open_player_page();
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}

fn report<C, M, N>(store: &PlayerStore<C, M, N>, result: Result<()>)
where
    C: Catalog,
    M: MediaElement,
    N: Notifier,
{
    if let Err(e) = result {
        tracing::warn!("{:#}", e);
        store.notifier().notify(&format!("{:#}", e), NotifyKind::Error);
    }
}

/// 곡이 바뀌었으면 한 번 출력한다.
fn announce<C, M, N>(store: &PlayerStore<C, M, N>, announced: &mut Option<TrackId>)
where
    C: Catalog,
    M: MediaElement,
    N: Notifier,
{
    let current = store.state().id;
    if current != *announced {
        *announced = current;
        if let Some(song) = &store.state().song {
            println!("▶ {}", song.summary());
        }
    }
}

fn status_line<C, M, N>(store: &PlayerStore<C, M, N>) -> String
where
    C: Catalog,
    M: MediaElement,
    N: Notifier,
{
    let s = store.state();
    let phase = match store.phase() {
        Phase::Idle => "대기",
        Phase::Loading => "불러오는 중",
        Phase::Playing => "재생 중",
        Phase::Paused => "일시정지",
        Phase::Ended => "끝남",
    };
    let title = s
        .song
        .as_ref()
        .map(|song| song.summary())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "[{}] {} {}/{} | 음량 {}{} | {} | 목록 {}곡{}",
        phase,
        title,
        format_seconds(s.current_time as u64),
        format_seconds(s.duration),
        s.volume,
        if s.muted { " (음소거)" } else { "" },
        s.loop_mode,
        store.play_list_count(),
        if s.error_count > 0 {
            format!(" (건너뜀 {})", s.error_count)
        } else {
            String::new()
        },
    )
}

fn print_queue<C, M, N>(store: &PlayerStore<C, M, N>)
where
    C: Catalog,
    M: MediaElement,
    N: Notifier,
{
    if store.queue().is_empty() {
        println!("재생 목록이 비어 있습니다.");
        return;
    }

    let current = store.this_index();
    let mut table = Table::new();
    table.set_header(vec!["", "#", "곡 ID"]);
    for (i, id) in store.queue().as_slice().iter().enumerate() {
        let marker = if Some(i) == current { "▶" } else { "" };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(i + 1),
            Cell::new(id),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("p").unwrap(), Command::Toggle);
        assert_eq!(parse_command("  next ").unwrap(), Command::Next);
        assert_eq!(parse_command("").unwrap(), Command::Status);
        assert_eq!(parse_command("x").unwrap(), Command::Quit);
        assert_eq!(parse_command("i").unwrap(), Command::Page);
    }

    #[test]
    fn test_commands_with_args() {
        assert_eq!(parse_command("v 150").unwrap(), Command::Volume(150));
        assert_eq!(parse_command("v -5").unwrap(), Command::Volume(-5));
        assert_eq!(parse_command("a 186016").unwrap(), Command::Add(186016));
        assert_eq!(parse_command("d 3").unwrap(), Command::Remove(3));
    }

    #[test]
    fn test_seek_positions() {
        assert_eq!(parse_command("s 90").unwrap(), Command::Seek(90.0));
        assert_eq!(parse_command("s 1:30").unwrap(), Command::Seek(90.0));
        assert_eq!(parse_command("seek 2:05.5").unwrap(), Command::Seek(125.5));
    }

    #[test]
    fn test_bad_input() {
        assert!(parse_command("v").is_err());
        assert!(parse_command("v loud").is_err());
        assert!(parse_command("a x").is_err());
        assert!(parse_command("s 1:xx").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_seek_out_of_range() {
        assert!(parse_command("s inf").is_err());
        assert!(parse_command("s NaN").is_err());
        assert!(parse_command("s 1e300").is_err());
        assert!(parse_command("s -3").is_err());
        assert!(parse_command("s 1:inf").is_err());
    }
}
