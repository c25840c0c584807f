use std::io::Cursor;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::player::MediaElement;

/// rodio로 실제 소리를 내는 미디어 요소.
/// 음원은 통째로 내려받은 뒤 메모리에서 디코딩한다.
pub struct RodioMedia {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    http: reqwest::blocking::Client,
    sink: Option<Sink>,
    duration: Option<f64>,
    volume: f64,
    muted: bool,
    started: bool,
}

impl RodioMedia {
    pub fn new() -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| anyhow!("오디오 출력 장치를 열 수 없습니다: {}", e))?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            http: reqwest::blocking::Client::new(),
            sink: None,
            duration: None,
            volume: 1.0,
            muted: false,
            started: false,
        })
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume as f32
        }
    }
}

impl MediaElement for RodioMedia {
    fn set_source(&mut self, url: &str, duration_hint: Option<f64>) -> Result<()> {
        self.load();

        let bytes = self
            .http
            .get(url)
            .send()
            .context("음원 다운로드에 실패했습니다")?
            .error_for_status()
            .context("음원 요청이 실패했습니다")?
            .bytes()
            .context("음원 응답 읽기에 실패했습니다")?;

        let source = Decoder::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| anyhow!("음원을 디코딩할 수 없습니다: {}", e))?;
        self.duration = source
            .total_duration()
            .map(|d| d.as_secs_f64())
            .or(duration_hint);

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| anyhow!("오디오 싱크를 만들 수 없습니다: {}", e))?;
        sink.pause();
        sink.set_volume(self.effective_volume());
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let sink = self.sink.as_ref().context("재생할 음원이 없습니다")?;
        sink.play();
        self.started = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn load(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.duration = None;
        self.started = false;
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
        let effective = self.effective_volume();
        if let Some(sink) = &self.sink {
            sink.set_volume(effective);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        let effective = self.effective_volume();
        if let Some(sink) = &self.sink {
            sink.set_volume(effective);
        }
    }

    fn seek(&mut self, position: f64) {
        let Some(sink) = &self.sink else {
            return;
        };
        let target = match Duration::try_from_secs_f64(position.max(0.0)) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(position, "잘못된 탐색 위치: {}", e);
                return;
            }
        };
        if let Err(e) = sink.try_seek(target) {
            tracing::warn!("탐색에 실패했습니다: {}", e);
        }
    }

    fn current_time(&self) -> f64 {
        self.sink
            .as_ref()
            .map(|s| s.get_pos().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn ended(&self) -> bool {
        self.started && self.sink.as_ref().is_some_and(|s| s.empty())
    }
}
