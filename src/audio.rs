//! Rodio-backed media output
//!
//! Audio work happens on a dedicated OS thread because rodio's types are not
//! `Send`-friendly across await points and decoding is blocking anyway. The
//! thread receives `OutputCommand`s over a std channel and reports back as
//! `OutputEvent`s on the engine's input channel.

use std::fs::File;
use std::io::BufReader;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tokio::sync::mpsc::UnboundedSender;

use crate::player::{EngineMessage, MediaOutput, OutputCommand, OutputEvent};

const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Handle to the audio thread.
pub struct RodioOutput {
    tx: mpsc::Sender<OutputCommand>,
}

impl RodioOutput {
    /// Starts the worker thread and opens the default audio device on it
    /// (the rodio stream is not Send, so it must be born where it lives).
    /// Fails when no output device is available (headless hosts).
    pub fn start(events: UnboundedSender<EngineMessage>) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        std::thread::Builder::new()
            .name("moodplay-audio".to_string())
            .spawn(move || {
                let stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => {
                        let _ = ready_tx.send(Ok(()));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                let mut worker = OutputWorker {
                    stream,
                    sink: None,
                    current: None,
                    volume: 1.0,
                    events,
                };
                worker.run(rx);
            })
            .context("failed to spawn the audio thread")?;

        ready_rx
            .recv()
            .context("audio thread exited before reporting readiness")?
            .map_err(|e| anyhow::anyhow!("failed to open the default audio output: {e}"))?;

        Ok(Self { tx })
    }
}

impl MediaOutput for RodioOutput {
    fn send(&self, command: OutputCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!("Audio thread gone, command dropped");
        }
    }
}

struct OutputWorker {
    stream: OutputStream,
    sink: Option<Sink>,
    /// Id and source of the loaded track, kept so a play request after the
    /// sink drained (end of track) can reload and start over.
    current: Option<(String, String)>,
    volume: f32,
    events: UnboundedSender<EngineMessage>,
}

impl OutputWorker {
    fn run(&mut self, rx: mpsc::Receiver<OutputCommand>) {
        tracing::info!("Audio thread started");
        loop {
            match rx.recv_timeout(TICK_INTERVAL) {
                Ok(command) => {
                    if self.handle_command(command) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => self.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::info!("Audio thread stopped");
    }

    /// Returns true when the thread should stop.
    fn handle_command(&mut self, command: OutputCommand) -> bool {
        match command {
            OutputCommand::Load { track_id, source } => self.load(track_id, source),
            OutputCommand::Play => self.play(),
            OutputCommand::Pause => {
                if let Some(sink) = &self.sink {
                    sink.pause();
                }
            }
            OutputCommand::Seek { secs } => {
                if let Some(sink) = &self.sink {
                    if let Err(e) = sink.try_seek(Duration::from_secs_f64(secs.max(0.0))) {
                        tracing::warn!(secs, error = %e, "Seek not supported for this source");
                    }
                }
            }
            OutputCommand::SetVolume { volume } => {
                self.volume = volume.clamp(0.0, 1.0);
                if let Some(sink) = &self.sink {
                    sink.set_volume(self.volume);
                }
            }
            OutputCommand::Shutdown => return true,
        }
        false
    }

    fn load(&mut self, track_id: String, source: String) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        match self.open_sink(&source, &track_id) {
            Ok(sink) => {
                self.sink = Some(sink);
                self.current = Some((track_id, source));
            }
            Err(e) => {
                tracing::warn!(track_id, source, error = %e, "Failed to load track");
                self.current = Some((track_id.clone(), source));
                self.emit(OutputEvent::PlayFailed {
                    track_id,
                    message: e.to_string(),
                });
            }
        }
    }

    fn open_sink(&self, source: &str, track_id: &str) -> Result<Sink> {
        let file = File::open(source).with_context(|| format!("cannot open {source}"))?;
        let decoder =
            Decoder::new(BufReader::new(file)).with_context(|| format!("cannot decode {source}"))?;
        let duration_secs = decoder
            .total_duration()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.pause();
        sink.append(decoder);

        self.emit(OutputEvent::Loaded {
            track_id: track_id.to_string(),
            duration_secs,
        });
        Ok(sink)
    }

    fn play(&mut self) {
        // Replaying a finished track: the sink drained and was dropped, so
        // rebuild it from the retained source.
        if self.sink.is_none() {
            let Some((track_id, source)) = self.current.clone() else {
                return;
            };
            match self.open_sink(&source, &track_id) {
                Ok(sink) => self.sink = Some(sink),
                Err(e) => {
                    tracing::warn!(track_id, error = %e, "Failed to reload track");
                    self.emit(OutputEvent::PlayFailed {
                        track_id,
                        message: e.to_string(),
                    });
                    return;
                }
            }
        }
        if let (Some(sink), Some((track_id, _))) = (&self.sink, &self.current) {
            sink.play();
            self.emit(OutputEvent::PlayStarted {
                track_id: track_id.clone(),
            });
        }
    }

    fn tick(&mut self) {
        let Some((track_id, _)) = &self.current else {
            return;
        };
        let Some(sink) = &self.sink else {
            return;
        };
        if sink.empty() {
            let ended = track_id.clone();
            self.sink = None;
            self.emit(OutputEvent::TrackEnded { track_id: ended });
        } else if !sink.is_paused() {
            self.emit(OutputEvent::Position {
                track_id: track_id.clone(),
                secs: sink.get_pos().as_secs_f64(),
            });
        }
    }

    fn emit(&self, event: OutputEvent) {
        if self.events.send(EngineMessage::Output(event)).is_err() {
            tracing::debug!("Engine gone, dropping audio event");
        }
    }
}

/// Fallback output for hosts without an audio device. Every load is answered
/// with a failure so the interface stays usable and honest about playback.
pub struct NullOutput {
    events: UnboundedSender<EngineMessage>,
}

impl NullOutput {
    pub fn new(events: UnboundedSender<EngineMessage>) -> Self {
        Self { events }
    }
}

impl MediaOutput for NullOutput {
    fn send(&self, command: OutputCommand) {
        if let OutputCommand::Load { track_id, .. } = command {
            let failed = OutputEvent::PlayFailed {
                track_id,
                message: "no audio output device available".to_string(),
            };
            if self.events.send(EngineMessage::Output(failed)).is_err() {
                tracing::debug!("Engine gone, dropping audio event");
            }
        }
    }
}
