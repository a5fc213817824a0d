//! Background worker that runs a batch off the UI thread.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver};

use crate::config::ConverterConfig;

use super::controller::{BatchController, RunSummary};
use super::ffmpeg::{FFmpegWrapper, Transcoder};
use super::formats::EncodingOptions;
use super::scanner::{FileSystem, OsFileSystem};
use super::surface::{ChannelSurface, UiEvent};

/// Handle to a batch running on its own thread.
///
/// The UI thread drains [`UiEvent`]s each frame and answers the ones that
/// carry a reply channel.
pub struct BatchWorker {
    /// Event channel from worker
    event_rx: Receiver<UiEvent>,
    /// Worker thread handle
    handle: Option<JoinHandle<RunSummary>>,
}

impl BatchWorker {
    /// Start a batch with FFmpeg and the real file system.
    pub fn spawn(config: &ConverterConfig, options: EncodingOptions) -> io::Result<Self> {
        let transcoder = FFmpegWrapper::new(config.ffmpeg_path.clone(), config.ffprobe_path.clone());
        Self::spawn_with(BatchController::new(transcoder, OsFileSystem, config, options))
    }

    /// Start a batch on an already assembled controller.
    pub fn spawn_with<T, F>(mut controller: BatchController<T, F>) -> io::Result<Self>
    where
        T: Transcoder + Send + 'static,
        F: FileSystem + Send + 'static,
    {
        let (event_tx, event_rx) = unbounded::<UiEvent>();

        let handle = thread::Builder::new()
            .name("batch-converter".to_string())
            .spawn(move || {
                let mut surface = ChannelSurface::new(event_tx);
                let summary = controller.run(&mut surface);
                surface.finished(summary.state);
                summary
            })?;

        Ok(Self {
            event_rx,
            handle: Some(handle),
        })
    }

    /// Poll for worker events (non-blocking).
    pub fn poll_events(&self) -> Vec<UiEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Wait for the worker and take its summary.
    ///
    /// Returns `None` if the worker panicked or was already joined.
    pub fn join(&mut self) -> Option<RunSummary> {
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(summary) => Some(summary),
            Err(_) => {
                log::error!("Batch worker panicked");
                None
            }
        }
    }
}

impl Drop for BatchWorker {
    fn drop(&mut self) {
        if self.handle.is_some() && !self.is_finished() {
            // The run cannot be cancelled; let it finish detached.
            log::warn!("Batch worker still running while its handle is dropped");
        }
    }
}
