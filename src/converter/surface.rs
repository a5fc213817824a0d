//! The narrow interface the batch controller uses to talk to the user.

use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use crossbeam_channel::{bounded, Sender};

use super::controller::BatchState;

/// Everything the controller may show or ask.
pub trait PresentationSurface {
    fn set_overall_max(&mut self, max: usize);
    fn set_overall(&mut self, value: usize);
    fn set_file_max(&mut self, max: f64);
    fn set_file(&mut self, value: f64);
    fn set_status(&mut self, text: &str);
    fn show_error(&mut self, title: &str, message: &str);
    fn show_info(&mut self, title: &str, message: &str);
    /// Ask a yes/no question. Blocks until answered.
    fn confirm(&mut self, title: &str, message: &str) -> bool;
    /// Ask for the folder to convert. `None` if the user cancelled.
    fn pick_folder(&mut self) -> Option<PathBuf>;
    fn set_start_enabled(&mut self, enabled: bool);
}

/// Disables the start trigger while alive and re-enables it on drop.
///
/// Dropping also runs while unwinding, so the trigger comes back on every
/// exit path of a run.
pub struct StartTriggerGuard<'a, S: PresentationSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: PresentationSurface + ?Sized> StartTriggerGuard<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.set_start_enabled(false);
        Self { surface }
    }
}

impl<S: PresentationSurface + ?Sized> Deref for StartTriggerGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: PresentationSurface + ?Sized> DerefMut for StartTriggerGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: PresentationSurface + ?Sized> Drop for StartTriggerGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_start_enabled(true);
    }
}

/// Events from the worker thread to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    OverallMax(usize),
    Overall(usize),
    FileMax(f64),
    File(f64),
    Status(String),
    Error { title: String, message: String },
    Info { title: String, message: String },
    /// The worker waits on `reply` for the answer
    Confirm {
        title: String,
        message: String,
        reply: Sender<bool>,
    },
    /// The worker waits on `reply` for the chosen folder
    PickFolder { reply: Sender<Option<PathBuf>> },
    StartEnabled(bool),
    /// Run reached a terminal state
    Finished(BatchState),
}

/// Surface that forwards everything to the UI thread over a channel.
///
/// If the UI side has gone away, questions are answered with "no" and the
/// folder picker with "cancelled" so the worker can wind down.
pub struct ChannelSurface {
    events: Sender<UiEvent>,
}

impl ChannelSurface {
    pub fn new(events: Sender<UiEvent>) -> Self {
        Self { events }
    }

    fn send(&self, event: UiEvent) {
        if self.events.send(event).is_err() {
            log::debug!("UI event dropped, receiver closed");
        }
    }

    /// Report the terminal state of a run.
    pub fn finished(&self, state: BatchState) {
        self.send(UiEvent::Finished(state));
    }
}

impl PresentationSurface for ChannelSurface {
    fn set_overall_max(&mut self, max: usize) {
        self.send(UiEvent::OverallMax(max));
    }

    fn set_overall(&mut self, value: usize) {
        self.send(UiEvent::Overall(value));
    }

    fn set_file_max(&mut self, max: f64) {
        self.send(UiEvent::FileMax(max));
    }

    fn set_file(&mut self, value: f64) {
        self.send(UiEvent::File(value));
    }

    fn set_status(&mut self, text: &str) {
        self.send(UiEvent::Status(text.to_string()));
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.send(UiEvent::Error {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn show_info(&mut self, title: &str, message: &str) {
        self.send(UiEvent::Info {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        let (reply, answer) = bounded(1);
        self.send(UiEvent::Confirm {
            title: title.to_string(),
            message: message.to_string(),
            reply,
        });
        answer.recv().unwrap_or(false)
    }

    fn pick_folder(&mut self) -> Option<PathBuf> {
        let (reply, answer) = bounded(1);
        self.send(UiEvent::PickFolder { reply });
        answer.recv().ok().flatten()
    }

    fn set_start_enabled(&mut self, enabled: bool) {
        self.send(UiEvent::StartEnabled(enabled));
    }
}
