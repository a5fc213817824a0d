//! Main application window
//!
//! Encoding settings, the two progress bars, a status line and the start
//! button. All conversion work happens on a [`BatchWorker`]; this window only
//! renders the events it sends and answers its questions with native dialogs.

use eframe::egui::{self, Color32, RichText};
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::config::ConverterConfig;
use crate::converter::{
    BatchState, BatchWorker, EncodingOptions, FFmpegWrapper, SpeedPreset, Transcoder, UiEvent,
    VideoCodec,
};

/// Progress and status mirrored from the worker.
#[derive(Debug, Default)]
struct ProgressView {
    overall_max: usize,
    overall: usize,
    file_max: f64,
    file: f64,
    status: String,
}

impl ProgressView {
    fn overall_fraction(&self) -> f32 {
        if self.overall_max == 0 {
            0.0
        } else {
            (self.overall as f32 / self.overall_max as f32).clamp(0.0, 1.0)
        }
    }

    fn file_fraction(&self) -> f32 {
        if self.file_max <= 0.0 {
            0.0
        } else {
            (self.file / self.file_max).clamp(0.0, 1.0) as f32
        }
    }
}

/// Main application state
pub struct ConverterApp {
    config: ConverterConfig,
    /// Settings used for the next run
    options: EncodingOptions,
    /// Running batch, if any
    worker: Option<BatchWorker>,
    start_enabled: bool,
    progress: ProgressView,
    last_state: Option<BatchState>,
    /// FFmpeg error message (if not found)
    ffmpeg_warning: Option<String>,
}

impl ConverterApp {
    /// Create a new application instance
    pub fn new(config: ConverterConfig) -> Self {
        let ffmpeg_warning = FFmpegWrapper::new(config.ffmpeg_path.clone(), config.ffprobe_path.clone())
            .check_available()
            .err()
            .map(|e| e.to_string());
        if let Some(ref warning) = ffmpeg_warning {
            log::warn!("{}", warning);
        }

        Self {
            options: config.default_options,
            config,
            worker: None,
            start_enabled: true,
            progress: ProgressView {
                status: "Waiting to start...".to_string(),
                ..ProgressView::default()
            },
            last_state: None,
            ffmpeg_warning,
        }
    }

    fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    fn start(&mut self) {
        // Stays off until the worker exits
        self.start_enabled = false;
        self.reset_progress();

        match BatchWorker::spawn(&self.config, self.options) {
            Ok(worker) => self.worker = Some(worker),
            Err(e) => {
                log::error!("Failed to start conversion thread: {}", e);
                self.start_enabled = true;
                show_message(MessageLevel::Error, "Error", &format!("Failed to start conversion: {e}"));
            }
        }
    }

    fn reset_progress(&mut self) {
        self.last_state = None;
        self.progress = ProgressView {
            status: "Waiting for folder...".to_string(),
            ..ProgressView::default()
        };
    }

    /// Drain worker events and retire the worker once it has exited.
    fn poll_worker(&mut self) {
        let Some(worker) = self.worker.as_ref() else {
            return;
        };
        let finished = worker.is_finished();
        let events = worker.poll_events();

        for event in events {
            self.handle_event(event);
        }

        if finished {
            if let Some(mut worker) = self.worker.take() {
                for event in worker.poll_events() {
                    self.handle_event(event);
                }
                if let Some(summary) = worker.join() {
                    log::info!(
                        "Run ended: {} ({} converted, {} skipped, {} failed, {} deleted)",
                        summary.state.display_name(),
                        summary.succeeded,
                        summary.skipped,
                        summary.failed,
                        summary.deleted
                    );
                }
            }
            self.start_enabled = true;
        }
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::OverallMax(max) => self.progress.overall_max = max,
            UiEvent::Overall(value) => self.progress.overall = value,
            UiEvent::FileMax(max) => {
                self.progress.file_max = max;
                self.progress.file = 0.0;
            }
            UiEvent::File(value) => self.progress.file = value,
            UiEvent::Status(text) => self.progress.status = text,
            UiEvent::Error { title, message } => show_message(MessageLevel::Error, &title, &message),
            UiEvent::Info { title, message } => show_message(MessageLevel::Info, &title, &message),
            UiEvent::Confirm {
                title,
                message,
                reply,
            } => {
                let answer = MessageDialog::new()
                    .set_level(MessageLevel::Warning)
                    .set_title(title)
                    .set_description(message)
                    .set_buttons(MessageButtons::YesNo)
                    .show();
                let _ = reply.send(matches!(answer, MessageDialogResult::Yes));
            }
            UiEvent::PickFolder { reply } => {
                let folder = rfd::FileDialog::new()
                    .set_title("Select folder to convert")
                    .pick_folder();
                let _ = reply.send(folder);
            }
            UiEvent::StartEnabled(enabled) => self.start_enabled = enabled,
            UiEvent::Finished(state) => self.last_state = Some(state),
        }
    }

    /// Show encoding settings.
    fn show_settings(&mut self, ui: &mut egui::Ui) {
        let editable = !self.is_running();

        egui::Grid::new("encoding_settings")
            .num_columns(2)
            .spacing([12.0, 10.0])
            .show(ui, |ui| {
                ui.label("Codec:");
                ui.add_enabled_ui(editable, |ui| {
                    egui::ComboBox::from_id_source("codec_selector")
                        .selected_text(self.options.codec.ffmpeg_name())
                        .show_ui(ui, |ui| {
                            for codec in VideoCodec::all() {
                                ui.selectable_value(&mut self.options.codec, *codec, codec.ffmpeg_name());
                            }
                        });
                });
                ui.end_row();

                ui.label("Speed / quality:");
                ui.add_enabled_ui(editable, |ui| {
                    egui::ComboBox::from_id_source("preset_selector")
                        .selected_text(self.options.preset.ffmpeg_name())
                        .show_ui(ui, |ui| {
                            for preset in SpeedPreset::all() {
                                ui.selectable_value(&mut self.options.preset, *preset, preset.ffmpeg_name());
                            }
                        });
                });
                ui.end_row();

                ui.label("Quality (CRF):");
                ui.add_enabled(
                    editable,
                    egui::DragValue::new(&mut self.options.crf).clamp_range(EncodingOptions::CRF_RANGE),
                );
                ui.end_row();
            });
    }

    /// Show progress bars and status.
    fn show_progress(&self, ui: &mut egui::Ui) {
        egui::Grid::new("progress_bars")
            .num_columns(2)
            .spacing([12.0, 10.0])
            .show(ui, |ui| {
                ui.label("All files:");
                ui.add(
                    egui::ProgressBar::new(self.progress.overall_fraction())
                        .desired_width(260.0)
                        .text(format!("{}/{}", self.progress.overall, self.progress.overall_max)),
                );
                ui.end_row();

                ui.label("Current file:");
                ui.add(
                    egui::ProgressBar::new(self.progress.file_fraction())
                        .desired_width(260.0)
                        .show_percentage(),
                );
                ui.end_row();
            });

        ui.add_space(8.0);
        ui.label(RichText::new(&self.progress.status).size(14.0));

        if let Some(state) = self.last_state {
            let color = match state {
                BatchState::Failed => Color32::RED,
                BatchState::Done => Color32::GREEN,
                _ => Color32::GRAY,
            };
            ui.label(RichText::new(state.display_name()).small().color(color));
        }
    }

    /// Keep the window open while a batch is running.
    fn guard_close(&mut self, ctx: &egui::Context) {
        if self.is_running() && ctx.input(|i| i.viewport().close_requested()) {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            log::info!("Close requested during conversion, ignoring");
        }
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        self.guard_close(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            // FFmpeg warning
            if let Some(ref warning) = self.ffmpeg_warning {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⚠").color(Color32::YELLOW));
                    ui.label(RichText::new(warning).color(Color32::YELLOW).small());
                });
                ui.separator();
            }

            self.show_settings(ui);
            ui.separator();
            self.show_progress(ui);
            ui.separator();

            ui.vertical_centered(|ui| {
                let start = ui.add_enabled(
                    self.start_enabled && !self.is_running(),
                    egui::Button::new("▶ Start Conversion"),
                );
                if start.clicked() {
                    self.start();
                }
            });
        });

        // Request repaint while converting
        if self.is_running() {
            ctx.request_repaint();
        }
    }
}

fn show_message(level: MessageLevel, title: &str, message: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
