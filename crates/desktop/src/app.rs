use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};

use livecheck_core::capture::infrastructure::nokhwa_camera_source::{
    list_cameras, CameraDescriptor,
};
use livecheck_core::liveness::domain::verdict::FaceVerdict;
use livecheck_core::pipeline::capture_backend::CaptureBackend;
use livecheck_core::pipeline::capture_loop::{FrameUpdate, LoopEnd};
use livecheck_core::pipeline::capture_session::CaptureSession;
use livecheck_core::pipeline::infrastructure::camera_backend::CameraBackend;
use livecheck_core::shared::constants::{STOPPED_TEXT, WAITING_TEXT};
use livecheck_core::shared::model_resolver::model_cache_dir;

use crate::settings::{Appearance, Settings};
use crate::tabs;
use crate::theme;

/// How often the UI drains the frame channel while capturing (~60 Hz).
const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Tab enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Monitor,
    Settings,
    Appearance,
    About,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Monitor, Tab::Settings, Tab::Appearance, Tab::About];

    fn label(self) -> &'static str {
        match self {
            Tab::Monitor => "Monitor",
            Tab::Settings => "Settings",
            Tab::Appearance => "Appearance",
            Tab::About => "About",
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    Start,
    Stop,
    ThresholdChanged(u32),
    Tick,
    CameraSelected(CameraDescriptor),
    RescanCameras,
    ScaleFactorChanged(f64),
    MinNeighborsChanged(u32),
    MinFaceSizeChanged(u32),
    CascadePathChanged(String),
    OpenModelFolder,
    RestoreDefaults,
    AppearanceChanged(Appearance),
    HighContrastChanged(bool),
    FontScaleChanged(f32),
    CloseRequested,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    session: CaptureSession,
    /// Cascade override the current session's backend was built with.
    session_cascade: Option<PathBuf>,
    /// Present exactly while a capture is shown as running.
    updates: Option<Receiver<FrameUpdate>>,
    video: Option<image::Handle>,
    result_text: String,
    faces: Vec<FaceVerdict>,
    error: Option<String>,
    cameras: Vec<CameraDescriptor>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let backend = Arc::new(CameraBackend::new(settings.cascade_path.clone()));
        let mut app = Self::with_backend(settings, backend);
        app.cameras = scan_cameras();
        (app, Task::none())
    }

    /// An idle app capturing through `backend`. Cameras are not scanned.
    fn with_backend(settings: Settings, backend: Arc<dyn CaptureBackend>) -> Self {
        let session = CaptureSession::new(backend, settings.session_config(), settings.threshold);
        Self {
            active_tab: Tab::Monitor,
            session_cascade: settings.cascade_path.clone(),
            settings,
            session,
            updates: None,
            video: None,
            result_text: WAITING_TEXT.to_string(),
            faces: Vec::new(),
            error: None,
            cameras: Vec::new(),
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::Start => self.start(),
            Message::Stop => self.stop(),
            Message::ThresholdChanged(val) => {
                self.settings.threshold = self.session.set_threshold(val);
                self.settings.save();
            }
            Message::Tick => self.drain_updates(),
            Message::CameraSelected(camera) => {
                self.settings.camera_index = camera.index;
                self.settings.save();
            }
            Message::RescanCameras => {
                self.cameras = scan_cameras();
            }
            Message::ScaleFactorChanged(val) => {
                self.settings.scale_factor = val;
                self.settings.save();
            }
            Message::MinNeighborsChanged(val) => {
                self.settings.min_neighbors = val;
                self.settings.save();
            }
            Message::MinFaceSizeChanged(val) => {
                self.settings.min_face_size = val;
                self.settings.save();
            }
            Message::CascadePathChanged(val) => {
                let trimmed = val.trim();
                self.settings.cascade_path = if trimmed.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(trimmed))
                };
                self.settings.save();
            }
            Message::OpenModelFolder => open_model_folder(),
            Message::RestoreDefaults => {
                self.settings.restore_detection_defaults();
                self.session.set_threshold(self.settings.threshold);
                self.settings.save();
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
            }
            Message::HighContrastChanged(enabled) => {
                self.settings.high_contrast = enabled;
                self.settings.save();
            }
            Message::FontScaleChanged(scale) => {
                self.settings.font_scale = scale;
                self.settings.save();
            }
            Message::CloseRequested => {
                self.stop();
                return iced::exit();
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fs = self.settings.font_scale;
        let theme = self.theme();

        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let label = text(tab.label()).size(scaled(13.0, fs));
                let btn = button(label)
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        let content: Element<'_, Message> = match self.active_tab {
            Tab::Monitor => tabs::monitor_tab::view(
                fs,
                tabs::monitor_tab::MonitorState {
                    running: self.is_capturing(),
                    threshold: self.settings.threshold,
                    video: self.video.as_ref(),
                    result_text: &self.result_text,
                    faces: &self.faces,
                    error: self.error.as_deref(),
                },
                &theme,
            ),
            Tab::Settings => {
                tabs::settings_tab::view(&self.settings, &self.cameras, self.is_capturing(), &theme)
            }
            Tab::Appearance => tabs::appearance_tab::view(&self.settings, &theme),
            Tab::About => tabs::about_tab::view(fs, &theme),
        };

        let tab_content = container(scrollable(content).height(Length::Fill))
            .padding(16)
            .height(Length::Fill);

        column![tab_bar, tab_content]
            .spacing(0)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance, self.settings.high_contrast)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions =
            vec![iced::window::close_requests().map(|_| Message::CloseRequested)];
        if self.is_capturing() {
            subscriptions.push(iced::time::every(FRAME_POLL_INTERVAL).map(|_| Message::Tick));
        }
        Subscription::batch(subscriptions)
    }

    fn is_capturing(&self) -> bool {
        self.updates.is_some()
    }

    fn start(&mut self) {
        if self.is_capturing() {
            return;
        }
        if self.session_cascade != self.settings.cascade_path {
            self.session = new_session(&self.settings);
            self.session_cascade = self.settings.cascade_path.clone();
        } else {
            self.session.set_config(self.settings.session_config());
            self.session.set_threshold(self.settings.threshold);
        }

        match self.session.start() {
            Ok(Some(updates)) => {
                self.updates = Some(updates);
                self.error = None;
                self.result_text = WAITING_TEXT.to_string();
                self.faces.clear();
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("Could not start capture: {e}");
                self.error = Some(e.to_string());
                self.show_stopped();
            }
        }
    }

    fn stop(&mut self) {
        if !self.is_capturing() {
            return;
        }
        self.session.stop();
        self.show_stopped();
    }

    /// Shows the newest pending frame and notices a loop that ended on
    /// its own.
    fn drain_updates(&mut self) {
        let Some(updates) = &self.updates else {
            return;
        };
        let mut latest = None;
        loop {
            match updates.try_recv() {
                Ok(update) => latest = Some(update),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if let Some(update) = latest {
            self.show_update(update);
        }

        if let Some(end) = self.session.poll_finished() {
            log::info!("Capture ended: {end:?}");
            self.error = match end {
                LoopEnd::ReadFailed(reason)
                | LoopEnd::OpenFailed(reason)
                | LoopEnd::DetectorUnavailable(reason) => Some(reason),
                LoopEnd::Cancelled | LoopEnd::Exhausted => None,
            };
            self.show_stopped();
        }
    }

    fn show_update(&mut self, update: FrameUpdate) {
        let frame = &update.frame;
        self.video = Some(image::Handle::from_rgba(
            frame.width(),
            frame.height(),
            frame.to_rgba(),
        ));
        self.result_text = update.result_text();
        self.faces = update.report.faces;
    }

    fn show_stopped(&mut self) {
        self.updates = None;
        self.video = None;
        self.faces.clear();
        self.result_text = STOPPED_TEXT.to_string();
    }
}

fn new_session(settings: &Settings) -> CaptureSession {
    let backend = Arc::new(CameraBackend::new(settings.cascade_path.clone()));
    CaptureSession::new(backend, settings.session_config(), settings.threshold)
}

fn scan_cameras() -> Vec<CameraDescriptor> {
    match list_cameras() {
        Ok(cameras) => {
            log::info!("Found {} camera(s)", cameras.len());
            cameras
        }
        Err(e) => {
            log::warn!("Camera scan failed: {e}");
            Vec::new()
        }
    }
}

fn open_model_folder() {
    match model_cache_dir() {
        Ok(dir) => {
            if let Err(e) = std::fs::create_dir_all(&dir) {
                log::warn!("Failed to create {}: {e}", dir.display());
            }
            if let Err(e) = open::that(&dir) {
                log::warn!("Failed to open {}: {e}", dir.display());
            }
        }
        Err(e) => log::warn!("No model folder: {e}"),
    }
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}
