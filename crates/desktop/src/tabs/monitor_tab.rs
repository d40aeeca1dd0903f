use iced::border::Border;
use iced::widget::{button, column, container, image, row, slider, text, Space};
use iced::{Alignment, Element, Length, Theme};

use livecheck_core::liveness::domain::threshold::THRESHOLD_RANGE;
use livecheck_core::liveness::domain::verdict::FaceVerdict;

use crate::app::{scaled, Message};
use crate::theme::{muted_color, surface_color, verdict_color};

const VIDEO_HEIGHT: f32 = 360.0;

/// Everything the monitor view shows, borrowed from the app.
pub struct MonitorState<'a> {
    pub running: bool,
    pub threshold: u32,
    pub video: Option<&'a image::Handle>,
    pub result_text: &'a str,
    pub faces: &'a [FaceVerdict],
    pub error: Option<&'a str>,
}

pub fn view<'a>(fs: f32, state: MonitorState<'a>, theme: &Theme) -> Element<'a, Message> {
    let muted = muted_color(theme);

    let header = column![
        text("Face Liveness Detection").size(scaled(22.0, fs)),
        text("Live or spoof, judged by the texture of each detected face")
            .size(scaled(12.0, fs))
            .color(muted),
    ]
    .spacing(4)
    .align_x(Alignment::Center);

    let video: Element<'a, Message> = match state.video {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(scaled(VIDEO_HEIGHT, fs))
            .into(),
        None => {
            let surface = surface_color(theme);
            container(
                text("No video")
                    .size(scaled(13.0, fs))
                    .color(muted),
            )
            .width(Length::Fill)
            .height(scaled(VIDEO_HEIGHT, fs))
            .center_x(Length::Fill)
            .center_y(scaled(VIDEO_HEIGHT, fs))
            .style(move |_theme: &Theme| container::Style {
                background: Some(iced::Background::Color(surface)),
                border: Border {
                    radius: 8.0.into(),
                    ..Border::default()
                },
                ..container::Style::default()
            })
            .into()
        }
    };

    // Exactly one of the two buttons is enabled at a time.
    let start_btn = button(text("Start Detection").size(scaled(13.0, fs)))
        .on_press_maybe((!state.running).then_some(Message::Start))
        .padding([8, 16]);
    let stop_btn = button(text("Stop Detection").size(scaled(13.0, fs)))
        .on_press_maybe(state.running.then_some(Message::Stop))
        .style(button::secondary)
        .padding([8, 16]);
    let controls = row![start_btn, stop_btn].spacing(10);

    let threshold = row![
        text("Threshold:").size(scaled(13.0, fs)),
        slider(THRESHOLD_RANGE, state.threshold, Message::ThresholdChanged).width(240),
        text(state.threshold.to_string()).size(scaled(13.0, fs)),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let mut result = column![text(state.result_text.to_string()).size(scaled(15.0, fs))]
        .spacing(4)
        .align_x(Alignment::Center);

    if state.faces.len() > 1 {
        for (i, face) in state.faces.iter().enumerate() {
            result = result.push(
                text(format!("Face {}: {}", i + 1, face.overlay_text()))
                    .size(scaled(12.0, fs))
                    .color(verdict_color(theme, face.verdict)),
            );
        }
    }

    if let Some(error) = state.error {
        result = result.push(
            text(error.to_string())
                .size(scaled(12.0, fs))
                .color(theme.palette().danger),
        );
    }

    column![
        header,
        Space::new().height(12),
        video,
        Space::new().height(12),
        controls,
        Space::new().height(8),
        threshold,
        Space::new().height(12),
        result,
    ]
    .align_x(Alignment::Center)
    .width(Length::Fill)
    .into()
}
