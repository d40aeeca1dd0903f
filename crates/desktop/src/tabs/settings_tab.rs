use iced::widget::{button, column, pick_list, row, slider, text, text_input, Space};
use iced::{Alignment, Element, Theme};

use livecheck_core::capture::infrastructure::nokhwa_camera_source::CameraDescriptor;

use crate::app::{scaled, Message};
use crate::settings::{Settings, MIN_FACE_SIZE_RANGE, MIN_NEIGHBORS_RANGE, SCALE_FACTOR_RANGE};
use crate::theme::muted_color;

pub fn view<'a>(
    settings: &'a Settings,
    cameras: &'a [CameraDescriptor],
    running: bool,
    theme: &Theme,
) -> Element<'a, Message> {
    let fs = settings.font_scale;
    let muted = muted_color(theme);

    let selected_camera = cameras
        .iter()
        .find(|c| c.index == settings.camera_index)
        .cloned();
    let camera_row: Element<'a, Message> = if cameras.is_empty() {
        text(format!(
            "No cameras found; camera {} will be tried.",
            settings.camera_index
        ))
        .size(scaled(13.0, fs))
        .color(muted)
        .into()
    } else {
        pick_list(cameras, selected_camera, Message::CameraSelected)
            .text_size(scaled(13.0, fs))
            .into()
    };

    let mut content = column![
        text("Camera").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            camera_row,
            button(text("Rescan").size(scaled(13.0, fs)))
                .on_press(Message::RescanCameras)
                .style(button::secondary),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        Space::new().height(20),
        text("Face detection").size(scaled(16.0, fs)),
        Space::new().height(8),
        labeled_slider(
            fs,
            "Scale factor",
            slider(
                SCALE_FACTOR_RANGE,
                settings.scale_factor,
                Message::ScaleFactorChanged
            )
            .step(0.05)
            .into(),
            format!("{:.2}", settings.scale_factor),
        ),
        labeled_slider(
            fs,
            "Min neighbors",
            slider(
                MIN_NEIGHBORS_RANGE,
                settings.min_neighbors,
                Message::MinNeighborsChanged
            )
            .into(),
            settings.min_neighbors.to_string(),
        ),
        labeled_slider(
            fs,
            "Min face size",
            slider(
                MIN_FACE_SIZE_RANGE,
                settings.min_face_size,
                Message::MinFaceSizeChanged
            )
            .step(10u32)
            .into(),
            if settings.min_face_size == 0 {
                "auto".to_string()
            } else {
                format!("{} px", settings.min_face_size)
            },
        ),
        Space::new().height(20),
        text("Cascade model").size(scaled(16.0, fs)),
        Space::new().height(8),
        text_input(
            "Automatic (cache, system OpenCV, download)",
            &settings
                .cascade_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        )
        .on_input(Message::CascadePathChanged)
        .size(scaled(13.0, fs)),
        Space::new().height(8),
        button(text("Open model folder").size(scaled(13.0, fs)))
            .on_press(Message::OpenModelFolder)
            .style(button::secondary),
        Space::new().height(20),
        button(text("Restore defaults").size(scaled(13.0, fs)))
            .on_press(Message::RestoreDefaults)
            .style(button::secondary),
    ]
    .spacing(4);

    if running {
        content = content.push(Space::new().height(12)).push(
            text("Camera and detection changes apply the next time detection starts.")
                .size(scaled(12.0, fs))
                .color(muted),
        );
    }

    content.into()
}

fn labeled_slider<'a>(
    fs: f32,
    label: &'a str,
    slider: Element<'a, Message>,
    value: String,
) -> Element<'a, Message> {
    row![
        text(label).size(scaled(13.0, fs)).width(120),
        slider,
        text(value).size(scaled(13.0, fs)).width(60),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}
