use iced::widget::{column, text, Space};
use iced::{Element, Theme};

use crate::app::{scaled, Message};
use crate::theme::muted_color;

pub fn view(fs: f32, theme: &Theme) -> Element<'static, Message> {
    let version = env!("CARGO_PKG_VERSION");
    let muted = muted_color(theme);

    column![
        text("LiveCheck").size(scaled(22.0, fs)),
        Space::new().height(4),
        text(format!("Version {version}")).size(scaled(13.0, fs)),
        Space::new().height(12),
        text(
            "Faces are found with a Haar cascade classifier. Each face is \
             scored by the variance of its Laplacian edge response: sharp, \
             textured skin scores high, while flat prints and screens tend \
             to score low. Faces scoring above the threshold are marked \
             Live, the rest Spoof."
        )
        .size(scaled(13.0, fs)),
        Space::new().height(12),
        text(
            "This is a focus heuristic, not a security control. Lighting, \
             camera quality and distance all move the score, so tune the \
             threshold for your setup."
        )
        .size(scaled(13.0, fs))
        .color(muted),
        Space::new().height(12),
        text(
            "Everything runs locally. The only network access is a one-time \
             download of the face cascade when no local copy is found."
        )
        .size(scaled(13.0, fs))
        .color(muted),
    ]
    .spacing(0)
    .into()
}
