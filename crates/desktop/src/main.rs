mod app;
mod settings;
mod tabs;
mod theme;

use app::App;
use livecheck_core::capture::infrastructure::nokhwa_camera_source::request_camera_access;

fn main() -> iced::Result {
    env_logger::init();
    request_camera_access();

    iced::application(App::new, App::update, App::view)
        .title("Face Liveness Detection")
        .theme(App::theme)
        .subscription(App::subscription)
        .window(iced::window::Settings {
            size: iced::Size::new(760.0, 720.0),
            exit_on_close_request: false,
            ..Default::default()
        })
        .run()
}
