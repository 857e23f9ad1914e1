//! Stave - video transcription client
//!
//! Desktop client for the transcription backend: submit a video link, watch
//! the pipeline progress live, then review the generated score while
//! listening to the extracted audio with synchronized note highlighting.

mod audio;
mod config;
mod ui;

use ui::StaveApp;

fn main() -> iced::Result {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("stave starting up");

    iced::application(StaveApp::new, StaveApp::update, StaveApp::view)
        .subscription(StaveApp::subscription)
        .title(StaveApp::title)
        .theme(StaveApp::theme)
        .window_size(iced::Size::new(980.0, 760.0))
        .run()
}
