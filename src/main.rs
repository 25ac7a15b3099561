#![warn(clippy::all, rust_2018_idioms)]

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("TravelStory")
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([960.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TravelStory",
        native_options,
        Box::new(|cc| Ok(Box::new(travelstory::TravelStoryApp::new(cc)))),
    )
}
