mod app;

pub use app::ViewerApp;

use std::path::PathBuf;

use crate::runtime::ViewerConfig;

pub fn run(inputs: Vec<PathBuf>, config: Option<ViewerConfig>) -> Result<(), String> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("gridlens"),
        ..Default::default()
    };
    eframe::run_native(
        "gridlens",
        options,
        Box::new(move |_cc| {
            let app = ViewerApp::new(inputs, config)?;
            Ok(Box::new(app) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|error| error.to_string())
}
