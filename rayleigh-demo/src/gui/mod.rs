mod app;
mod canvas;
pub mod profiling;

pub use app::ScatteringDemo;

use crate::cli::Options;

/// Run the GUI demo
pub fn run(options: Options) -> Result<(), eframe::Error> {
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 800.0])
        .with_title("Rayleigh Scattering");
    let viewport = if options.windowed {
        viewport
    } else {
        viewport.with_fullscreen(true)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Rayleigh Scattering",
        native_options,
        Box::new(move |_cc| Ok(Box::new(ScatteringDemo::new(options.desc())))),
    )
}
