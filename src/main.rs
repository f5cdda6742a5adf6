mod action_bar;
mod annotation;
mod app;
mod board;
mod canvas;
mod clipboard;
mod error;
mod flatten;
mod help;
mod interaction;
mod reference;
mod settings;
mod state;
mod theme;
mod toolbar;
mod ui_controls;
mod view_panel;

use eframe::egui;

use crate::settings::UserSettings;

const WINDOW_SIZE: [f32; 2] = [960.0, 540.0];
const ICON_SIDE: u32 = 64;

fn main() -> eframe::Result<()> {
    init_logging();

    let settings = UserSettings::load().unwrap_or_else(|err| {
        tracing::info!("using default settings: {err:#}");
        UserSettings::default()
    });

    let viewport = egui::ViewportBuilder::default()
        .with_title("Umpire Track Editor")
        .with_inner_size(WINDOW_SIZE)
        .with_min_inner_size(WINDOW_SIZE)
        .with_max_inner_size(WINDOW_SIZE)
        .with_resizable(false)
        .with_icon(app_icon());

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Umpire Track Editor",
        options,
        Box::new(move |cc| Box::new(app::UmpireTrackApp::new(cc, settings))),
    )
}

fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// A blue running-track ring on the canvas color.
fn app_icon() -> egui::IconData {
    let side = ICON_SIDE as f32;
    let center = side / 2.0 - 0.5;
    let mut rgba = Vec::with_capacity((ICON_SIDE * ICON_SIDE * 4) as usize);

    for y in 0..ICON_SIDE {
        for x in 0..ICON_SIDE {
            // Squash vertically so the ring reads as an oval.
            let dx = x as f32 - center;
            let dy = (y as f32 - center) * 1.6;
            let distance = (dx * dx + dy * dy).sqrt();
            let pixel = if (22.0..28.0).contains(&distance) {
                [0, 0, 255, 255]
            } else if distance < 31.0 {
                theme::DIAGRAM.canvas_fill
            } else {
                [0, 0, 0, 0]
            };
            rgba.extend_from_slice(&pixel);
        }
    }

    egui::IconData {
        rgba,
        width: ICON_SIDE,
        height: ICON_SIDE,
    }
}
