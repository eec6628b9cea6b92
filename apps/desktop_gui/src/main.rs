mod backend_bridge;
mod controller;
mod ui;

use crossbeam_channel::bounded;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::app::CatalogGuiApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Reelgrid")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Reelgrid",
        options,
        Box::new(|_cc| Ok(Box::new(CatalogGuiApp::new(cmd_tx, ui_rx)))),
    )
}
