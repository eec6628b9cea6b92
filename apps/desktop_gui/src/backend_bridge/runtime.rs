//! Backend worker: owns the tokio runtime, the catalog client, and the fetch
//! controller, and forwards every ViewModel snapshot to the UI thread.

use std::{sync::Arc, thread};

use client_core::{config, tmdb::TmdbCatalog, FetchController};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "failed to build backend runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let settings = config::load_settings();
            let catalog = match TmdbCatalog::new(&settings) {
                Ok(catalog) => Arc::new(catalog),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::BackendFailed(err.to_string()));
                    tracing::error!("failed to construct catalog client: {err}");
                    return;
                }
            };
            let controller = Arc::new(FetchController::new(catalog));

            let mut changes = controller.subscribe();
            let forward_tx = ui_tx.clone();
            tokio::spawn(async move {
                while let Ok(view) = changes.recv().await {
                    let _ = forward_tx.try_send(UiEvent::ViewModelChanged(view));
                }
            });

            let _ = ui_tx.try_send(UiEvent::BackendReady);
            controller.load_initial().await;

            // Exits when the UI side drops its command sender.
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Search { query } => controller.search(&query).await,
                }
            }
        });
    });
}
