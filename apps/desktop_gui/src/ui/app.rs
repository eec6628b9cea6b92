//! Immediate-mode UI: search form, status line, and the movie card list.

use std::time::Duration;

use client_core::ViewModel;
use crossbeam_channel::{Receiver, Sender};
use shared::domain::MovieSummary;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{describe_startup_failure, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const OVERVIEW_PREVIEW_CHARS: usize = 240;

pub struct CatalogGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    search_input: String,
    view: ViewModel,
    status: String,
    backend_failure: Option<String>,
}

impl CatalogGuiApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            search_input: String::new(),
            view: ViewModel::default(),
            status: "Starting backend worker...".to_string(),
            backend_failure: None,
        }
    }

    fn drain_backend_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::BackendReady => self.status = "Catalog ready".to_string(),
                UiEvent::ViewModelChanged(view) => self.view = view,
                UiEvent::BackendFailed(message) => {
                    self.backend_failure = Some(describe_startup_failure(&message));
                }
            }
        }
    }

    /// Forwards the raw search box text on explicit submission only; the
    /// controller handles trimming and the empty/loading no-op rules.
    fn submit_search(&mut self) {
        let query = self.search_input.clone();
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Search { query },
            &mut self.status,
        );
    }
}

impl eframe::App for CatalogGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_backend_events();

        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.search_input)
                        .hint_text("Search for movies...")
                        .desired_width(320.0),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Search").clicked() || submitted {
                    self.submit_search();
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(failure) = &self.backend_failure {
                ui.colored_label(egui::Color32::LIGHT_RED, failure);
                return;
            }

            if let Some(message) = &self.view.error_message {
                ui.colored_label(egui::Color32::LIGHT_RED, message);
            }

            if self.view.is_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for movie in &self.view.items {
                    movie_card(ui, movie);
                }
            });
        });

        // The backend channel has no waker on this side; poll it.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn movie_card(ui: &mut egui::Ui, movie: &MovieSummary) {
    // Keyed by the catalog id so egui state survives list reordering.
    ui.push_id(movie.id.0, |ui| {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.strong(&movie.title);
                if let Some(year) = movie.release_year() {
                    ui.weak(format!("({year})"));
                }
                if let Some(rating) = movie.vote_average {
                    ui.weak(format!("{rating:.1}/10"));
                }
            });
            if let Some(overview) = movie.overview.as_deref() {
                ui.label(overview_preview(overview));
            }
        });
    });
}

fn overview_preview(overview: &str) -> String {
    if overview.chars().count() <= OVERVIEW_PREVIEW_CHARS {
        return overview.to_string();
    }
    let truncated: String = overview.chars().take(OVERVIEW_PREVIEW_CHARS).collect();
    format!("{}...", truncated.trim_end())
}
