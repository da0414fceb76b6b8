use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::LocationKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – comparison configuration
// ---------------------------------------------------------------------------

/// Render the left configuration panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Configuration");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            kind_toggle(ui, state);
            ui.separator();

            location_multiselect(ui, state);
            if state.show_warning() {
                ui.label(
                    RichText::new(format!(
                        "⚠ Please select at least 2 {} to compare",
                        state.kind.plural()
                    ))
                    .color(Color32::from_rgb(230, 160, 40)),
                );
            }
            ui.separator();

            baseline_selector(ui, state);
            ui.separator();

            income_input(ui, state);
            ui.separator();

            share_controls(ui, state);
        });
}

fn kind_toggle(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Location Type");
    ui.horizontal(|ui: &mut Ui| {
        for (kind, label) in [(LocationKind::State, "States"), (LocationKind::City, "Cities")] {
            if ui.selectable_label(state.kind == kind, label).clicked() {
                state.set_kind(kind);
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Searchable multi-select
// ---------------------------------------------------------------------------

fn location_multiselect(ui: &mut Ui, state: &mut AppState) {
    ui.strong(format!("Select {}", state.kind.plural()));

    let header = RichText::new(state.selection_label());
    egui::CollapsingHeader::new(header)
        .id_salt(("multiselect", state.kind))
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.add(
                egui::TextEdit::singleline(&mut state.search)
                    .hint_text(format!("Search {}...", state.kind.plural())),
            );

            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Select All").clicked() {
                    state.select_all();
                }
                if ui.small_button("Clear All").clicked() {
                    state.clear_all();
                }
            });

            let visible = state.visible_indices();
            if visible.is_empty() {
                ui.weak(format!("No {} found", state.kind.plural()));
                return;
            }

            // Collect labels first so toggling can borrow `state` mutably.
            let entries: Vec<(String, String)> = visible
                .iter()
                .map(|&i| {
                    let loc = &state.current_locations()[i];
                    (loc.id().to_string(), loc.name.clone())
                })
                .collect();

            ScrollArea::vertical()
                .id_salt("multiselect_list")
                .max_height(260.0)
                .show(ui, |ui: &mut Ui| {
                    for (id, name) in &entries {
                        let mut checked = state.is_selected(id);
                        if ui.checkbox(&mut checked, name.as_str()).changed() {
                            state.toggle(id);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Baseline, income, sharing
// ---------------------------------------------------------------------------

fn baseline_selector(ui: &mut Ui, state: &mut AppState) {
    ui.strong(format!("Baseline {}", state.kind.label()));

    let options: Vec<(String, String)> = state
        .selected_locations()
        .iter()
        .map(|l| (l.id().to_string(), l.name.clone()))
        .collect();
    let current = state.baseline_name().unwrap_or_default().to_string();

    ui.add_enabled_ui(!options.is_empty(), |ui: &mut Ui| {
        egui::ComboBox::from_id_salt("baseline")
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for (id, name) in &options {
                    if ui.selectable_label(state.baseline == *id, name.as_str()).clicked() {
                        state.set_baseline(id);
                    }
                }
            });
    });
    ui.small(format!(
        "The baseline {} is the reference point for salary comparisons",
        state.kind.label().to_lowercase()
    ));
}

fn income_input(ui: &mut Ui, state: &mut AppState) {
    ui.strong(format!("Annual Income (in baseline {})", state.kind.label().to_lowercase()));
    let response = ui.add(
        egui::TextEdit::singleline(&mut state.income_text)
            .hint_text("100000")
            .desired_width(140.0),
    );
    if response.changed() {
        let text = state.income_text.clone();
        state.set_income_text(&text);
    }
    ui.small("Enter your annual income in the baseline location");
}

fn share_controls(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        let enabled = !state.show_warning();
        if ui
            .add_enabled(enabled, egui::Button::new("📋 Share Link"))
            .clicked()
        {
            let url = state.share_url();
            log::info!("Share link: {url}");
            ui.ctx().copy_text(url);
            state.set_share_message("Link copied to clipboard!");
        }
        if let Some((msg, _)) = &state.share_message {
            ui.label(RichText::new(msg.as_str()).color(Color32::from_rgb(60, 170, 90)));
        }
    });

    ui.add_space(6.0);
    ui.strong("Open a shared link");
    ui.horizontal(|ui: &mut Ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.link_text)
                .hint_text("?states=CA,TX&income=100000&base=CA")
                .desired_width(180.0),
        );
        if ui.button("Apply").clicked() {
            let link = state.link_text.clone();
            match state.apply_share_link(&link) {
                Ok(()) => {
                    state.status_message = None;
                    state.link_text.clear();
                }
                Err(e) => {
                    log::warn!("Rejected share link: {e}");
                    state.status_message = Some(format!("Invalid link: {e}"));
                }
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload bundled dataset").clicked() {
                reload_bundled(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        let meta = &state.dataset.meta;
        ui.label(format!(
            "Data source: {} | Last updated: {}",
            meta.source, meta.last_updated
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open cost of living dataset")
        .add_filter("Supported files", &["json", "csv"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} states and {} cities from {}",
                    dataset.states.len(),
                    dataset.cities.len(),
                    path.display()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn reload_bundled(state: &mut AppState) {
    match crate::data::loader::load_bundled() {
        Ok(dataset) => state.set_dataset(dataset),
        Err(e) => {
            log::error!("Failed to load bundled dataset: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
