// Copyright (C) 2025 Berkay Yetgin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

use eframe::egui;
use egui::{Color32, RichText};

use crate::core::{
    assemble, available_drives, gather_image_info, load_profiles, load_settings,
    resolved_directory, resolved_file_name, save_settings, spawn_dump, zip_logs, ConsoleEvent,
    DumpRequest, ImageInfo, ProfileCatalog, Settings, SpeedSelection, FIXED_SPEEDS, NO_DRIVES,
    PROFILES_FILE, SETTINGS_FILE,
};

/// Top-level run state. Inputs are locked whenever a dump is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
}

/// Where to collect sidecars after a successful run, captured at launch
/// so later UI edits cannot change what gets collected.
struct PendingCollect {
    directory: PathBuf,
    file_name: String,
    zip_logs: bool,
}

/// Edit buffers for the settings modal. Converted to a typed `Settings`
/// on save; a zero re-read count means "not configured".
#[derive(Default)]
struct SettingsDraft {
    dic_path: String,
    psxt001z_path: String,
    edccchk_path: String,
    c2_rereads: u32,
    beep: bool,
}

impl SettingsDraft {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            dic_path: path_text(&settings.dic_path),
            psxt001z_path: path_text(&settings.psxt001z_path),
            edccchk_path: path_text(&settings.edccchk_path),
            c2_rereads: settings.c2_rereads.unwrap_or(0),
            beep: settings.beep,
        }
    }

    fn to_settings(&self) -> Settings {
        Settings {
            dic_path: opt_path(&self.dic_path),
            psxt001z_path: opt_path(&self.psxt001z_path),
            edccchk_path: opt_path(&self.edccchk_path),
            c2_rereads: (self.c2_rereads > 0).then_some(self.c2_rereads),
            beep: self.beep,
        }
    }
}

fn path_text(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn opt_path(text: &str) -> Option<PathBuf> {
    let text = text.trim();
    (!text.is_empty()).then(|| PathBuf::from(text))
}

/// Main application window.
pub struct DiscDumperApp {
    // Run selections
    file_name: String,
    directory: String,
    disc_type: String,
    drive: String,
    speed_fixed: u32,
    speed_custom: bool,
    custom_speed: String,
    zip_logs: bool,

    // Environment
    profiles: ProfileCatalog,
    drives: Vec<String>,
    settings_path: PathBuf,
    profiles_path: PathBuf,

    // Run state
    state: RunState,
    tx: Sender<ConsoleEvent>,
    rx: Receiver<ConsoleEvent>,
    console: Vec<String>,
    status: String,
    pending: Option<PendingCollect>,

    // Modals
    settings_draft: Option<SettingsDraft>,
    image_info: Option<ImageInfo>,
}

impl Default for DiscDumperApp {
    fn default() -> Self {
        let (tx, rx) = channel();
        Self {
            file_name: String::new(),
            directory: String::new(),
            disc_type: String::new(),
            drive: String::new(),
            speed_fixed: 8,
            speed_custom: false,
            custom_speed: String::new(),
            zip_logs: true,
            profiles: ProfileCatalog::new(),
            drives: Vec::new(),
            settings_path: PathBuf::from(SETTINGS_FILE),
            profiles_path: PathBuf::from(PROFILES_FILE),
            state: RunState::Idle,
            tx,
            rx,
            console: Vec::new(),
            status: String::new(),
            pending: None,
            settings_draft: None,
            image_info: None,
        }
    }
}

impl DiscDumperApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        cc.egui_ctx.set_style(style);

        let mut app = Self::default();

        match load_profiles(&app.profiles_path) {
            Ok(profiles) => {
                app.disc_type = profiles.keys().next().cloned().unwrap_or_default();
                app.profiles = profiles;
            }
            Err(err) => {
                log::error!("Could not load disc profiles: {:#}", err);
                app.status = format!("Could not load {}!", PROFILES_FILE);
            }
        }

        app.drives = available_drives();
        app.drive = app
            .drives
            .first()
            .cloned()
            .unwrap_or_else(|| NO_DRIVES.to_string());

        app
    }

    fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    fn speed_selection(&self) -> SpeedSelection {
        if self.speed_custom {
            SpeedSelection::Custom(self.custom_speed.clone())
        } else {
            SpeedSelection::Fixed(self.speed_fixed)
        }
    }

    // --- Actions ---

    fn start_dump(&mut self) {
        self.status.clear();

        // Settings and profiles are re-read per run so edits from the
        // settings dialog (or by hand) take effect immediately.
        let settings = match load_settings(&self.settings_path) {
            Ok(s) => s,
            Err(err) => {
                log::error!("Could not load settings: {:#}", err);
                self.status = format!("Could not load {}!", SETTINGS_FILE);
                return;
            }
        };
        let profiles = match load_profiles(&self.profiles_path) {
            Ok(p) => p,
            Err(err) => {
                log::error!("Could not load disc profiles: {:#}", err);
                self.status = format!("Could not load {}!", PROFILES_FILE);
                return;
            }
        };

        let request = DumpRequest {
            disc_type: self.disc_type.clone(),
            drive: (!self.drive.is_empty()).then(|| self.drive.clone()),
            file_name: self.file_name.clone(),
            directory: self.directory.clone(),
            speed: self.speed_selection(),
            zip_logs: self.zip_logs,
        };

        let cmd = match assemble(&request, &settings, &profiles) {
            Ok(cmd) => cmd,
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };

        // Both validated successfully inside assemble().
        let directory = resolved_directory(&request.directory).unwrap_or_default();
        let file_name = resolved_file_name(&request.file_name).unwrap_or_default();

        self.console.clear();
        self.console.push(format!(
            "[{}] $ {}",
            chrono::Local::now().format("%H:%M:%S"),
            cmd.join(" ")
        ));

        if let Err(err) = spawn_dump(&cmd, self.tx.clone()) {
            log::error!("Failed to launch DiscImageCreator: {:#}", err);
            self.status = "Failed to launch DiscImageCreator!".to_string();
            return;
        }

        self.pending = Some(PendingCollect {
            directory,
            file_name,
            zip_logs: request.zip_logs,
        });
        self.state = RunState::Running;
    }

    fn finish_dump(&mut self, code: Option<i32>) {
        self.state = RunState::Idle;
        let pending = self.pending.take();

        if code != Some(0) {
            self.status = "Reading image failed! Please read DIC output.".to_string();
            return;
        }

        let Some(pending) = pending else { return };

        let info = gather_image_info(&pending.directory, &pending.file_name);

        if pending.zip_logs {
            if let Err(err) = zip_logs(&pending.directory) {
                log::error!("Failed to zip log files: {:#}", err);
                self.status = "Failed to zip log files!".to_string();
            }
        }

        self.image_info = Some(info);
        if self.status.is_empty() {
            self.status = "Dump finished.".to_string();
        }
    }

    fn pump_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                ConsoleEvent::Line(line) => self.console.push(line),
                ConsoleEvent::Progress(update) => {
                    match self.console.last_mut() {
                        Some(last) => *last = update,
                        None => self.console.push(update),
                    }
                }
                ConsoleEvent::Error(err) => {
                    log::warn!("Stream error: {}", err);
                    self.console.push(format!("[stream error] {}", err));
                }
                ConsoleEvent::Finished(code) => self.finish_dump(code),
            }
        }
    }

    fn open_settings(&mut self) {
        let settings = load_settings(&self.settings_path).unwrap_or_else(|err| {
            log::warn!("Could not load settings for dialog: {:#}", err);
            Settings::default()
        });
        self.settings_draft = Some(SettingsDraft::from_settings(&settings));
    }
}

impl eframe::App for DiscDumperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_events();
        if self.is_running() {
            ctx.request_repaint();
        }

        let unlocked = !self.is_running();

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.is_running() {
                    ui.spinner();
                    ui.label("Dumping disc...");
                } else if self.status.is_empty() {
                    ui.label("Ready");
                } else {
                    ui.label(RichText::new(&self.status).color(Color32::LIGHT_YELLOW));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Disc Dumper");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add_enabled(unlocked, egui::Button::new("⚙ Settings")).clicked() {
                        self.open_settings();
                    }
                });
            });
            ui.separator();

            // Output selection
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label("File name:");
                    ui.add_enabled(
                        unlocked,
                        egui::TextEdit::singleline(&mut self.file_name)
                            .hint_text("image name, .bin appended"),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("Directory:");
                    ui.add_enabled(
                        unlocked,
                        egui::TextEdit::singleline(&mut self.directory)
                            .desired_width(320.0),
                    );
                    if ui.add_enabled(unlocked, egui::Button::new("📂 Browse...")).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .set_title("Select output directory")
                            .pick_folder()
                        {
                            self.directory = path.to_string_lossy().to_string();
                        }
                    }
                });
            });

            // Disc selection
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label("Disc type:");
                    ui.add_enabled_ui(unlocked, |ui| {
                        egui::ComboBox::from_id_salt("disc_type")
                            .selected_text(&self.disc_type)
                            .show_ui(ui, |ui| {
                                for name in self.profiles.keys() {
                                    ui.selectable_value(&mut self.disc_type, name.clone(), name);
                                }
                            });
                    });

                    ui.label("Drive:");
                    ui.add_enabled_ui(unlocked, |ui| {
                        egui::ComboBox::from_id_salt("drive")
                            .selected_text(if self.drive.is_empty() {
                                NO_DRIVES
                            } else {
                                self.drive.as_str()
                            })
                            .show_ui(ui, |ui| {
                                if self.drives.is_empty() {
                                    ui.selectable_value(
                                        &mut self.drive,
                                        NO_DRIVES.to_string(),
                                        NO_DRIVES,
                                    );
                                }
                                for drive in &self.drives {
                                    ui.selectable_value(&mut self.drive, drive.clone(), drive);
                                }
                            });
                    });
                });

                ui.horizontal(|ui| {
                    ui.label("Speed:");
                    ui.add_enabled_ui(unlocked, |ui| {
                        for &speed in FIXED_SPEEDS {
                            if ui
                                .radio(!self.speed_custom && self.speed_fixed == speed, speed.to_string())
                                .clicked()
                            {
                                self.speed_custom = false;
                                self.speed_fixed = speed;
                            }
                        }
                        if ui.radio(self.speed_custom, "Custom").clicked() {
                            self.speed_custom = true;
                        }
                        ui.add_enabled(
                            self.speed_custom,
                            egui::TextEdit::singleline(&mut self.custom_speed).desired_width(48.0),
                        );
                    });
                });

                ui.add_enabled(
                    unlocked,
                    egui::Checkbox::new(&mut self.zip_logs, "Zip log files after dumping"),
                );
            });

            if ui
                .add_enabled(unlocked, egui::Button::new(RichText::new("▶ Start").size(16.0)))
                .clicked()
            {
                self.start_dump();
            }

            ui.separator();

            // Console output
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.style_mut().spacing.item_spacing = egui::vec2(0.0, 2.0);
                    for line in &self.console {
                        ui.label(RichText::new(line).monospace().size(12.0));
                    }
                });
        });

        self.show_settings_window(ctx);
        self.show_image_info_window(ctx);
    }
}

// Modal windows
impl DiscDumperApp {
    fn show_settings_window(&mut self, ctx: &egui::Context) {
        let Some(draft) = &mut self.settings_draft else { return };
        let mut save = false;
        let mut close = false;

        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                path_row(ui, "DiscImageCreator:", &mut draft.dic_path, "DiscImageCreator.exe");
                path_row(ui, "psxt001z:", &mut draft.psxt001z_path, "psxt001z.exe");
                path_row(ui, "edccchk:", &mut draft.edccchk_path, "edccchk.exe");

                ui.horizontal(|ui| {
                    ui.label("C2 re-reads:");
                    ui.add(egui::DragValue::new(&mut draft.c2_rereads).range(0..=10000));
                    ui.label("(0 = default)");
                });
                ui.checkbox(&mut draft.beep, "Beep when done");

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });

        if save {
            let settings = draft.to_settings();
            match save_settings(&self.settings_path, &settings) {
                Ok(()) => self.settings_draft = None,
                Err(err) => {
                    log::error!("Could not save settings: {:#}", err);
                    self.status = format!("Could not save {}!", SETTINGS_FILE);
                }
            }
        } else if close {
            self.settings_draft = None;
        }
    }

    fn show_image_info_window(&mut self, ctx: &egui::Context) {
        let Some(info) = &self.image_info else { return };
        let mut open = true;

        egui::Window::new("Image Info")
            .open(&mut open)
            .default_size([560.0, 420.0])
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if info.is_empty() {
                        ui.label("No image metadata was found next to the dump.");
                        return;
                    }

                    if let Some(cue) = &info.cue {
                        ui.label(RichText::new("Cue sheet").strong());
                        read_only_text(ui, "cue", cue);
                    }
                    if let Some(dat) = &info.dat {
                        ui.label(RichText::new("ClrMamePro dat").strong());
                        read_only_text(ui, "dat", dat);
                    }
                    if let Some(offset) = info.write_offset {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("Write offset").strong());
                            ui.label(RichText::new(offset.to_string()).monospace());
                        });
                    }
                    if let Some(pvd) = &info.pvd {
                        ui.label(RichText::new("Primary Volume Descriptor").strong());
                        read_only_text(ui, "pvd", pvd);
                    }
                });
            });

        if !open {
            self.image_info = None;
        }
    }
}

fn path_row(ui: &mut egui::Ui, label: &str, text: &mut String, filter: &str) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::TextEdit::singleline(text).desired_width(280.0));
        if ui.button("Browse...").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .set_title("Browse")
                .add_filter(filter, &["exe"])
                .pick_file()
            {
                *text = path.to_string_lossy().to_string();
            }
        }
    });
}

fn read_only_text(ui: &mut egui::Ui, id: &str, mut text: &str) {
    ui.push_id(id, |ui| {
        ui.add(
            egui::TextEdit::multiline(&mut text)
                .font(egui::TextStyle::Monospace)
                .desired_width(f32::INFINITY)
                .desired_rows(6),
        );
    });
}
