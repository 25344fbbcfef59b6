// Copyright (C) 2025 Berkay Yetgin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use std::path::Path;

use disc_dumper_gui::gui::DiscDumperApp;
use eframe::egui;
use egui::IconData;

fn load_icon() -> Option<IconData> {
    // Window icon is optional; the packaged build ships it next to the binary
    let icon_path = Path::new("winres/icon_main.png");

    if !icon_path.exists() {
        log::warn!("Icon file not found at {:?}", icon_path);
        return None;
    }

    let image = image::ImageReader::open(icon_path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(anyhow::Error::from)
        .and_then(|reader| reader.decode().map_err(anyhow::Error::from));

    let image = match image {
        Ok(img) => img,
        Err(e) => {
            log::warn!("Failed to load icon file: {}", e);
            return None;
        }
    };

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    Some(IconData {
        rgba: rgba.into_raw(),
        width,
        height,
    })
}

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(Some(env_logger::TimestampPrecision::Seconds))
        .init();

    log::info!("=== Disc Dumper GUI Started ===");

    let icon = load_icon();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([860.0, 640.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Disc Dumper")
            .with_icon(icon.unwrap_or_default()), // Use loaded icon or default empty
        ..Default::default()
    };

    eframe::run_native(
        "Disc Dumper",
        options,
        Box::new(|cc| Ok(Box::new(DiscDumperApp::new(cc)))),
    )
}
