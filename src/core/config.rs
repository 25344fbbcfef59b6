// Copyright (C) 2025 Berkay Yetgin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::types::{ProfileCatalog, Settings};

/// Default settings file name, looked up next to the working directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Default disc profile catalog file name.
pub const PROFILES_FILE: &str = "disc_profiles.json";

/// Load settings from the given JSON file. A missing file is not an
/// error: the dialog simply starts from defaults.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.is_file() {
        log::info!("No settings file at {:?}, using defaults", path);
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {:?}", path))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {:?}", path))?;

    Ok(settings)
}

/// Persist settings, overwriting any previous file. Unset fields are
/// omitted from the JSON so the file mirrors what the dialog holds.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    fs::write(path, json).with_context(|| format!("Failed to write settings file: {:?}", path))?;

    log::info!("Saved settings to {:?}", path);
    Ok(())
}

/// Load the disc profile catalog. The catalog is read-only; it is loaded
/// once at startup for the combo box and again per command assembly.
pub fn load_profiles(path: &Path) -> Result<ProfileCatalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read disc profiles: {:?}", path))?;
    let profiles: ProfileCatalog = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse disc profiles: {:?}", path))?;

    log::info!("Loaded {} disc profiles from {:?}", profiles.len(), path);
    Ok(profiles)
}
