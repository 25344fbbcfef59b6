// Copyright (C) 2025 Berkay Yetgin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

/// Placeholder combo-box entry when enumeration finds nothing.
pub const NO_DRIVES: &str = "No optical drives found";

/// List optical drives as ready-to-use command-line tokens. Returns an
/// empty list when none are present; the GUI substitutes `NO_DRIVES`.
pub fn available_drives() -> Vec<String> {
    let drives = platform_drives();
    log::info!("Found {} optical drive(s)", drives.len());
    drives
}

/// Linux exposes optical drives as /dev/sr* block devices.
#[cfg(target_os = "linux")]
fn platform_drives() -> Vec<String> {
    let mut drives: Vec<String> = match std::fs::read_dir("/dev") {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| {
                name.strip_prefix("sr")
                    .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
            })
            .map(|name| format!("/dev/{}", name))
            .collect(),
        Err(err) => {
            log::warn!("Failed to read /dev: {}", err);
            Vec::new()
        }
    };
    drives.sort();
    drives
}

/// DiscImageCreator takes a bare lowercase drive letter on Windows.
#[cfg(windows)]
fn platform_drives() -> Vec<String> {
    ('d'..='z')
        .filter(|letter| std::path::Path::new(&format!("{}:\\", letter)).exists())
        .map(|letter| letter.to_string())
        .collect()
}

#[cfg(not(any(target_os = "linux", windows)))]
fn platform_drives() -> Vec<String> {
    Vec::new()
}
