// Copyright (C) 2025 Berkay Yetgin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::drives::NO_DRIVES;
use crate::core::types::{DumpRequest, ProfileCatalog, Settings, SpeedSelection};

/// Fallback executable name probed in the working directory when no
/// path is configured in the settings.
pub const DIC_EXECUTABLE: &str = "DiscImageCreator.exe";

/// Validation failures from command assembly. The `Display` text is what
/// the status bar shows; nothing is launched and nothing is written when
/// any of these fire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    #[error("DiscImageCreator.exe not found!")]
    DicNotFound,
    #[error("Disc profile '{0}' not found. Aborting!")]
    UnknownProfile(String),
    #[error("No optical drive selected. Aborting!")]
    NoDrive,
    #[error("Output file name is malformed. Aborting!")]
    BadFileName,
    #[error("Output directory is malformed. Aborting!")]
    BadDirectory,
    #[error("Drive speed is not a number. Aborting!")]
    BadSpeed,
}

/// Resolve the DiscImageCreator executable: the configured path when it
/// exists, otherwise `DiscImageCreator.exe` in the working directory.
pub fn resolve_executable(settings: &Settings) -> Result<PathBuf, AssembleError> {
    if let Some(path) = &settings.dic_path {
        if path.is_file() {
            return Ok(path.clone());
        }
        log::warn!("Configured DiscImageCreator path does not exist: {:?}", path);
    }

    let cwd_exe = std::env::current_dir()
        .map(|cwd| cwd.join(DIC_EXECUTABLE))
        .map_err(|_| AssembleError::DicNotFound)?;
    if cwd_exe.is_file() {
        return Ok(cwd_exe);
    }

    Err(AssembleError::DicNotFound)
}

/// Validate the output file name, auto-appending `.bin` when absent.
pub fn resolved_file_name(name: &str) -> Result<String, AssembleError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AssembleError::BadFileName);
    }
    if name.ends_with(".bin") {
        Ok(name.to_string())
    } else {
        Ok(format!("{}.bin", name))
    }
}

/// Validate the output directory: tilde-expanded and required to exist.
pub fn resolved_directory(dir: &str) -> Result<PathBuf, AssembleError> {
    if dir.is_empty() {
        return Err(AssembleError::BadDirectory);
    }
    let expanded = expand_tilde(dir);
    if expanded.is_dir() {
        Ok(expanded)
    } else {
        Err(AssembleError::BadDirectory)
    }
}

fn expand_tilde(dir: &str) -> PathBuf {
    if dir == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(dir));
    }
    if let Some(rest) = dir.strip_prefix("~/").or_else(|| dir.strip_prefix("~\\")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(dir)
}

/// Validate the speed selection into its command-line token. Custom
/// speeds must be plain digit strings.
pub fn parse_speed(speed: &SpeedSelection) -> Result<String, AssembleError> {
    match speed {
        SpeedSelection::Fixed(value) => Ok(value.to_string()),
        SpeedSelection::Custom(text) => {
            let text = text.trim();
            if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
                Ok(text.to_string())
            } else {
                Err(AssembleError::BadSpeed)
            }
        }
    }
}

/// Build the DiscImageCreator argument list from the current UI
/// selections. First validation failure wins; no side effects.
pub fn assemble(
    request: &DumpRequest,
    settings: &Settings,
    profiles: &ProfileCatalog,
) -> Result<Vec<String>, AssembleError> {
    let mut cmd = Vec::new();

    let exe = resolve_executable(settings)?;
    cmd.push(exe.to_string_lossy().to_string());

    let profile = profiles
        .get(&request.disc_type)
        .ok_or_else(|| AssembleError::UnknownProfile(request.disc_type.clone()))?;

    if let Some(disc_type) = &profile.disc_type {
        cmd.push(disc_type.clone());
    }

    let drive = request
        .drive
        .as_deref()
        .filter(|d| !d.is_empty() && *d != NO_DRIVES)
        .ok_or(AssembleError::NoDrive)?;
    cmd.push(drive.to_string());

    let file_name = resolved_file_name(&request.file_name)?;
    let directory = resolved_directory(&request.directory)?;
    cmd.push(absolute_path(&directory.join(file_name)));

    cmd.push(parse_speed(&request.speed)?);

    // DiscImageCreator takes the re-read count inside the C2 switch token.
    if let Some(c2) = &profile.c2 {
        match settings.c2_rereads {
            Some(count) => cmd.push(format!("{} {}", c2, count)),
            None => cmd.push(c2.clone()),
        }
    }

    if let Some(no_log) = &profile.no_log {
        cmd.push(no_log.clone());
    }

    if !settings.beep {
        cmd.push("/q".to_string());
    }

    log::debug!("Assembled command: {:?}", cmd);
    Ok(cmd)
}

fn absolute_path(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}
