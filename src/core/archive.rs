// Copyright (C) 2025 Berkay Yetgin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::types::LOG_EXTENSIONS;

/// Name of the archive written into the dump directory.
pub const ARCHIVE_NAME: &str = "logs.zip";

/// Zip every log file in `dir` into `<dir>/logs.zip`, deflate-compressed,
/// entry names flat. The archive file is always created; with no matching
/// files it is a valid zero-entry zip.
pub fn zip_logs(dir: &Path) -> Result<PathBuf> {
    let output = dir.join(ARCHIVE_NAME);
    let log_files = collect_log_files(dir)?;

    let file = File::create(&output)
        .with_context(|| format!("Failed to create archive: {:?}", output))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &log_files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .context("Log file has no name")?;

        zip.start_file(name.as_str(), options)
            .with_context(|| format!("Failed to add archive entry: {}", name))?;
        let mut input =
            File::open(path).with_context(|| format!("Failed to open log file: {:?}", path))?;
        io::copy(&mut input, &mut zip)
            .with_context(|| format!("Failed to compress log file: {:?}", path))?;
    }

    zip.finish().context("Failed to finalize logs.zip")?;
    log::info!("Archived {} log files into {:?}", log_files.len(), output);

    Ok(output)
}

/// List files in `dir` matching the log extension allow-list. The
/// archive itself and subdirectories are skipped.
fn collect_log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))?;

    let mut log_files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if LOG_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            log_files.push(entry.path());
        }
    }

    log_files.sort();
    Ok(log_files)
}
