// Copyright (C) 2025 Berkay Yetgin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::types::ImageInfo;

/// Marker line in `<base>_disc.txt` that carries the write offset.
const OFFSET_MARKER: &str = "CD Offset(Byte)";

/// Delimiter before the numeric offset in samples.
const OFFSET_DELIMITER: &str = "(Samples)";

/// Zero-indexed line range of the Primary Volume Descriptor excerpt in
/// `<base>_mainInfo.txt`.
const PVD_LINES: std::ops::RangeInclusive<usize> = 52..=57;

/// Collect image metadata from the sidecar files DiscImageCreator wrote
/// next to `<dir>/<file_name>`. Missing files are omitted from the
/// result, never an error.
pub fn gather_image_info(dir: &Path, file_name: &str) -> ImageInfo {
    let stem = file_name.strip_suffix(".bin").unwrap_or(file_name);
    let base = dir.join(stem);

    ImageInfo {
        cue: read_whole(&sibling(&base, ".cue")),
        dat: read_whole(&sibling(&base, ".dat")),
        write_offset: extract_write_offset(&sibling(&base, "_disc.txt")),
        pvd: extract_pvd(&sibling(&base, "_mainInfo.txt")),
    }
}

fn sibling(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn read_whole(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            log::warn!("Failed to read sidecar {:?}: {}", path, err);
            None
        }
    }
}

/// Scan the disc-info file for the offset marker; the first match wins.
fn extract_write_offset(path: &Path) -> Option<i64> {
    let content = read_whole(path)?;

    for line in content.lines() {
        if !line.contains(OFFSET_MARKER) {
            continue;
        }
        let (_, tail) = line.split_once(OFFSET_DELIMITER)?;
        return match tail.trim().parse::<i64>() {
            Ok(offset) => Some(offset),
            Err(_) => {
                log::warn!("Unparsable write offset in {:?}: {:?}", path, line);
                None
            }
        };
    }

    None
}

/// Concatenate the fixed PVD line range. Short files yield a shorter
/// (possibly empty) excerpt; the key is still present when the file is.
fn extract_pvd(path: &Path) -> Option<String> {
    let content = read_whole(path)?;

    let mut pvd = String::new();
    for (i, line) in content.lines().enumerate() {
        if i > *PVD_LINES.end() {
            break;
        }
        if PVD_LINES.contains(&i) {
            pvd.push_str(line);
            pvd.push('\n');
        }
    }

    Some(pvd)
}
