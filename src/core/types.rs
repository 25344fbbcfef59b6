// Copyright (C) 2025 Berkay Yetgin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persisted user settings. Every field is optional in the JSON file;
/// keys written by older versions of the tool are accepted as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Path to DiscImageCreator. When unset, the executable is looked up
    /// in the current working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dic_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psxt001z_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edccchk_path: Option<PathBuf>,
    /// Number of C2 error re-reads appended to a profile's C2 switch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c2_rereads: Option<u32>,
    /// When false the `/q` quiet switch is appended to suppress the beep.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub beep: bool,
}

/// Named preset of DiscImageCreator switches for one disc type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscProfile {
    /// Disc-type command (e.g. "cd", "dvd", "gd").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_type: Option<String>,
    /// C2 error-check switch fragment (e.g. "/c2").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c2: Option<String>,
    /// No-log switch fragment.
    #[serde(default, rename = "nl", skip_serializing_if = "Option::is_none")]
    pub no_log: Option<String>,
}

/// Disc profile catalog keyed by profile name. BTreeMap keeps the
/// combo-box order stable and sorted.
pub type ProfileCatalog = BTreeMap<String, DiscProfile>;

/// Drive read speed selection from the main window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeedSelection {
    Fixed(u32),
    Custom(String),
}

impl Default for SpeedSelection {
    fn default() -> Self {
        SpeedSelection::Fixed(8)
    }
}

/// The fixed speed radio values offered by the main window.
pub const FIXED_SPEEDS: &[u32] = &[4, 8, 16, 48];

/// Everything the user selected in the main window for one dump run.
#[derive(Debug, Clone, Default)]
pub struct DumpRequest {
    pub disc_type: String,
    pub drive: Option<String>,
    pub file_name: String,
    pub directory: String,
    pub speed: SpeedSelection,
    pub zip_logs: bool,
}

/// Metadata extracted from the sidecar files after a successful dump.
/// Each field is present only when its sidecar file existed and parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageInfo {
    /// Full cue sheet text from `<base>.cue`.
    pub cue: Option<String>,
    /// ClrMamePro dat entry from `<base>.dat`.
    pub dat: Option<String>,
    /// Write offset in samples from `<base>_disc.txt`.
    pub write_offset: Option<i64>,
    /// Primary Volume Descriptor excerpt from `<base>_mainInfo.txt`.
    pub pvd: Option<String>,
}

impl ImageInfo {
    pub fn is_empty(&self) -> bool {
        self.cue.is_none() && self.dat.is_none() && self.write_offset.is_none() && self.pvd.is_none()
    }
}

/// Sidecar extensions collected into logs.zip
pub const LOG_EXTENSIONS: &[&str] = &[".c2", ".ccd", ".cue", ".dat", ".sub", ".txt"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_json_skips_unset_fields() {
        let settings = Settings {
            dic_path: Some(PathBuf::from("/opt/dic/DiscImageCreator")),
            c2_rereads: Some(4000),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("dic_path"));
        assert!(json.contains("c2_rereads"));
        assert!(!json.contains("psxt001z_path"));
        assert!(!json.contains("beep"));
    }

    #[test]
    fn test_settings_json_accepts_sparse_file() {
        let settings: Settings = serde_json::from_str(r#"{"beep": true}"#).unwrap();
        assert!(settings.beep);
        assert_eq!(settings.dic_path, None);
        assert_eq!(settings.c2_rereads, None);
    }

    #[test]
    fn test_profile_nl_key_rename() {
        let profile: DiscProfile =
            serde_json::from_str(r#"{"disc_type": "cd", "nl": "/nl"}"#).unwrap();
        assert_eq!(profile.disc_type.as_deref(), Some("cd"));
        assert_eq!(profile.no_log.as_deref(), Some("/nl"));
        assert_eq!(profile.c2, None);
    }

    #[test]
    fn test_image_info_is_empty() {
        assert!(ImageInfo::default().is_empty());
        let info = ImageInfo {
            write_offset: Some(-647),
            ..Default::default()
        };
        assert!(!info.is_empty());
    }
}
