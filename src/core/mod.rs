// Copyright (C) 2025 Berkay Yetgin
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

pub mod archive;
pub mod command;
pub mod config;
pub mod drives;
pub mod runner;
pub mod sidecar;
pub mod types;

pub use archive::*;
pub use command::*;
pub use config::*;
pub use drives::*;
pub use runner::*;
pub use sidecar::*;
pub use types::*;
