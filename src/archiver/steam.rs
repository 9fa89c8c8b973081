//! Steam library layout.
//!
//! A top-level `Steam` directory is a container: the games installed in
//! `Steam/steamapps/common/*` are archived one by one into
//! `<destination>/steamapps/`, rather than moving the whole client.

use std::path::{Path, PathBuf};

pub const STEAM_DIR_NAME: &str = "Steam";
pub const STEAMAPPS_DIR: &str = "steamapps";
pub const COMMON_DIR: &str = "common";

/// Whether a source folder child is a Steam installation (case-insensitive)
pub fn is_steam_container(name: &str) -> bool {
    name.eq_ignore_ascii_case(STEAM_DIR_NAME)
}

/// Directory whose children are individual installed games
pub fn library_dir(steam_root: &Path) -> PathBuf {
    steam_root.join(STEAMAPPS_DIR).join(COMMON_DIR)
}

/// Archive parent for Steam games
pub fn archive_dir(destination_folder: &Path) -> PathBuf {
    destination_folder.join(STEAMAPPS_DIR)
}
