//! Reference-image discovery and loading.
//!
//! Backgrounds live under `<assets_dir>/backgrounds/<location_key>/` and
//! trainer photos under `<assets_dir>/trainers/<trainer_key>/`. Reference
//! assets are a degraded-mode concern: a missing directory or unreadable
//! file is logged and skipped so generation proceeds without the
//! conditioning image, it never aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::catalog::options::{LOCATIONS, TRAINERS};
use crate::config::CONFIG;
use crate::error::GenerationError;
use crate::llm::types::{ReferenceImage, ReferenceRole};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.iter().any(|known| *known == ext)
        })
        .unwrap_or(false)
}

/// Lists image files in a directory in stable (name-sorted) order. An
/// absent directory is an empty listing, not an error.
fn list_image_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => {
            debug!("Asset directory {} not found, skipping.", dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();
    files.sort();
    files
}

fn read_reference(path: &Path, role: ReferenceRole, description: String) -> Option<ReferenceImage> {
    match fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => Some(ReferenceImage {
            bytes,
            role,
            description,
        }),
        Ok(_) => {
            let err = GenerationError::ReferenceAssetMissing(format!(
                "{} is empty",
                path.display()
            ));
            warn!("Skipping reference asset: {err}");
            None
        }
        Err(io_err) => {
            let err = GenerationError::ReferenceAssetMissing(format!(
                "{}: {io_err}",
                path.display()
            ));
            warn!("Skipping reference asset: {err}");
            None
        }
    }
}

fn location_key(location: &str) -> Option<&'static str> {
    LOCATIONS.resolve(location).copied().or_else(|| {
        LOCATIONS
            .labels()
            .filter_map(|label| LOCATIONS.resolve(label))
            .copied()
            .find(|key| *key == location)
    })
}

fn trainer_key(trainer: &str) -> Option<&'static str> {
    TRAINERS.resolve(trainer).copied().or_else(|| {
        TRAINERS
            .labels()
            .filter_map(|label| TRAINERS.resolve(label))
            .copied()
            .find(|key| *key == trainer)
    })
}

/// Loads the store background reference for a location, if one exists.
/// When several photos are present the first in name order wins.
pub fn load_background(location: &str) -> Option<ReferenceImage> {
    let key = match location_key(location) {
        Some(key) => key,
        None => {
            warn!("No background assets mapped for location '{location}'.");
            return None;
        }
    };

    let dir = CONFIG.assets_dir.join("backgrounds").join(key);
    let files = list_image_files(&dir);
    let path = files.first()?;
    read_reference(
        path,
        ReferenceRole::Background,
        format!("store background: {key}"),
    )
}

/// Loads every available reference photo for a trainer. The boundary layer
/// caps how many are actually sent; this loader returns all of them.
pub fn load_trainer_references(trainer: &str) -> Vec<ReferenceImage> {
    let key = match trainer_key(trainer) {
        Some(key) => key,
        None => {
            warn!("No reference photos mapped for trainer '{trainer}'.");
            return Vec::new();
        }
    };

    let dir = CONFIG.assets_dir.join("trainers").join(key);
    let files = list_image_files(&dir);
    if files.is_empty() {
        warn!("Trainer '{key}' has no reference photos under {}.", dir.display());
    }
    files
        .iter()
        .filter_map(|path| {
            read_reference(path, ReferenceRole::Trainer, format!("trainer photo: {key}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extension_filter_is_case_insensitive() {
        assert!(is_image_file(Path::new("a/photo.JPG")));
        assert!(is_image_file(Path::new("a/photo.webp")));
        assert!(!is_image_file(Path::new("a/notes.txt")));
        assert!(!is_image_file(Path::new("a/no_extension")));
    }

    #[test]
    fn location_and_trainer_accept_labels_and_keys() {
        assert_eq!(location_key("島田本町"), Some("shimadahonmachi"));
        assert_eq!(location_key("ifukucho"), Some("ifukucho"));
        assert_eq!(location_key("名古屋"), None);
        assert_eq!(trainer_key("岡田"), Some("okada"));
        assert_eq!(trainer_key("yamamoto"), Some("yamamoto"));
        assert_eq!(trainer_key("unknown"), None);
    }

    #[test]
    fn missing_directory_yields_empty_listing() {
        assert!(list_image_files(Path::new("/nonexistent/assets/dir")).is_empty());
    }
}
