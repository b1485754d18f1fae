//! Generated-image persistence.
//!
//! Files are written under the configured output directory with a
//! timestamped name so repeated runs never clobber each other. Carousel
//! pages share one run timestamp and get a `_pNN` page suffix.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use tracing::info;

use crate::config::CONFIG;
use crate::error::{GenerationError, Result};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One timestamp per run; pages of the same carousel sort together.
pub fn run_stamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn ensure_output_dir() -> Result<PathBuf> {
    let dir = CONFIG.output_dir.clone();
    fs::create_dir_all(&dir).map_err(|err| {
        GenerationError::Configuration(format!(
            "cannot create output directory {}: {err}",
            dir.display()
        ))
    })?;
    Ok(dir)
}

fn write_image(path: &PathBuf, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|err| {
        GenerationError::Configuration(format!("cannot write {}: {err}", path.display()))
    })?;
    info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

pub fn save_single(stamp: &str, bytes: &[u8]) -> Result<PathBuf> {
    let dir = ensure_output_dir()?;
    let path = dir.join(format!("firefitness_{stamp}.png"));
    write_image(&path, bytes)?;
    Ok(path)
}

pub fn save_page(stamp: &str, page_number: usize, bytes: &[u8]) -> Result<PathBuf> {
    let dir = ensure_output_dir()?;
    let path = dir.join(format!("firefitness_{stamp}_p{page_number:02}.png"));
    write_image(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_stamp_has_expected_shape() {
        let stamp = run_stamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(stamp.as_bytes()[8], b'_');
        assert!(stamp
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch == '_'));
    }

    #[test]
    fn page_suffix_is_zero_padded() {
        let name = format!("firefitness_20250101_000000_p{:02}.png", 3usize);
        assert_eq!(name, "firefitness_20250101_000000_p03.png");
    }
}
