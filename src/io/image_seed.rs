//! Optional image-based color seeding.
//!
//! When an `assets/image.*` and a previous run's `output.txt` both exist,
//! the image is scaled to the world dimensions and each saved position
//! samples the pixel under it. The spawner hands those colors out in spawn
//! order, so once the particles settle back into last run's configuration
//! they reproduce the image.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};

use crate::io::snapshot;

const CANDIDATES: [&str; 6] = [
    "../assets/image.png",
    "../assets/image.jpg",
    "../assets/image.jpeg",
    "assets/image.png",
    "assets/image.jpg",
    "assets/image.jpeg",
];

fn find_asset_image() -> Option<PathBuf> {
    CANDIDATES.iter().map(PathBuf::from).find(|p| p.is_file())
}

/// Per-spawn-index target colors, or `None` when either input is missing
/// or unreadable. Never fails the startup path.
pub fn load_target_colors(width: u32, height: u32, capacity: usize) -> Option<Vec<[u8; 3]>> {
    let image_path = find_asset_image()?;
    let snapshot_path = Path::new(snapshot::SNAPSHOT_PATH);
    if !snapshot_path.is_file() {
        return None;
    }

    let src = match image::open(&image_path) {
        Ok(img) => img.to_rgb8(),
        Err(err) => {
            log::warn!("failed to load {}: {err}", image_path.display());
            return None;
        }
    };

    let resized = if src.dimensions() == (width, height) {
        src
    } else {
        imageops::resize(&src, width, height, FilterType::Nearest)
    };

    let positions = match snapshot::load_positions(snapshot_path) {
        Ok(positions) => positions,
        Err(err) => {
            log::warn!("failed to read {}: {err}", snapshot_path.display());
            return None;
        }
    };

    let colors: Vec<[u8; 3]> = positions
        .into_iter()
        .take(capacity)
        .map(|(x, y)| {
            let px = (x.round() as i64).clamp(0, width as i64 - 1) as u32;
            let py = (y.round() as i64).clamp(0, height as i64 - 1) as u32;
            resized.get_pixel(px, py).0
        })
        .collect();

    if colors.is_empty() {
        return None;
    }

    log::debug!(
        "sampled {} target colors from {}",
        colors.len(),
        image_path.display()
    );
    Some(colors)
}
