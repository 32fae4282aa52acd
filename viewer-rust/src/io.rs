use anyhow::{Context, Result};
use std::path::Path;

use report_ai_common::{ReviewEntry, ReviewStore};

pub fn open_review(records_dir: &Path, images_dir: &Path) -> Result<(ReviewStore, Vec<ReviewEntry>)> {
    let store = ReviewStore::new(records_dir, images_dir)
        .with_context(|| format!("open {}", records_dir.display()))?;
    let entries = store.list().context("list records")?;
    Ok((store, entries))
}

pub fn decode_image(bytes: &[u8]) -> Result<([usize; 2], Vec<u8>)> {
    let image = image::load_from_memory(bytes).context("decode image")?;
    let size = [image.width() as usize, image.height() as usize];
    let pixels = image.to_rgba8().into_raw();
    Ok((size, pixels))
}
