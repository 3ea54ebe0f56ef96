use crate::reader::ImageView;
use image::{GrayImage, ImageFormat};
use std::path::Path;

/// Encodes a raw grayscale view as an 8-bit PNG.
pub fn save_png(view: &ImageView, path: &Path) -> crate::Result<()> {
    let expected = view.width as usize * view.height as usize;
    if view.pixels.is_empty() || view.pixels.len() != expected {
        return Err(crate::ScanError::InvalidImage {
            width: view.width,
            height: view.height,
            len: view.pixels.len(),
        });
    }

    let image = GrayImage::from_raw(view.width, view.height, view.pixels.clone()).ok_or(
        crate::ScanError::InvalidImage {
            width: view.width,
            height: view.height,
            len: view.pixels.len(),
        },
    )?;
    image.save_with_format(path, ImageFormat::Png)?;

    Ok(())
}
