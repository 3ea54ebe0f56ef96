use crate::png::save_png;
use crate::reader::Reader;
use crate::retry::{capture_with_retries, RetryPolicy};
use crate::template::{write_template, TemplateFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const IMAGE_FILE: &str = "fingerprint.png";
pub const TEMPLATE_STEM: &str = "fingerprint";

/// Files written by one capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedCapture {
    pub image: Option<PathBuf>,
    pub template: Option<PathBuf>,
}

/// Creates `dir` when it does not exist yet.
pub fn ensure_directory(dir: &Path, out: &mut dyn Write) -> crate::Result<()> {
    if !dir.is_dir() {
        std::fs::create_dir_all(dir)?;
        writeln!(out, "Created directory: {}", dir.display())?;
    }

    Ok(())
}

/// Captures a finger and writes its image and template into `dir`. Either
/// file may be missing when its step failed; `None` means nothing was captured.
pub fn capture_to_directory<R: Reader + ?Sized>(
    reader: &mut R,
    policy: &RetryPolicy,
    dir: &Path,
    format: TemplateFormat,
    out: &mut dyn Write,
) -> crate::Result<Option<SavedCapture>> {
    let sample = match capture_with_retries(reader, policy, out)? {
        Some(sample) => sample,
        None => return Ok(None),
    };
    let mut saved = SavedCapture::default();

    if let Some(view) = sample.views.first() {
        let path = dir.join(IMAGE_FILE);
        match save_png(view, &path) {
            Ok(()) => {
                writeln!(out, "Fingerprint image saved to: {}", path.display())?;
                saved.image = Some(path);
            }
            Err(error @ crate::ScanError::InvalidImage { .. }) => {
                warn!(%error, "image not saved");
                writeln!(out, "Invalid fingerprint image data.")?;
            }
            Err(error) => {
                warn!(%error, "image not saved");
                writeln!(out, "Failed to save fingerprint image: {}", error)?;
            }
        }
    }

    match reader.extract(&sample) {
        Ok(template) => {
            let path = write_template(&template, dir, TEMPLATE_STEM, format)?;
            writeln!(out, "Fingerprint template saved to: {}", path.display())?;
            info!(path = %path.display(), bytes = template.len(), "template saved");
            saved.template = Some(path);
        }
        Err(error) => {
            warn!(%error, "template extraction failed");
            writeln!(out, "Failed to extract template: {}", error)?;
        }
    }

    Ok(Some(saved))
}
