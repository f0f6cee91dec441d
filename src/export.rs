use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use log::{info, warn};

use crate::pipeline::{FrameTarget, FAR};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("buffer holds {len} values, expected {width} x {height}")]
    SizeMismatch { len: usize, width: u32, height: u32 },
}

/// What `write_depth_bmp` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepthExport {
    /// File written, depth normalized against this range.
    Written { min: f32, max: f32 },
    /// Nothing was drawn, or everything is at the same depth. No file written.
    Degenerate,
}

/// Range of the depth values that were actually written, FAR cells are skipped.
pub fn depth_range(z_buffer: &[f32]) -> Option<(f32, f32)> {
    return z_buffer
        .iter()
        .copied()
        .filter(|z| *z != FAR && z.is_finite())
        .fold(None, |range, z| match range {
            None => Some((z, z)),
            Some((min, max)) => Some((min.min(z), max.max(z))),
        });
}

/// Grayscale picture of a depth buffer, near is dark and far is light, along with the
/// (min, max) depth it was normalized against. Untouched cells come out white.
pub fn depth_image(
    z_buffer: &[f32],
    width: u32,
    height: u32,
) -> Result<Option<(RgbImage, (f32, f32))>, ExportError> {
    if z_buffer.len() != width as usize * height as usize {
        return Err(ExportError::SizeMismatch { len: z_buffer.len(), width, height });
    }
    let (z_min, z_max) = match depth_range(z_buffer) {
        Some((z_min, z_max)) if z_min < z_max => (z_min, z_max),
        _ => return Ok(None),
    };
    let scale = z_max - z_min;
    let image = ImageBuffer::from_fn(width, height, |x, y| {
        let z = z_buffer[x as usize + y as usize * width as usize];
        let value = if z == FAR { 255 } else { (((z - z_min) / scale) * 255.0) as u8 };
        Rgb([value, value, value])
    });
    return Ok(Some((image, (z_min, z_max))));
}

/// Writes the target's z-buffer as a 24 bit BMP.
/// A degenerate buffer is only reported with a warning.
pub fn write_depth_bmp<P: AsRef<Path>>(target: &FrameTarget, path: P) -> Result<DepthExport, ExportError> {
    let (image, (min, max)) = match depth_image(target.depth_buffer(), target.width, target.height)? {
        Some(exported) => exported,
        None => {
            warn!("depth buffer is flat or empty, not writing {}", path.as_ref().display());
            return Ok(DepthExport::Degenerate);
        }
    };
    image.save_with_format(path.as_ref(), ImageFormat::Bmp)?;
    info!("depth written to {} (z from {} to {})", path.as_ref().display(), min, max);
    return Ok(DepthExport::Written { min, max });
}

/// Writes the target's color buffer, format picked from the file extension.
pub fn write_color_image<P: AsRef<Path>>(target: &FrameTarget, path: P) -> Result<(), ExportError> {
    let data = target.as_rgb_data();
    let len = data.len();
    let image = RgbImage::from_raw(target.width, target.height, data).ok_or(ExportError::SizeMismatch {
        len,
        width: target.width,
        height: target.height,
    })?;
    image.save(path.as_ref())?;
    info!("frame written to {}", path.as_ref().display());
    return Ok(());
}
