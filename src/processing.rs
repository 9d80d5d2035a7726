use crate::artifacts::ArtifactPaths;
use crate::error::ProcessError;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::fs;
use std::path::Path;
use tracing::debug;

/// What the resize step did with a fetched original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The image already fit; the original was renamed into the resized slot.
    Renamed { width: u32, height: u32 },
    /// A thumbnail was written next to the untouched original.
    Resized { from: (u32, u32), to: (u32, u32) },
}

impl ResizeOutcome {
    /// Dimensions of the file left at the resized path.
    pub fn final_dimensions(&self) -> (u32, u32) {
        match *self {
            ResizeOutcome::Renamed { width, height } => (width, height),
            ResizeOutcome::Resized { to, .. } => to,
        }
    }
}

/// Core resize pipeline for one location:
/// decode -> decide -> rename or thumbnail -> save
///
/// # Arguments
/// * `paths` - Original and resized artifact paths; the original must exist
/// * `max_width` / `max_height` - Bounding box for the resized artifact
///
/// # Returns
/// * `Ok(ResizeOutcome::Renamed)` - the image fit; `paths.original` no longer
///   exists and `paths.resized` holds its exact bytes
/// * `Ok(ResizeOutcome::Resized)` - `paths.resized` holds a thumbnail and
///   `paths.original` is untouched
/// * `Err(ProcessError::Decode)` - the original is not a readable image
pub fn process_artifact(
    paths: &ArtifactPaths,
    max_width: u32,
    max_height: u32,
) -> Result<ResizeOutcome, ProcessError> {
    let img = load_image(&paths.original)?;
    let (width, height) = img.dimensions();

    if width <= max_width && height <= max_height {
        drop(img);
        replace_with_original(paths)?;
        return Ok(ResizeOutcome::Renamed { width, height });
    }

    debug!(
        "Resizing {} to {}",
        paths.original.display(),
        paths.resized.display()
    );
    let thumb = thumbnail(&img, max_width, max_height);
    let to = thumb.dimensions();
    save_image(&thumb, &paths.resized)?;

    Ok(ResizeOutcome::Resized {
        from: (width, height),
        to,
    })
}

/// Decodes an image, sniffing the format from its contents rather than the
/// file extension.
pub fn load_image(path: &Path) -> Result<DynamicImage, ProcessError> {
    let open_error = |source| ProcessError::Open {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .map_err(open_error)?
        .with_guessed_format()
        .map_err(open_error)?
        .decode()
        .map_err(|source| ProcessError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Largest size that fits within `max_width` x `max_height` while keeping the
/// aspect ratio of `width` x `height`. Never upscales; each side is at least 1.
///
/// The free side is rounded to whichever of floor/ceil keeps the ratio closest
/// to the source.
pub fn thumbnail_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    if width == 0 || height == 0 {
        return (width.min(max_width), height.min(max_height));
    }

    let aspect = width as f64 / height as f64;
    let box_w = max_width.max(1);
    let box_h = max_height.max(1);

    if box_w as f64 / box_h as f64 >= aspect {
        let ideal = box_h as f64 * aspect;
        let new_w = closest_side(ideal, |w| (aspect - w / box_h as f64).abs());
        (new_w.min(box_w), box_h)
    } else {
        let ideal = box_w as f64 / aspect;
        let new_h = closest_side(ideal, |h| (aspect - box_w as f64 / h).abs());
        (box_w, new_h.min(box_h))
    }
}

fn closest_side(ideal: f64, ratio_error: impl Fn(f64) -> f64) -> u32 {
    let floor = ideal.floor().max(1.0);
    let ceil = ideal.ceil().max(1.0);
    let side = if ratio_error(ceil) < ratio_error(floor) {
        ceil
    } else {
        floor
    };
    side as u32
}

pub fn thumbnail(img: &DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = thumbnail_dimensions(img.width(), img.height(), max_width, max_height);
    if (width, height) == img.dimensions() {
        return img.clone();
    }
    img.resize_exact(width, height, FilterType::Lanczos3)
}

/// Saves `img` in the format implied by the extension of `output`.
pub fn save_image(img: &DynamicImage, output: &Path) -> Result<(), ProcessError> {
    let encode_error = |source| ProcessError::Encode {
        path: output.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(output).map_err(encode_error)?;
    let saved = match format {
        // JPEG takes 8-bit grey or RGB only
        ImageFormat::Jpeg if !matches!(img.color(), ColorType::L8 | ColorType::Rgb8) => {
            DynamicImage::ImageRgb8(img.to_rgb8()).save_with_format(output, format)
        }
        _ => img.save_with_format(output, format),
    };
    saved.map_err(encode_error)
}

fn replace_with_original(paths: &ArtifactPaths) -> Result<(), ProcessError> {
    if paths.resized.exists() {
        debug!("{} already exists, removing", paths.resized.display());
        fs::remove_file(&paths.resized).map_err(|source| ProcessError::Remove {
            path: paths.resized.clone(),
            source,
        })?;
    }

    debug!(
        "Resize not needed; renaming {} to {}",
        paths.original.display(),
        paths.resized.display()
    );
    fs::rename(&paths.original, &paths.resized).map_err(|source| ProcessError::Rename {
        from: paths.original.clone(),
        to: paths.resized.clone(),
        source,
    })
}
