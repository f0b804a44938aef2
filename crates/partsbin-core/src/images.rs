//! Photo files under the data directory's `images/` folder

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::detail::ValidationError;
use crate::layout::{DataLayout, IMAGES_DIR};
use crate::util::PathError;

/// Extensions accepted by [`import_image`]
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Errors while importing or removing photos
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Image file not found: {0}")]
    SourceMissing(PathBuf),

    #[error("Path security error: {0}")]
    PathSecurity(#[from] PathError),
}

/// Copy a photo into `images/` and return its stored relative path
///
/// The file keeps its base name. When a different file already uses that
/// name, `-1`, `-2`, ... is appended to the stem; an identical file is reused.
///
/// # Errors
/// Returns an error if the source is missing, is not a supported image, or
/// cannot be copied
pub fn import_image(layout: &DataLayout, source: &Path) -> Result<String, ImageError> {
    if !source.is_file() {
        return Err(ImageError::SourceMissing(source.to_path_buf()));
    }

    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ImageError::SourceMissing(source.to_path_buf()))?;
    check_extension(&file_name)?;

    let images_dir = layout.images_dir();
    fs::create_dir_all(&images_dir)?;

    let mut candidate = file_name.clone();
    let mut counter = 0u32;
    loop {
        let target = images_dir.join(&candidate);
        if !target.exists() {
            fs::copy(source, &target)?;
            log::info!("imported image {} as {candidate}", source.display());
            break;
        }
        if same_file_or_contents(source, &target)? {
            log::debug!("image {candidate} already present");
            break;
        }
        counter += 1;
        candidate = suffixed_name(&file_name, counter);
    }

    Ok(format!("{IMAGES_DIR}/{candidate}"))
}

/// Remove a stored photo; a file that is already gone is not an error
///
/// # Errors
/// Returns an error if the path escapes the data directory or removal fails
pub fn remove_image(layout: &DataLayout, image_path: &str) -> Result<(), ImageError> {
    let path = layout.resolve(image_path)?;
    match fs::remove_file(&path) {
        Ok(()) => {
            log::info!("removed image {image_path}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("image {image_path} was already missing");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn check_extension(file_name: &str) -> Result<(), ValidationError> {
    let supported = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        });

    if supported {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedImage(file_name.to_string()))
    }
}

fn suffixed_name(file_name: &str, counter: u32) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    match path.extension() {
        Some(ext) => format!("{stem}-{counter}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{counter}"),
    }
}

fn same_file_or_contents(a: &Path, b: &Path) -> io::Result<bool> {
    if a.canonicalize()? == b.canonicalize()? {
        return Ok(true);
    }
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(fs::read(a)? == fs::read(b)?)
}
