//! Blank PNG generation.
//!
//! Images are truecolor RGB, 8 bits per channel, filled white. Scanlines are
//! streamed through a zlib encoder so memory stays proportional to the
//! compressed size.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::Crc;
use flate2::write::ZlibEncoder;
use lion_test_core::{HarnessConfig, Result, TestError};

use crate::fs::create_directory;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Color type 2: truecolor RGB.
const COLOR_TYPE_RGB: u8 = 2;

/// Where and how large an image to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Target directory, created if missing.
    pub dir: PathBuf,
    /// File name inside `dir`.
    pub file_name: String,
}

impl Default for ImageSpec {
    fn default() -> Self {
        Self::from_config(&HarnessConfig::default())
    }
}

impl ImageSpec {
    /// Spec built from the harness defaults.
    #[must_use]
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            width: config.image.width,
            height: config.image.height,
            dir: config.storage_dir.clone(),
            file_name: config.image.file_name.clone(),
        }
    }

    /// Sets the dimensions.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the target directory.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Sets the file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Full path of the generated file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Writes a white PNG as described by `spec` and returns its path.
///
/// # Errors
/// - [`TestError::InvalidArgument`] if a dimension is zero or the file name is empty
/// - [`TestError::Image`] if the directory is read-only
/// - I/O errors while creating the directory or writing the file
pub fn create_image(spec: &ImageSpec) -> Result<PathBuf> {
    if spec.width == 0 || spec.height == 0 {
        return Err(TestError::invalid_argument("Width and height must be greater than 0."));
    }
    if spec.file_name.is_empty() {
        return Err(TestError::invalid_argument("image file name cannot be empty"));
    }

    create_directory(&spec.dir)?;
    if std::fs::metadata(&spec.dir)?.permissions().readonly() {
        return Err(TestError::Image(format!(
            "The directory is not writable: {}.",
            spec.dir.display()
        )));
    }

    let png = encode_white_png(spec.width, spec.height)?;
    let path = spec.file_path();
    std::fs::write(&path, &png).map_err(|e| {
        TestError::Image(format!("Failed to save image at: {}: {e}", path.display()))
    })?;

    tracing::info!(
        path = %path.display(),
        width = spec.width,
        height = spec.height,
        bytes = png.len(),
        "image created"
    );
    Ok(path)
}

fn encode_white_png(width: u32, height: u32) -> Result<Vec<u8>> {
    let row_len = usize::try_from(width)
        .ok()
        .and_then(|w| w.checked_mul(3))
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| TestError::invalid_argument("image width is too large"))?;

    // Filter type 0 followed by white pixels.
    let mut row = vec![0xFF_u8; row_len];
    row[0] = 0;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    for _ in 0..height {
        encoder.write_all(&row)?;
    }
    let idat = encoder.finish()?;

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    // Bit depth, color type, compression, filter, interlace.
    ihdr.extend_from_slice(&[8, COLOR_TYPE_RGB, 0, 0, 0]);

    let mut png = Vec::with_capacity(PNG_SIGNATURE.len() + idat.len() + 64);
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr)?;
    write_chunk(&mut png, b"IDAT", &idat)?;
    write_chunk(&mut png, b"IEND", &[])?;
    Ok(png)
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) -> Result<()> {
    let len = u32::try_from(data.len())
        .map_err(|_| TestError::Image("PNG chunk exceeds 4 GiB".to_string()))?;

    let mut crc = Crc::new();
    crc.update(kind);
    crc.update(data);

    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    Ok(())
}

/// Reads width and height from a PNG header.
///
/// # Errors
/// [`TestError::Image`] if the file is not a PNG.
pub fn png_dimensions(path: impl AsRef<Path>) -> Result<(u32, u32)> {
    let bytes = std::fs::read(path.as_ref())?;
    // Signature, IHDR length and type, then width and height.
    let header = bytes
        .get(..24)
        .filter(|h| h[..8] == PNG_SIGNATURE && h[12..16] == *b"IHDR")
        .ok_or_else(|| {
            TestError::Image(format!("{} is not a PNG file", path.as_ref().display()))
        })?;
    let width = u32::from_be_bytes([header[16], header[17], header[18], header[19]]);
    let height = u32::from_be_bytes([header[20], header[21], header[22], header[23]]);
    Ok((width, height))
}
