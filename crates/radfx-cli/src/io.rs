//! PNG decoding to grayscale and 8-bit PNG encoding.
//!
//! Palette and sub-byte images are expanded by the decoder. Colour inputs
//! are reduced to ITU-R BT.601 luma; alpha is dropped. 16-bit samples are
//! rescaled to the 0..=255 display range. Decoded intensities are rounded
//! to whole values, matching an 8-bit grayscale upload.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{bail, Context, Result};
use radfx_core::GrayImage;
use tracing::{debug, trace};

/// BT.601 luma weights for R, G, B.
const LUMA_601: [f64; 3] = [0.299, 0.587, 0.114];

/// Reads a PNG file as a grayscale image.
pub fn read_gray(path: &Path) -> Result<GrayImage> {
    trace!(path = %path.display(), "read_gray");
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND);

    let mut reader = decoder
        .read_info()
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    let buf_size = reader
        .output_buffer_size()
        .context("cannot determine output buffer size")?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    let bytes = &buf[..info.buffer_size()];

    let samples: Vec<f64> = match info.bit_depth {
        png::BitDepth::Eight => bytes.iter().map(|&b| b as f64).collect(),
        png::BitDepth::Sixteen => bytes
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]) as f64 / 257.0)
            .collect(),
        depth => bail!("unsupported PNG bit depth after expansion: {:?}", depth),
    };

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => bail!("unsupported PNG colour type: {:?}", other),
    };
    debug!(
        width = info.width,
        height = info.height,
        channels,
        bit_depth = ?info.bit_depth,
        "decoded PNG"
    );

    let gray: Vec<f64> = samples
        .chunks_exact(channels)
        .map(|px| {
            let v = if channels >= 3 {
                px[0] * LUMA_601[0] + px[1] * LUMA_601[1] + px[2] * LUMA_601[2]
            } else {
                px[0]
            };
            v.round().clamp(0.0, 255.0)
        })
        .collect();

    GrayImage::from_vec(info.width as usize, info.height as usize, gray)
        .with_context(|| format!("Invalid image: {}", path.display()))
}

/// Writes `image` as an 8-bit grayscale PNG.
pub fn write_gray(path: &Path, image: &GrayImage) -> Result<()> {
    trace!(path = %path.display(), "write_gray");
    let (width, height) = image.dims();
    let file =
        File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;

    let mut encoder = png::Encoder::new(BufWriter::new(file), width as u32, height as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer
        .write_image_data(&image.to_u8())
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer
        .finish()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_raw(
        path: &Path,
        w: u32,
        h: u32,
        color: png::ColorType,
        depth: png::BitDepth,
        data: &[u8],
    ) {
        let file = File::create(path).unwrap();
        let mut enc = png::Encoder::new(BufWriter::new(file), w, h);
        enc.set_color(color);
        enc.set_depth(depth);
        let mut writer = enc.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_gray_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gray.png");
        let img = GrayImage::from_fn(7, 5, |x, y| (x * 30 + y) as f64).unwrap();
        write_gray(&path, &img).unwrap();
        assert_eq!(read_gray(&path).unwrap(), img);
    }

    #[test]
    fn test_rgb_to_luma() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        let data = [255, 0, 0, 0, 255, 0, 0, 0, 255, 200, 200, 200];
        write_raw(&path, 4, 1, png::ColorType::Rgb, png::BitDepth::Eight, &data);
        let img = read_gray(&path).unwrap();
        assert_eq!(img.data(), &[76.0, 150.0, 29.0, 200.0]);
    }

    #[test]
    fn test_rgba_drops_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        let data = [100, 100, 100, 0, 10, 10, 10, 255];
        write_raw(&path, 2, 1, png::ColorType::Rgba, png::BitDepth::Eight, &data);
        assert_eq!(read_gray(&path).unwrap().data(), &[100.0, 10.0]);
    }

    #[test]
    fn test_sixteen_bit_gray() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("g16.png");
        let data = [0xFF, 0xFF, 0x00, 0x00, 0x80, 0x80];
        write_raw(&path, 3, 1, png::ColorType::Grayscale, png::BitDepth::Sixteen, &data);
        assert_eq!(read_gray(&path).unwrap().data(), &[255.0, 0.0, 128.0]);
    }

    #[test]
    fn test_missing_file() {
        let err = read_gray(Path::new("/nonexistent/x.png")).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
